//! Quad instructions and the module artifact format for C--.
//!
//! This crate is the contract between the compiler and the linker:
//! - Instruction vocabulary (`Quad`, `Opcode`, `Register`)
//! - Stream addressing (`Address`) and the header-offset convention (`Addressing`)
//! - Module header sections (`ModuleHeader`, `LinkEntry`)
//! - Artifact reader for linker-side consumers (`Artifact`)

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod address;
mod artifact;
mod error;
mod header;
mod quad;
mod register;

#[cfg(test)]
mod artifact_tests;
#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod quad_tests;

pub use address::{Address, Addressing, HEADER_LINES};
pub use artifact::Artifact;
pub use error::ArtifactError;
pub use header::{
    HEADER_CLOSE, HEADER_OPEN, IMPLEMENTED_TAG, LinkEntry, ModuleHeader, UNIMPLEMENTED_TAG,
};
pub use quad::{LABEL_MNEMONIC, Opcode, Quad, StreamLine, UNRESOLVED_TARGET};
pub use register::Register;
