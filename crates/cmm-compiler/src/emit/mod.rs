//! Quad emission and the linking header.
//!
//! This module handles:
//! - The append-only instruction buffer with labels and placeholder calls
//! - Per-function bookkeeping of entry points and call sites
//! - Header construction with bounded call-site repair
//! - The per-compilation context tying them together

mod buffer;
mod context;
mod error;
mod header;
mod registry;
mod repair;

#[cfg(test)]
mod buffer_tests;
#[cfg(test)]
mod context_tests;

pub use buffer::InstructionBuffer;
pub use context::{CompilationContext, ModuleArtifact};
pub use error::EmitError;
pub use header::ModuleHeaderBuilder;
pub use registry::{FunctionEntry, FunctionRegistry, FunctionState};
pub use repair::{CallSiteRepair, DEFAULT_MAX_FORWARD, RepairOutcome};
