//! Single-pass C-- compiler producing linkable quad modules.
//!
//! # Example
//!
//! ```
//! use cmm_compiler::Compiler;
//!
//! let source = "int twice(int x) { return x + x; }";
//!
//! let compiled = Compiler::new(source).compile().expect("valid program");
//! assert!(compiled.artifact.to_string().starts_with("<header>\n"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compiler;
pub mod diagnostics;
pub mod emit;
pub mod parser;

#[cfg(test)]
mod test_utils;

pub use compiler::{Compiled, Compiler, DEFAULT_RECURSION_FUEL};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use emit::{CompilationContext, EmitError, ModuleArtifact};

/// Errors that can occur while compiling a module.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("parsing failed with {} errors", .0.error_count())]
    ParseFailed(Diagnostics),

    #[error("analysis failed with {} errors", .0.error_count())]
    AnalysisFailed(Diagnostics),

    /// The emitted module is internally inconsistent.
    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl Error {
    /// Diagnostics attached to a source-level failure.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::ParseFailed(diagnostics) | Error::AnalysisFailed(diagnostics) => {
                Some(diagnostics)
            }
            Error::RecursionLimitExceeded | Error::Emit(_) => None,
        }
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
