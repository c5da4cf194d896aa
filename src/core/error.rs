// This module defines error types for function-info using the thiserror crate for
// idiomatic Rust error handling. AnalysisError is the main error enum covering the
// failure scenarios of a run: modules that cannot be loaded or parsed, unknown function
// or pass names, duplicate pass registrations, passes that break their declared
// preservation contract, and I/O failures while writing diagnostics. Each variant carries
// the context needed to report the problem (paths, names, LLVM's own diagnostic text).
// AnalysisResult<T> is the convenience alias used throughout the crate.

//! Error types for function-info.

use thiserror::Error;

/// Main error type for loading modules and running passes.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to load module {path}: {reason}")]
    ModuleLoad {
        path: String,
        reason: String,
    },

    #[error("Invalid IR: {reason}")]
    InvalidIr {
        reason: String,
    },

    #[error("Function not found: {name}")]
    FunctionNotFound {
        name: String,
    },

    #[error("Unknown pass: {name}")]
    UnknownPass {
        name: String,
    },

    #[error("Pass already registered: {name}")]
    DuplicatePass {
        name: String,
    },

    #[error("Pass {pass} preserves all analyses but modified function {function}")]
    PreservationViolated {
        pass: String,
        function: String,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
