// This module serves as the central hub for the pass framework, providing the building
// blocks shared by every IR and every pass. It exports and organizes the key subsystems:
// the IrAdaptor trait that abstracts over the IR owning the program, the FunctionPass
// protocol with its AnalysisUsage and PassInfo descriptions, the FunctionPassManager that
// drives passes over a module, the PassRegistry that maps command-line arguments to pass
// constructors, the arena-based AnalysisSession that collects results, and the error types.

//! Core pass framework.
//!
//! # Key Components
//!
//! ## Adaptor (`adaptor`)
//! - Read-only view of functions, blocks and instructions
//!
//! ## Passes (`pass`, `pass_manager`, `registry`)
//! - Legacy-style hooks: initialization, per-function run, finalization
//! - Preservation contract checked by the manager
//! - Registration by command-line argument
//!
//! ## Session (`session`)
//! - Arena-based storage of per-function reports using `bumpalo`
//! - Running totals for the driver's summary

pub mod adaptor;
pub mod error;
pub mod pass;
pub mod pass_manager;
pub mod registry;
pub mod session;

pub use adaptor::IrAdaptor;

pub use error::{
    AnalysisError,
    AnalysisResult,
};

pub use pass::{
    AnalysisUsage,
    FunctionPass,
    OutputFormat,
    PassContext,
    PassInfo,
    PassOptions,
};

pub use pass_manager::{FunctionPassManager, RunSummary};
pub use registry::{PassCtor, PassRegistry};

pub use session::{
    AnalysisSession,
    FunctionCounts,
    FunctionReport,
    SessionStats,
};
