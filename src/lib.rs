//! function-info - per-function statistics for LLVM IR.
//!
//! For every function with a body in an LLVM module, the `function-info`
//! pass counts formal arguments, basic blocks and instructions and prints
//! the result. The pass is read-only: it preserves all analyses and never
//! modifies the module.
//!
//! # Primary Usage
//!
//! ```ignore
//! use function_info::core::{AnalysisSession, FunctionPassManager, PassContext};
//! use function_info::llvm::{load_module, LlvmAdaptor};
//! use function_info::passes::FunctionInfo;
//! use bumpalo::Bump;
//!
//! let context = Context::create();
//! let module = load_module(&context, Path::new("input.ll"))?;
//! let mut adaptor = LlvmAdaptor::new(&module);
//!
//! let arena = Bump::new();
//! let session = AnalysisSession::new(&arena);
//! let mut stderr = std::io::stderr();
//! let mut ctx = PassContext::new(&mut stderr, &session);
//!
//! let mut pm = FunctionPassManager::new();
//! pm.add(Box::new(FunctionInfo::new()));
//! pm.run(&mut adaptor, &mut ctx)?;
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Pass framework (adaptor trait, passes, manager, registry, session)
//! - [`llvm`] - LLVM module loading and adaptor
//! - [`passes`] - The passes shipped with this crate
//! - [`test_ir`] - Small textual IR for tests

pub mod core;
pub mod llvm;
pub mod passes;
pub mod test_ir;

pub use crate::core::{
    // Framework traits
    IrAdaptor, FunctionPass,
    // Running passes
    FunctionPassManager, PassRegistry, PassContext, PassOptions, OutputFormat, RunSummary,
    // Results
    AnalysisSession, FunctionCounts, FunctionReport, SessionStats,
    AnalysisError, AnalysisResult,
};
pub use crate::llvm::{LlvmAdaptor, load_module, parse_module};
pub use crate::passes::FunctionInfo;
