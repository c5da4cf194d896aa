//! LLVM integration.
//!
//! This module contains the LLVM adaptor and module loading for
//! function-info. All structural knowledge about functions, blocks and
//! instructions comes from LLVM through `inkwell`.
//!
//! # Example
//! ```ignore
//! use function_info::llvm::{load_module, LlvmAdaptor};
//! use inkwell::context::Context;
//!
//! let context = Context::create();
//! let module = load_module(&context, Path::new("input.ll"))?;
//! let mut adaptor = LlvmAdaptor::new(&module);
//! ```

pub mod adaptor;
pub mod loader;

pub use adaptor::LlvmAdaptor;
pub use loader::{load_module, parse_module};
