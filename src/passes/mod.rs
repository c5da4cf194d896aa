//! Passes shipped with function-info.

pub mod function_info;

pub use crate::core::pass::OutputFormat;
pub use function_info::{count_function, FunctionInfo};
