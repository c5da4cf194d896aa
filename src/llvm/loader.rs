//! Loading LLVM modules from textual IR or bitcode.
//!
//! Files ending in `.bc` are read as bitcode, everything else as textual IR.
//! The path `-` reads textual IR from stdin.

use crate::core::error::{AnalysisError, AnalysisResult};
use inkwell::{context::Context, memory_buffer::MemoryBuffer, module::Module};
use std::io::Read;
use std::path::Path;

/// Parse a text LLVM IR module into an [`inkwell::module::Module`].
pub fn parse_module<'ctx>(context: &'ctx Context, ir: &str, name: &str) -> AnalysisResult<Module<'ctx>> {
    let buffer = MemoryBuffer::create_from_memory_range_copy(ir.as_bytes(), name);
    context
        .create_module_from_ir(buffer)
        .map_err(|e| AnalysisError::InvalidIr { reason: e.to_string() })
}

/// Load a module from disk (or stdin for `-`).
pub fn load_module<'ctx>(context: &'ctx Context, path: &Path) -> AnalysisResult<Module<'ctx>> {
    let display = path.display().to_string();
    let load_error = |reason: String| AnalysisError::ModuleLoad {
        path: display.clone(),
        reason,
    };

    if path.as_os_str() == "-" {
        let mut ir = String::new();
        std::io::stdin()
            .read_to_string(&mut ir)
            .map_err(|e| load_error(e.to_string()))?;
        log::info!("Parsing textual IR from stdin");
        return parse_module(context, &ir, "<stdin>");
    }

    let is_bitcode = path.extension().is_some_and(|ext| ext == "bc");
    log::info!(
        "Loading {} as {}",
        display,
        if is_bitcode { "bitcode" } else { "textual IR" }
    );

    if is_bitcode {
        return Module::parse_bitcode_from_path(path, context).map_err(|e| load_error(e.to_string()));
    }

    let buffer = MemoryBuffer::create_from_file(path).map_err(|e| load_error(e.to_string()))?;
    context
        .create_module_from_ir(buffer)
        .map_err(|e| load_error(e.to_string()))
}
