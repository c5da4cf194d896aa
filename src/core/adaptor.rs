// This module defines the IrAdaptor trait, which serves as the bridge between the pass
// framework and any SSA-based intermediate representation. The trait exposes just enough
// structure for read-only function passes: enumerating the module's functions, telling
// definitions from declarations, switching the current function, and walking its
// arguments, basic blocks and instructions. Passes never see the IR's concrete types,
// so the same pass runs over LLVM modules and over the textual test IR.

//! IrAdaptor responsibilities.
//!
//! The adaptor is the glue between the pass framework and the IR that owns the
//! program. The framework assumes:
//! - Functions are enumerated in module order.
//! - A function is either a declaration (no body) or a definition with at
//!   least one basic block.
//! - Basic blocks contain a list of instructions ending with a terminator.
//!
//! Per-function queries (`cur_args`, `blocks`) refer to the function selected
//! by the last successful [`IrAdaptor::switch_func`].

use std::borrow::Cow;

/// Bridge between an SSA IR and the pass framework.
pub trait IrAdaptor {
    type ValueRef: Copy + Eq;
    type InstRef: Copy + Eq;
    type BlockRef: Copy + Eq;
    type FuncRef: Copy + Eq;

    /// Number of functions contained in the module.
    fn func_count(&self) -> u32;

    /// Iterator over all functions in the module.
    fn funcs(&self) -> Box<dyn Iterator<Item = Self::FuncRef> + '_>;

    /// Linkage name of the function.
    fn func_link_name(&self, func: Self::FuncRef) -> Cow<'_, str>;

    /// Whether the function only declares a symbol and has no body.
    fn func_is_declaration(&self, func: Self::FuncRef) -> bool;

    /// Switch to the given function. Returns false if it has no body.
    fn switch_func(&mut self, func: Self::FuncRef) -> bool;

    /// Reset internal state between functions.
    fn reset(&mut self);

    /// Formal arguments of the current function.
    fn cur_args(&self) -> Box<dyn Iterator<Item = Self::ValueRef> + '_>;

    /// Iterator over blocks in the current function.
    ///
    /// ```ignore
    /// adaptor.switch_func(func);
    /// for block in adaptor.blocks() {
    ///     for inst in adaptor.block_insts(block) {
    ///         let _ = adaptor.inst_is_call(inst);
    ///     }
    /// }
    /// ```
    fn blocks(&self) -> Box<dyn Iterator<Item = Self::BlockRef> + '_>;

    /// Iterator over instructions of the given block.
    fn block_insts(&self, block: Self::BlockRef) -> Box<dyn Iterator<Item = Self::InstRef> + '_>;

    /// Whether the instruction is a call site.
    fn inst_is_call(&self, inst: Self::InstRef) -> bool;

    /// Name of a block (for tracing).
    fn block_name(&self, _block: Self::BlockRef) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}
