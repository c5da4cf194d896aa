//! TestIR adaptor implementation.
//!
//! This adaptor lets passes run over TestIR, enabling tests of the pass
//! framework with small hand-written modules.

use super::{Function, Operation, TestIR};
use crate::core::IrAdaptor;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(pub u32);

/// Adaptor that implements IrAdaptor for TestIR
pub struct TestIRAdaptor<'ir> {
    ir: &'ir TestIR,
    cur_func: Option<u32>,
}

impl<'ir> TestIRAdaptor<'ir> {
    pub fn new(ir: &'ir TestIR) -> Self {
        Self { ir, cur_func: None }
    }

    fn current(&self) -> Option<&'ir Function> {
        self.cur_func.map(|idx| &self.ir.functions[idx as usize])
    }
}

impl<'ir> IrAdaptor for TestIRAdaptor<'ir> {
    type ValueRef = ValueRef;
    type InstRef = InstRef;
    type BlockRef = BlockRef;
    type FuncRef = FuncRef;

    fn func_count(&self) -> u32 {
        self.ir.functions.len() as u32
    }

    fn funcs(&self) -> Box<dyn Iterator<Item = FuncRef> + '_> {
        Box::new((0..self.func_count()).map(FuncRef))
    }

    fn func_link_name(&self, func: FuncRef) -> Cow<'_, str> {
        Cow::Borrowed(&self.ir.functions[func.0 as usize].name)
    }

    fn func_is_declaration(&self, func: FuncRef) -> bool {
        self.ir.functions[func.0 as usize].declaration
    }

    fn switch_func(&mut self, func: FuncRef) -> bool {
        self.cur_func = Some(func.0);
        !self.func_is_declaration(func)
    }

    fn reset(&mut self) {
        self.cur_func = None;
    }

    fn cur_args(&self) -> Box<dyn Iterator<Item = ValueRef> + '_> {
        match self.current() {
            Some(func) => Box::new((func.arg_begin_idx..func.arg_end_idx).map(ValueRef)),
            None => Box::new(std::iter::empty()),
        }
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockRef> + '_> {
        match self.current() {
            Some(func) => Box::new((func.block_begin_idx..func.block_end_idx).map(BlockRef)),
            None => Box::new(std::iter::empty()),
        }
    }

    fn block_insts(&self, block: BlockRef) -> Box<dyn Iterator<Item = InstRef> + '_> {
        let block = &self.ir.blocks[block.0 as usize];
        Box::new((block.inst_begin_idx..block.inst_end_idx).map(InstRef))
    }

    fn inst_is_call(&self, inst: InstRef) -> bool {
        self.ir.values[inst.0 as usize].op == Operation::Call
    }

    fn block_name(&self, block: BlockRef) -> Cow<'_, str> {
        Cow::Borrowed(&self.ir.blocks[block.0 as usize].name)
    }
}
