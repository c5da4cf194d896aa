// This module implements IrAdaptor for LLVM modules loaded through inkwell. LlvmAdaptor
// borrows a Module and exposes its functions in module order. Linkage names are cached
// up front in a map keyed by function, so lookups hand out borrowed strings. Declarations
// (functions without basic blocks) are reported as such and switching to them fails.
// Per-function queries walk the current function's formal parameters, its basic blocks in
// layout order, and each block's instructions. Call sites are the call, invoke and callbr
// opcodes, which covers every instruction LLVM treats as a call base.

//! Adaptor walking an LLVM [`Module`] using `inkwell`.

use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::IrAdaptor;
use inkwell::{
    basic_block::BasicBlock,
    module::Module,
    values::{BasicValueEnum, FunctionValue, InstructionOpcode, InstructionValue},
};
use hashbrown::HashMap;
use std::borrow::Cow;

/// Read-only view over the functions of an LLVM module.
pub struct LlvmAdaptor<'m, 'ctx> {
    module: &'m Module<'ctx>,
    funcs: Vec<FunctionValue<'ctx>>,
    names: HashMap<FunctionValue<'ctx>, String>,
    current: Option<FunctionValue<'ctx>>,
}

impl<'m, 'ctx> LlvmAdaptor<'m, 'ctx> {
    /// Create a new adaptor collecting all functions in the module.
    pub fn new(module: &'m Module<'ctx>) -> Self {
        let funcs: Vec<_> = module.get_functions().collect();
        let names = funcs
            .iter()
            .map(|&f| (f, f.get_name().to_string_lossy().into_owned()))
            .collect();
        log::debug!(
            "Module {} has {} function(s)",
            module.get_name().to_string_lossy(),
            funcs.len()
        );
        Self {
            module,
            funcs,
            names,
            current: None,
        }
    }

    pub fn module(&self) -> &'m Module<'ctx> {
        self.module
    }

    /// Look up a function by name.
    pub fn find_function(&self, name: &str) -> AnalysisResult<FunctionValue<'ctx>> {
        self.module
            .get_function(name)
            .ok_or_else(|| AnalysisError::FunctionNotFound {
                name: name.to_string(),
            })
    }

    /// Function selected by the last `switch_func`.
    pub fn current(&self) -> Option<FunctionValue<'ctx>> {
        self.current
    }
}

impl<'m, 'ctx> IrAdaptor for LlvmAdaptor<'m, 'ctx> {
    type ValueRef = BasicValueEnum<'ctx>;
    type InstRef = InstructionValue<'ctx>;
    type BlockRef = BasicBlock<'ctx>;
    type FuncRef = FunctionValue<'ctx>;

    fn func_count(&self) -> u32 {
        self.funcs.len() as u32
    }

    fn funcs(&self) -> Box<dyn Iterator<Item = Self::FuncRef> + '_> {
        Box::new(self.funcs.iter().copied())
    }

    fn func_link_name(&self, func: Self::FuncRef) -> Cow<'_, str> {
        match self.names.get(&func) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(func.get_name().to_string_lossy().into_owned()),
        }
    }

    fn func_is_declaration(&self, func: Self::FuncRef) -> bool {
        func.count_basic_blocks() == 0
    }

    fn switch_func(&mut self, func: Self::FuncRef) -> bool {
        self.current = Some(func);
        !self.func_is_declaration(func)
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn cur_args(&self) -> Box<dyn Iterator<Item = Self::ValueRef> + '_> {
        match self.current {
            Some(func) => Box::new(func.get_param_iter()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = Self::BlockRef> + '_> {
        match self.current {
            Some(func) => Box::new(func.get_basic_blocks().into_iter()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn block_insts(&self, block: Self::BlockRef) -> Box<dyn Iterator<Item = Self::InstRef> + '_> {
        Box::new(block.get_instructions())
    }

    fn inst_is_call(&self, inst: Self::InstRef) -> bool {
        matches!(
            inst.get_opcode(),
            InstructionOpcode::Call | InstructionOpcode::Invoke | InstructionOpcode::CallBr
        )
    }

    fn block_name(&self, block: Self::BlockRef) -> Cow<'_, str> {
        Cow::Owned(block.get_name().to_string_lossy().into_owned())
    }
}
