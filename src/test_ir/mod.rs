//! Test IR (TIR) parser and data structures for testing passes.
//!
//! This module provides a simple IR format for writing pass tests
//! without depending on LLVM-generated fixtures. The format is designed to be:
//! - Human-readable and writable
//! - Easy to parse
//! - Sufficient for exercising function, block and instruction walks
//!
//! # TIR Format
//!
//! ```text
//! ; Comments start with semicolon
//! func_name(%arg1, %arg2) {
//! entry:
//!     %val = add %arg1, %arg2
//!     %res = call @ext, %val
//!     br ^next_block
//! next_block:
//!     terminate
//! }
//! ext(%x)!
//! ```
//!
//! A trailing `!` marks a declaration.

pub mod adaptor;
pub mod parser;

pub use adaptor::TestIRAdaptor;

use crate::core::error::AnalysisResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestIR {
    pub functions: Vec<Function>,
    pub blocks: Vec<Block>,
    /// Arguments and instructions, in definition order.
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub declaration: bool,
    pub block_begin_idx: u32,
    pub block_end_idx: u32,
    pub arg_begin_idx: u32,
    pub arg_end_idx: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub inst_begin_idx: u32,
    pub inst_end_idx: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub name: String,
    pub op: Operation,
    /// For calls: index of the called function
    pub callee: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Arg,
    Any,
    Add,
    Sub,
    Phi,
    Terminate,
    Ret,
    Br,
    CondBr,
    Jump,
    Call,
}

impl Operation {
    pub const fn info(self) -> OpInfo {
        use Operation::*;
        match self {
            Arg => OpInfo { name: "<arg>", is_terminator: false, is_def: true },
            Any => OpInfo { name: "any", is_terminator: false, is_def: true },
            Add => OpInfo { name: "add", is_terminator: false, is_def: true },
            Sub => OpInfo { name: "sub", is_terminator: false, is_def: true },
            Phi => OpInfo { name: "phi", is_terminator: false, is_def: true },
            Terminate => OpInfo { name: "terminate", is_terminator: true, is_def: false },
            Ret => OpInfo { name: "ret", is_terminator: true, is_def: false },
            Br => OpInfo { name: "br", is_terminator: true, is_def: false },
            CondBr => OpInfo { name: "condbr", is_terminator: true, is_def: false },
            Jump => OpInfo { name: "jump", is_terminator: true, is_def: false },
            Call => OpInfo { name: "call", is_terminator: false, is_def: true },
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Operation::Add),
            "sub" => Some(Operation::Sub),
            "phi" => Some(Operation::Phi),
            "terminate" => Some(Operation::Terminate),
            "ret" => Some(Operation::Ret),
            "br" => Some(Operation::Br),
            "condbr" => Some(Operation::CondBr),
            "jump" => Some(Operation::Jump),
            "call" => Some(Operation::Call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub name: &'static str,
    pub is_terminator: bool,
    pub is_def: bool,
}

impl TestIR {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> AnalysisResult<Self> {
        parser::parse_ir(text)
    }
}
