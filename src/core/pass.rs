// This module defines the function pass protocol. A FunctionPass mirrors the lifecycle a
// legacy pass manager drives: one do_initialization call per module, one run_on_function
// call per defined function, and one do_finalization call at the end. Every hook returns
// whether it modified the IR. Passes describe themselves through PassInfo (the command-line
// argument and human-readable name they are registered under) and declare which analyses
// they keep valid through AnalysisUsage. PassContext carries what the host would otherwise
// provide globally: the diagnostic output stream and the analysis session.

//! Function pass protocol.

use crate::core::adaptor::IrAdaptor;
use crate::core::error::AnalysisResult;
use crate::core::session::AnalysisSession;
use std::io::Write;

/// Static description of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassInfo {
    /// Command-line argument selecting the pass.
    pub arg: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Pass only looks at the CFG.
    pub cfg_only: bool,
    /// Pass is an analysis pass.
    pub is_analysis: bool,
}

/// How passes print their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

/// Options handed to pass constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOptions {
    pub format: OutputFormat,
    /// Prefix of the text-mode banner; `None` prints the bare title.
    pub banner_tag: Option<String>,
}

impl PassOptions {
    pub const DEFAULT_BANNER_TAG: &'static str = "CSE521";

    pub fn with_format(format: OutputFormat) -> Self {
        Self { format, ..Self::default() }
    }
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            banner_tag: Some(Self::DEFAULT_BANNER_TAG.to_string()),
        }
    }
}

/// Which analyses a pass keeps valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisUsage {
    preserves_all: bool,
    preserves_cfg: bool,
}

impl AnalysisUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pass does not modify the IR at all.
    pub fn set_preserves_all(&mut self) {
        self.preserves_all = true;
        self.preserves_cfg = true;
    }

    /// The pass does not change the CFG.
    pub fn set_preserves_cfg(&mut self) {
        self.preserves_cfg = true;
    }

    pub fn preserves_all(&self) -> bool {
        self.preserves_all
    }

    pub fn preserves_cfg(&self) -> bool {
        self.preserves_cfg
    }
}

/// State shared by all passes of a run.
pub struct PassContext<'a, 'arena> {
    /// Diagnostic output stream.
    pub out: &'a mut dyn Write,
    pub session: &'a AnalysisSession<'arena>,
}

impl<'a, 'arena> PassContext<'a, 'arena> {
    pub fn new(out: &'a mut dyn Write, session: &'a AnalysisSession<'arena>) -> Self {
        Self { out, session }
    }
}

/// A pass invoked once per defined function of a module.
pub trait FunctionPass<A: IrAdaptor> {
    fn info(&self) -> PassInfo;

    /// Declare the analyses this pass preserves. Preserves nothing by default.
    fn get_analysis_usage(&self, _usage: &mut AnalysisUsage) {}

    /// Called once before any function is visited.
    fn do_initialization(&mut self, _adaptor: &A, _ctx: &mut PassContext<'_, '_>) -> AnalysisResult<bool> {
        Ok(false)
    }

    /// Called for every function with a body. `adaptor` is already switched to `func`.
    fn run_on_function(
        &mut self,
        adaptor: &A,
        func: A::FuncRef,
        ctx: &mut PassContext<'_, '_>,
    ) -> AnalysisResult<bool>;

    /// Called once after all functions were visited.
    fn do_finalization(&mut self, _adaptor: &A, _ctx: &mut PassContext<'_, '_>) -> AnalysisResult<bool> {
        Ok(false)
    }
}
