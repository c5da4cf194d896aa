// This module implements the function pass manager that drives a pipeline of FunctionPass
// objects over one module. The manager runs every pass's do_initialization in pipeline
// order, then visits each function in module order (skipping declarations, which have no
// body to count), switching the adaptor to the function and running every pass on it,
// and finally runs do_finalization. Session and adaptor state are cleared after every
// function, including one whose passes failed. The manager enforces the preservation
// contract each pass declares through AnalysisUsage: a pass that claims to preserve all
// analyses must never report a modification. An optional function filter restricts the
// run to one function; a filter naming no function of the module fails before any hook
// runs.

//! Function pass manager.

use crate::core::adaptor::IrAdaptor;
use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::pass::{AnalysisUsage, FunctionPass, PassContext};

/// Outcome of a pass manager run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Functions the passes ran on.
    pub functions_run: usize,
    /// Declarations that were skipped.
    pub declarations_skipped: usize,
    /// Any hook reported a modification.
    pub modified: bool,
}

/// Runs a pipeline of function passes over a module.
pub struct FunctionPassManager<A: IrAdaptor> {
    passes: Vec<Box<dyn FunctionPass<A>>>,
    function_filter: Option<String>,
}

impl<A: IrAdaptor> FunctionPassManager<A> {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            function_filter: None,
        }
    }

    /// Append a pass to the pipeline.
    pub fn add(&mut self, pass: Box<dyn FunctionPass<A>>) {
        log::debug!("Adding pass '{}' to pipeline", pass.info().arg);
        self.passes.push(pass);
    }

    /// Only run on the function with this linkage name.
    pub fn set_function_filter(&mut self, name: impl Into<String>) {
        self.function_filter = Some(name.into());
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run the pipeline over every function of the adaptor's module.
    pub fn run(&mut self, adaptor: &mut A, ctx: &mut PassContext<'_, '_>) -> AnalysisResult<RunSummary> {
        let mut summary = RunSummary::default();

        let funcs: Vec<A::FuncRef> = adaptor.funcs().collect();
        if let Some(filter) = &self.function_filter {
            if !funcs.iter().any(|&func| adaptor.func_link_name(func) == filter.as_str()) {
                return Err(AnalysisError::FunctionNotFound { name: filter.clone() });
            }
        }

        let usages: Vec<AnalysisUsage> = self
            .passes
            .iter()
            .map(|pass| {
                let mut usage = AnalysisUsage::new();
                pass.get_analysis_usage(&mut usage);
                usage
            })
            .collect();

        for pass in &mut self.passes {
            summary.modified |= pass.do_initialization(adaptor, ctx)?;
        }

        log::info!("Running {} pass(es) over {} function(s)", self.passes.len(), funcs.len());

        for func in funcs {
            let name = adaptor.func_link_name(func).into_owned();
            if self.function_filter.as_ref().is_some_and(|filter| *filter != name) {
                continue;
            }

            if adaptor.func_is_declaration(func) || !adaptor.switch_func(func) {
                log::debug!("Skipping declaration {}", name);
                ctx.session.skip_declaration();
                summary.declarations_skipped += 1;
                continue;
            }

            log::debug!("Visiting function {}", name);
            ctx.session.start_function(&name);
            let result = Self::run_passes(&mut self.passes, &usages, adaptor, func, &name, ctx);
            ctx.session.end_function();
            adaptor.reset();

            summary.modified |= result?;
            summary.functions_run += 1;
        }

        for pass in &mut self.passes {
            summary.modified |= pass.do_finalization(adaptor, ctx)?;
        }

        ctx.out.flush()?;
        Ok(summary)
    }

    fn run_passes(
        passes: &mut [Box<dyn FunctionPass<A>>],
        usages: &[AnalysisUsage],
        adaptor: &A,
        func: A::FuncRef,
        name: &str,
        ctx: &mut PassContext<'_, '_>,
    ) -> AnalysisResult<bool> {
        let mut modified = false;
        for (pass, usage) in passes.iter_mut().zip(usages) {
            let changed = pass.run_on_function(adaptor, func, ctx)?;
            if changed && usage.preserves_all() {
                return Err(AnalysisError::PreservationViolated {
                    pass: pass.info().arg.to_string(),
                    function: name.to_string(),
                });
            }
            modified |= changed;
        }
        Ok(modified)
    }
}

impl<A: IrAdaptor> Default for FunctionPassManager<A> {
    fn default() -> Self {
        Self::new()
    }
}
