// This module implements the function-info pass: a read-only analysis that, for every
// function with a body, counts its formal arguments, basic blocks and instructions (plus
// call sites) in a single linear walk and prints the result to the diagnostic stream.
// Text mode opens with a banner whose tag prefix comes from PassOptions.
// The pass preserves all analyses and never reports a modification. Two output formats
// are supported: the line-oriented text report ("Function name is ..." followed by one
// line per count) and a tab-separated CSV table with a header row. Every function's
// counts are also recorded in the analysis session for the driver's summary.

//! Per-function argument, block and instruction counts.

use crate::core::adaptor::IrAdaptor;
use crate::core::error::AnalysisResult;
use crate::core::pass::{AnalysisUsage, FunctionPass, OutputFormat, PassContext, PassInfo, PassOptions};
use crate::core::session::FunctionCounts;
use std::io::Write;

/// Count arguments, call sites, blocks and instructions of the current function.
pub fn count_function<A: IrAdaptor>(adaptor: &A) -> FunctionCounts {
    let mut counts = FunctionCounts {
        args: adaptor.cur_args().count(),
        ..FunctionCounts::default()
    };

    for block in adaptor.blocks() {
        counts.blocks += 1;
        for inst in adaptor.block_insts(block) {
            counts.insts += 1;
            if adaptor.inst_is_call(inst) {
                counts.calls += 1;
            }
        }
        log::trace!("Block {} done, {} instructions so far", adaptor.block_name(block), counts.insts);
    }

    counts
}

/// The function-info pass.
#[derive(Debug)]
pub struct FunctionInfo {
    format: OutputFormat,
    banner: String,
    printed: usize,
}

impl FunctionInfo {
    pub const INFO: PassInfo = PassInfo {
        arg: "function-info",
        name: "CSE521: Function Information",
        cfg_only: false,
        is_analysis: false,
    };

    pub const TITLE: &'static str = "Function Information Pass";
    pub const CSV_HEADER: &'static str = "Name,\tArgs,\tCalls,\tBlocks,\tInsns";

    pub fn new() -> Self {
        Self::with_options(&PassOptions::default())
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self::with_options(&PassOptions::with_format(format))
    }

    pub fn with_options(options: &PassOptions) -> Self {
        let banner = match options.banner_tag.as_deref() {
            Some(tag) if !tag.is_empty() => format!("{} {}", tag, Self::TITLE),
            _ => Self::TITLE.to_string(),
        };
        Self {
            format: options.format,
            banner,
            printed: 0,
        }
    }

    /// Boxed constructor used by the pass registry.
    pub fn boxed<A: IrAdaptor>(options: &PassOptions) -> Box<dyn FunctionPass<A>> {
        Box::new(Self::with_options(options))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Line printed before the first text-mode report.
    pub fn banner(&self) -> &str {
        &self.banner
    }

    fn print(&self, out: &mut dyn Write, name: &str, counts: &FunctionCounts) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                write!(out, "\nFunction name is {}", name)?;
                write!(out, "\nThe number of arguments in this function are {}", counts.args)?;
                write!(out, "\nThe number of basic blocks in this function are {}", counts.blocks)?;
                write!(out, "\nThe number of instructions in this function are {}", counts.insts)
            }
            OutputFormat::Csv => writeln!(
                out,
                "{},\t{},\t{},\t{},\t{}",
                name, counts.args, counts.calls, counts.blocks, counts.insts
            ),
        }
    }
}

impl Default for FunctionInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: IrAdaptor> FunctionPass<A> for FunctionInfo {
    fn info(&self) -> PassInfo {
        Self::INFO
    }

    fn get_analysis_usage(&self, usage: &mut AnalysisUsage) {
        usage.set_preserves_all();
    }

    fn do_initialization(&mut self, _adaptor: &A, ctx: &mut PassContext<'_, '_>) -> AnalysisResult<bool> {
        self.printed = 0;
        match self.format {
            OutputFormat::Text => writeln!(ctx.out, "{}", self.banner)?,
            OutputFormat::Csv => writeln!(ctx.out, "{}", Self::CSV_HEADER)?,
        }
        Ok(false)
    }

    fn run_on_function(
        &mut self,
        adaptor: &A,
        func: A::FuncRef,
        ctx: &mut PassContext<'_, '_>,
    ) -> AnalysisResult<bool> {
        let name = adaptor.func_link_name(func);
        let counts = count_function(adaptor);
        log::debug!(
            "{}: {} args, {} calls, {} blocks, {} instructions",
            name,
            counts.args,
            counts.calls,
            counts.blocks,
            counts.insts
        );

        self.print(&mut *ctx.out, &name, &counts)?;
        ctx.session.record_function(&name, counts);
        self.printed += 1;
        Ok(false)
    }

    fn do_finalization(&mut self, _adaptor: &A, ctx: &mut PassContext<'_, '_>) -> AnalysisResult<bool> {
        if self.format == OutputFormat::Text && self.printed > 0 {
            writeln!(ctx.out)?;
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisSession, FunctionPassManager};
    use crate::test_ir::{TestIR, TestIRAdaptor};
    use bumpalo::Bump;

    const MODULE: &str = r#"
; helper with a loop
sum(%n, %acc) {
entry:
  %zero =
  br ^loop
loop:
  %i = phi [^entry, %zero], [^loop, %next]
  %next = add %i, %n
  %r = call @puts, %next
  condbr %next, ^loop, ^exit
exit:
  ret %acc
}
puts(%s)!
empty() {
entry:
  terminate
}
"#;

    fn run(format: OutputFormat) -> (String, Vec<(String, FunctionCounts)>) {
        let ir = TestIR::parse(MODULE).unwrap();
        let mut adaptor = TestIRAdaptor::new(&ir);
        let arena = Bump::new();
        let session = AnalysisSession::new(&arena);
        let mut out = Vec::new();

        {
            let mut ctx = PassContext::new(&mut out, &session);
            let mut pm: FunctionPassManager<TestIRAdaptor<'_>> = FunctionPassManager::new();
            pm.add(Box::new(FunctionInfo::with_format(format)));
            let summary = pm.run(&mut adaptor, &mut ctx).unwrap();
            assert!(!summary.modified);
        }

        let reports = session
            .functions()
            .iter()
            .map(|r| (r.name.to_string(), r.counts))
            .collect();
        (String::from_utf8(out).unwrap(), reports)
    }

    #[test]
    fn test_count_function() {
        let ir = TestIR::parse(MODULE).unwrap();
        let mut adaptor = TestIRAdaptor::new(&ir);
        let sum = adaptor.funcs().next().unwrap();
        assert!(adaptor.switch_func(sum));

        let counts = count_function(&adaptor);
        assert_eq!(counts, FunctionCounts { args: 2, calls: 1, blocks: 3, insts: 7 });
    }

    #[test]
    fn test_text_output() {
        let (out, _) = run(OutputFormat::Text);
        let expected = "CSE521 Function Information Pass\n\
                        \nFunction name is sum\
                        \nThe number of arguments in this function are 2\
                        \nThe number of basic blocks in this function are 3\
                        \nThe number of instructions in this function are 7\
                        \nFunction name is empty\
                        \nThe number of arguments in this function are 0\
                        \nThe number of basic blocks in this function are 1\
                        \nThe number of instructions in this function are 1\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_csv_output() {
        let (out, _) = run(OutputFormat::Csv);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, [FunctionInfo::CSV_HEADER, "sum,\t2,\t1,\t3,\t7", "empty,\t0,\t0,\t1,\t1"]);
    }

    #[test]
    fn test_declarations_not_reported() {
        let (_, reports) = run(OutputFormat::Text);
        let names: Vec<_> = reports.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["sum", "empty"]);
    }

    #[test]
    fn test_banner_tag() {
        assert_eq!(FunctionInfo::new().banner(), "CSE521 Function Information Pass");

        let untagged = PassOptions { banner_tag: None, ..PassOptions::default() };
        assert_eq!(FunctionInfo::with_options(&untagged).banner(), FunctionInfo::TITLE);

        let custom = PassOptions { banner_tag: Some("CS101".to_string()), ..PassOptions::default() };
        assert_eq!(FunctionInfo::with_options(&custom).banner(), "CS101 Function Information Pass");
    }

    #[test]
    fn test_preserves_all() {
        let pass = FunctionInfo::new();
        let mut usage = AnalysisUsage::new();
        FunctionPass::<TestIRAdaptor<'_>>::get_analysis_usage(&pass, &mut usage);
        assert!(usage.preserves_all());
    }
}
