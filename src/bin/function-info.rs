//! Command-line driver for the function-info pass.
//!
//! Loads each input module (textual IR, bitcode, or `-` for stdin), runs the
//! selected passes over it and prints their diagnostics.

use bumpalo::Bump;
use clap::{Parser, ValueEnum};
use function_info::{
    load_module, AnalysisError, AnalysisSession, FunctionPassManager, IrAdaptor, LlvmAdaptor,
    OutputFormat, PassContext, PassOptions, PassRegistry,
};
use inkwell::context::Context;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stream {
    Stderr,
    Stdout,
}

/// Print argument, basic block and instruction counts for every function of an LLVM module.
#[derive(Debug, Parser)]
#[command(name = "function-info", version)]
struct Cli {
    /// LLVM modules to analyze (.ll, .bc, or - for stdin)
    #[arg(required_unless_present = "list_passes")]
    inputs: Vec<PathBuf>,

    /// Pass to run; may be given more than once
    #[arg(short, long = "pass", value_name = "ARG", default_value = "function-info")]
    passes: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stream the diagnostics are written to
    #[arg(short, long, value_enum, default_value_t = Stream::Stderr)]
    output: Stream,

    /// Only analyze the function with this name; inputs that do not define it are
    /// skipped, and it is an error if no input does
    #[arg(long, value_name = "NAME")]
    function: Option<String>,

    /// Tag printed before the text-mode banner (empty for none)
    #[arg(long, value_name = "TAG", default_value = PassOptions::DEFAULT_BANNER_TAG)]
    banner_tag: String,

    /// Print session totals after each module
    #[arg(long)]
    stats: bool,

    /// List registered passes and exit
    #[arg(long)]
    list_passes: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_passes {
        for info in PassRegistry::<LlvmAdaptor<'_, '_>>::with_builtin_passes().infos() {
            println!("  -{:<20} - {}", info.arg, info.name);
        }
        return Ok(());
    }

    let options = PassOptions {
        format: match cli.format {
            Format::Text => OutputFormat::Text,
            Format::Csv => OutputFormat::Csv,
        },
        banner_tag: Some(cli.banner_tag.clone()).filter(|tag| !tag.is_empty()),
    };

    let mut out: Box<dyn Write> = match cli.output {
        Stream::Stderr => Box::new(io::stderr().lock()),
        Stream::Stdout => Box::new(io::stdout().lock()),
    };

    let context = Context::create();
    let mut function_found = false;
    for path in &cli.inputs {
        let module = load_module(&context, path)?;
        let mut adaptor = LlvmAdaptor::new(&module);

        if let Some(name) = &cli.function {
            if !adaptor.funcs().any(|func| adaptor.func_link_name(func) == name.as_str()) {
                log::info!("{}: no function named {}, skipping", path.display(), name);
                continue;
            }
            function_found = true;
        }

        let registry = PassRegistry::with_builtin_passes();
        let mut pm = FunctionPassManager::new();
        for arg in &cli.passes {
            pm.add(registry.create(arg, &options)?);
        }
        if let Some(name) = &cli.function {
            pm.set_function_filter(name.as_str());
        }

        let arena = Bump::new();
        let session = AnalysisSession::new(&arena);
        let summary = {
            let mut ctx = PassContext::new(&mut *out, &session);
            pm.run(&mut adaptor, &mut ctx)?
        };
        log::info!(
            "{}: {} function(s) analyzed, {} declaration(s) skipped",
            path.display(),
            summary.functions_run,
            summary.declarations_skipped
        );

        if cli.stats {
            writeln!(out, "{}", session.stats())?;
        }
    }

    if let Some(name) = &cli.function {
        if !function_found {
            return Err(AnalysisError::FunctionNotFound { name: name.clone() }.into());
        }
    }

    Ok(())
}
