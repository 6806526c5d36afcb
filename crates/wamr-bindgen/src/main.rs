//! wamr-bindgen - generate Rust bindings for WAMR's `wasm_c_api.h`
//!
//! Usage: wamr-bindgen [--root DIR] [--config FILE] [--output FILE] [--check]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use wamr_bindgen::{BindgenConfig, Mode, Pipeline, PipelineOptions};

#[derive(ClapParser, Debug)]
#[command(name = "wamr-bindgen")]
#[command(version)]
#[command(about = "Generate Rust FFI bindings for the WAMR wasm C API", long_about = None)]
struct Args {
    /// Project root holding the runtime checkout
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Binding table (defaults to the bundled wamr.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (defaults to the table's `output`, under the root)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// C preprocessor program
    #[arg(long)]
    cpp: Option<String>,

    /// Fail if the output is missing or out of date instead of writing it
    #[arg(long)]
    check: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("wamr_bindgen=debug")
        } else {
            EnvFilter::new("wamr_bindgen=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BindgenConfig::load(path)
            .with_context(|| format!("loading binding table {}", path.display()))?,
        None => BindgenConfig::wamr(),
    };
    if let Some(cpp) = &args.cpp {
        config.preprocessor.clone_from(cpp);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(&args.root));
    let mode = if args.check { Mode::Check } else { Mode::Write };

    tracing::debug!(root = %args.root.display(), output = %output.display(), ?mode, "starting");

    let pipeline = Pipeline::new(config).with_options(PipelineOptions {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
    });
    pipeline
        .run(&args.root, &output, mode)
        .with_context(|| format!("generating {}", output.display()))?;

    Ok(())
}
