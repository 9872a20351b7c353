//! matmul-tester: correctness and latency harness for matrix-multiplication servers.
//!
//! Three commands: `run` sends every catalog task to the server and reports
//! timings, `verify` checks a server-produced results file against
//! recomputed products, `add` appends a freshly generated task to the catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::GlobalArgs;

/// Matrix-multiplication server test harness
#[derive(Parser)]
#[command(name = "matmul-tester")]
#[command(about = "Generate, dispatch and verify matrix-multiplication tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send every catalog task to the server and report timings
    ///
    /// Tasks are sent one at a time in catalog order. A task whose request
    /// fails is reported and skipped; the run continues with the next one.
    #[command(alias = "run_tests")]
    Run,

    /// Verify a server-produced results file
    ///
    /// Recomputes the product for every entry and compares it exactly with
    /// the claimed result. Each entry gets its own verdict.
    #[command(alias = "test_server_output")]
    Verify {
        /// Path to the results JSON file
        path: PathBuf,

        /// Exit with an error if any entry is not correct
        #[arg(long)]
        strict: bool,
    },

    /// Generate a task and append it to the catalog
    ///
    /// For matrix_multiplication a size of RxC produces A (RxC) and B (CxR).
    #[command(alias = "add_task")]
    Add {
        /// Task kind, e.g. matrix_multiplication
        task_name: String,

        /// Size token RxC, e.g. 100x100
        size: String,

        /// Seed for reproducible fixtures (default: random)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    commands::apply_color(cli.global.no_color);

    match cli.command {
        Commands::Run => {
            let settings = cli.global.resolve()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::run::execute(settings))?;
        },
        Commands::Verify { path, strict } => {
            commands::verify::execute(&path, strict)?;
        },
        Commands::Add {
            task_name,
            size,
            seed,
        } => {
            let settings = cli.global.resolve()?;
            commands::add::execute(&settings, &task_name, &size, seed)?;
        },
    }
    Ok(())
}

/// Log to stderr so stdout carries only report lines.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
