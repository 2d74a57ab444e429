//! # rdsl CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rdsl_cli::eval::{run_check, run_eval, CheckArgs, EvalArgs};
use rdsl_cli::load_config;
use rdsl_cli::schema::{run_contexts, run_schema, SchemaArgs};

/// Restricted configuration-script evaluator.
///
/// Evaluates settings, plugins and project scripts strictly against the
/// operations their context declares.
#[derive(Parser, Debug)]
#[command(name = "rdsl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Evaluator configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a script and print the configured model.
    Eval(EvalArgs),

    /// Parse and resolve a script without evaluating it.
    Check(CheckArgs),

    /// Print the analysis schema of a script context.
    Schema(SchemaArgs),

    /// List script contexts and their top-level receivers.
    Contexts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("rdsl CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Eval(args) => load_config(cli.config.as_deref()).and_then(|config| run_eval(&args, config)),
        Commands::Check(args) => load_config(cli.config.as_deref()).and_then(|config| run_check(&args, config)),
        Commands::Schema(args) => run_schema(&args),
        Commands::Contexts => run_contexts(),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
