//! The main entry point for the `far` command-line application.
//!
//! This file is responsible for parsing command-line arguments, setting up
//! logging, and handing the validated run to the `far` library.

use far::cli::{self, Args};
use far::errors::Result;
use far::review::ConsolePrompter;
use far::{RunConfig, Summary, pipeline};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Check if no arguments provided (just 'far')
    if env::args().len() == 1 {
        println!("Interactive find-and-replace across a file tree\n");
        println!("QUICK START EXAMPLES:");
        println!("  far 'colour' 'color'              # Replace everywhere under .");
        println!("  far -i 'TODO' 'DONE' src/         # Approve each change");
        println!("  far -p 'v1\\.2' 'v1.3'             # Preview without writing");
        println!("  far -x rs -e target 'foo' 'bar'   # Only .rs files, skip target/\n");
        println!("Run 'far --help' for full option list");
        return ExitCode::SUCCESS;
    }

    let args = cli::parse_args();
    init_tracing(args.verbose);

    match execute(&args) {
        Ok(summary) if summary.has_failures() => {
            for (path, reason) in &summary.failed {
                eprintln!("Failed to update {path}: {reason}");
            }
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_usage() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn execute(args: &Args) -> Result<Summary> {
    let config = RunConfig::from_args(args)?;
    let mut prompter = ConsolePrompter::stdio();
    let mut stdout = io::stdout().lock();
    pipeline::run(&config, &mut prompter, &mut stdout)
}

/// Logs go to stderr so they never mix with the review display.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FAR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "far=debug" } else { "far=warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
