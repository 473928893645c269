use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Init(args) => workflow::run_init(args),
        Command::Submit(args) => workflow::run_submit(args),
        Command::List(args) => workflow::run_list(args),
    }
}

/// Logs go to stderr; stdout carries replies and JSON output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "warn,review_enrich=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
