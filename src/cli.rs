//! CLI argument parsing.
//!
//! The CLI is a thin front end: it fills a review form from flags and hands
//! it to the same orchestrator a GUI would use.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "review-enrich",
    version,
    about = "Collect a review, enrich it with an LM, and store it",
    after_help = "Commands:\n  init                                  Write a default config.json\n  submit --rating <1-5> --text <TEXT>   Enrich and store one review\n  list                                  Show recently stored reviews\n\nExamples:\n  review-enrich init\n  review-enrich submit --rating 5 --text \"Great service!\"\n  echo \"Slow delivery\" | review-enrich submit --rating 2 --text-file -\n  review-enrich list --limit 5 --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug logs for this tool (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Submit(SubmitArgs),
    List(ListArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write a default config.json")]
pub struct InitArgs {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Overwrite an existing config.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Enrich one review and store it")]
pub struct SubmitArgs {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Star rating from 1 to 5 (0 leaves it unselected)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub rating: u8,

    /// Review text
    #[arg(long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the review text from a file (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub text_file: Option<PathBuf>,

    /// LM command for the command backend (overrides config and environment)
    #[arg(long, value_name = "CMD")]
    pub enrich_command: Option<String>,

    /// Emit the reply as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show recently stored reviews")]
pub struct ListArgs {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum number of reviews to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
