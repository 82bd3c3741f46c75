use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal dashboard over an in-memory task dataset.
/// State is seeded at startup and lives for the process lifetime only.
#[derive(Parser)]
#[command(name = "td", version, about = "Task and project dashboard for the terminal")]
pub struct Cli {
    /// Path to a JSON dataset file. Defaults to the built-in sample data.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
