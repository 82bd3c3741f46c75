//! # td - Task Dashboard CLI
//!
//! A terminal dashboard over an in-memory task and project dataset, with a
//! filter/sort/aggregate pipeline behind every view and an optional kanban
//! board TUI.
//!
//! ## Key Features
//!
//! - **In-Memory Dataset**: the store is seeded at startup (built-in sample
//!   data, or a JSON dataset passed via `--data`) and lives for the process
//!   lifetime; nothing is persisted implicitly.
//! - **Filter/Sort Pipeline**: conjunctive field filters plus free-text
//!   search, stable sorting by due date, priority, status or content.
//! - **Derived Aggregates**: status counts, priority breakdown, completion
//!   rate and per-assignee workload, over the full or a filtered collection.
//! - **Kanban Board**: a ratatui board with one column per status and
//!   unrestricted card movement between columns.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the board over the sample data
//! td board
//!
//! # List high-priority work, soonest due first
//! td list --priority high --sort due
//!
//! # Aggregates for one assignee
//! td stats --assignee Alice
//!
//! # Run against your own dataset and snapshot the result
//! td --data team.json add "Review Q3 roadmap" --project project-1
//! td --data team.json export --output snapshot.json
//! ```
//!
//! Tracing is opt-in via `RUST_LOG` (e.g. `RUST_LOG=taskdeck=debug`) and
//! goes to stderr so it never mixes with table output.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod cli;
pub mod cmd;
pub mod dates;
pub mod error;
pub mod fields;
pub mod filter;
pub mod project;
pub mod seed;
pub mod sort;
pub mod stats;
pub mod store;
pub mod task;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use fields::TaskStatus;
use store::Store;

fn main() {
    // Tracing is opt-in via RUST_LOG and stays off otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    // Completions don't need a dataset.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let mut store: Store = match cli.data {
        Some(ref path) => match seed::load_dataset(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Failed to load dataset {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => seed::sample(),
    };

    match cli.command {
        Commands::Board => cmd_board(store),

        Commands::Add {
            content,
            project,
            assign,
            due,
            priority,
            status,
        } => cmd_add(&mut store, content, project, assign, due, priority, status),

        Commands::List {
            status,
            priority,
            assignee,
            project,
            search,
            sort,
            direction,
            limit,
        } => cmd_list(
            &store, status, priority, assignee, project, search, sort, direction, limit,
        ),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id,
            content,
            assign,
            due,
            priority,
            status,
            project,
            clear_due,
            clear_assignee,
        } => cmd_update(
            &mut store,
            id,
            content,
            assign,
            due,
            priority,
            status,
            project,
            clear_due,
            clear_assignee,
        ),

        Commands::Complete { id } => cmd_set_status(&mut store, id, TaskStatus::Done),

        Commands::Reopen { id } => cmd_set_status(&mut store, id, TaskStatus::Todo),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Assign { id, who, clear } => cmd_assign(&mut store, id, who, clear),

        Commands::Project { action } => cmd_project(&mut store, action),

        Commands::Stats {
            status,
            priority,
            assignee,
            project,
            search,
        } => cmd_stats(&store, status, priority, assignee, project, search),

        Commands::Export { output } => cmd_export(&store, output),

        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
