//! Command implementations for the CLI interface.
//!
//! Each handler runs one pass of the pipeline (store → filter → sort →
//! aggregates → print) or applies one mutation through the store. Store
//! errors go to stderr with a non-zero exit; the handlers stay thin so
//! the pipeline stages remain testable on their own.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{Local, NaiveDate};

use crate::dates::{describe_due, parse_due_input};
use crate::fields::{
    format_priority, format_project_status, format_task_status, Priority, ProjectStatus,
    SortDirection, SortKey, TaskStatus,
};
use crate::filter::TaskFilter;
use crate::project::{Project, ProjectDraft};
use crate::seed::Dataset;
use crate::sort::sort_tasks;
use crate::stats::{completion_rate, priority_breakdown, status_counts, workload};
use crate::store::Store;
use crate::task::{Task, TaskDraft, TaskUpdate};
use crate::tui::run::run_board;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the kanban board interface.
    Board,

    /// Add a new task.
    Add {
        /// Free-text description of the work.
        content: String,
        /// Project the task belongs to (id or name).
        #[arg(long)]
        project: String,
        /// Assignee display name.
        #[arg(long)]
        assign: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Status column: todo | in-progress | review | done.
        #[arg(long, value_enum, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by assignee display name.
        #[arg(long)]
        assignee: Option<String>,
        /// Filter by project (id or name).
        #[arg(long)]
        project: Option<String>,
        /// Case-insensitive substring search over content and assignee.
        #[arg(long)]
        search: Option<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Sort direction.
        #[arg(long, value_enum, default_value_t = SortDirection::Asc)]
        direction: SortDirection,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id or content.
    View {
        /// Task id or content to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id or content to update.
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        assign: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Move the task to another project (id or name).
        #[arg(long)]
        project: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        /// Clear the assignee.
        #[arg(long)]
        clear_assignee: bool,
    },

    /// Mark a task done.
    Complete {
        /// Task id or content to complete.
        id: String,
    },

    /// Move a task back to the To Do column.
    Reopen {
        /// Task id or content to reopen.
        id: String,
    },

    /// Delete a task by id or content.
    Delete {
        /// Task id or content to delete.
        id: String,
    },

    /// Assign a task to someone, or clear the assignee.
    Assign {
        /// Task id or content.
        id: String,
        /// Assignee display name.
        who: Option<String>,
        /// Clear the assignee instead of setting one.
        #[arg(long)]
        clear: bool,
    },

    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Show aggregate statistics, optionally over a filtered subset.
    Stats {
        /// Restrict to a status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Restrict to a priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Restrict to an assignee.
        #[arg(long)]
        assignee: Option<String>,
        /// Restrict to a project (id or name).
        #[arg(long)]
        project: Option<String>,
        /// Restrict by substring search.
        #[arg(long)]
        search: Option<String>,
    },

    /// Export the current dataset as JSON.
    Export {
        /// Output file path (default: taskdeck.json).
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects with task counts.
    List,

    /// Add a new project.
    Add {
        /// Project name.
        name: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Status: planning | active | on-hold | completed | cancelled.
        #[arg(long, value_enum, default_value_t = ProjectStatus::Planning)]
        status: ProjectStatus,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Manager display name.
        #[arg(long)]
        manager: Option<String>,
        /// Member display name. May be repeated.
        #[arg(long = "member")]
        members: Vec<String>,
        /// Free-form category.
        #[arg(long)]
        category: Option<String>,
        /// Tag. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Start date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        start: Option<String>,
        /// Due date in the same formats.
        #[arg(long)]
        due: Option<String>,
        /// Progress, 0-100.
        #[arg(long, default_value_t = 0)]
        progress: u8,
    },

    /// View a project and the tasks it owns.
    View {
        /// Project id or name to view.
        id: String,
    },

    /// Delete a project and every task it owns.
    Delete {
        /// Project id or name to delete.
        id: String,
    },
}

/// Launch the board TUI over the current store.
pub fn cmd_board(store: Store) {
    if let Err(e) = run_board(store) {
        eprintln!("Board error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(
    store: &mut Store,
    content: String,
    project: String,
    assign: Option<String>,
    due: Option<String>,
    priority: Priority,
    status: TaskStatus,
) {
    let project_id = resolve_project_or_exit(store, &project);
    let due = due.map(|ds| parse_due_or_exit(&ds));
    match store.add_task(TaskDraft {
        content,
        assigned_to: assign,
        due,
        priority,
        status,
        project_id,
    }) {
        Ok(task) => println!("Added task {} to {}", task.id, task.project_id),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// List tasks: filter, sort, truncate, print.
pub fn cmd_list(
    store: &Store,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    assignee: Option<String>,
    project: Option<String>,
    search: Option<String>,
    sort: SortKey,
    direction: SortDirection,
    limit: Option<usize>,
) {
    let project = project.map(|p| resolve_project_or_exit(store, &p));
    let filter = TaskFilter {
        status,
        priority,
        assignee,
        project,
        search: search.unwrap_or_default(),
    };
    let mut filtered = filter.apply(store.tasks());
    sort_tasks(&mut filtered, sort, direction);
    if let Some(n) = limit {
        filtered.truncate(n);
    }
    if filtered.is_empty() {
        if filter.is_empty() {
            println!("No tasks in the dataset.");
        } else {
            println!("No tasks match the current filters.");
        }
        return;
    }
    print_task_table(store, &filtered);
}

/// View detailed information about a single task.
pub fn cmd_view(store: &Store, id: String) {
    let task_id = resolve_task_or_exit(store, &id);
    let Some(task) = store.task(&task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    let project = store
        .project(&task.project_id)
        .map(|p| format!("{} ({})", p.name, p.id))
        .unwrap_or_else(|| task.project_id.clone());
    println!("ID:        {}", task.id);
    println!("Content:   {}", task.content);
    println!("Status:    {}", format_task_status(task.status));
    println!("Priority:  {}", format_priority(task.priority));
    println!("Assignee:  {}", task.assigned_to.as_deref().unwrap_or("-"));
    println!(
        "Due:       {}",
        match task.due {
            Some(d) => format!("{d} ({})", describe_due(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Project:   {project}");
}

/// Update an existing task's fields.
pub fn cmd_update(
    store: &mut Store,
    id: String,
    content: Option<String>,
    assign: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    status: Option<TaskStatus>,
    project: Option<String>,
    clear_due: bool,
    clear_assignee: bool,
) {
    let task_id = resolve_task_or_exit(store, &id);
    let project_id = project.map(|p| resolve_project_or_exit(store, &p));
    let due = due.map(|ds| parse_due_or_exit(&ds));
    let update = TaskUpdate {
        content,
        assigned_to: assign,
        due,
        priority,
        status,
        project_id,
        clear_assignee,
        clear_due,
    };
    match store.update_task(&task_id, update) {
        Ok(task) => println!("Updated task {}", task.id),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Move a task into the given status column.
pub fn cmd_set_status(store: &mut Store, id: String, status: TaskStatus) {
    let task_id = resolve_task_or_exit(store, &id);
    match store.set_status(&task_id, status) {
        Ok(task) => println!(
            "Task {} is now {}",
            task.id,
            format_task_status(task.status)
        ),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Delete a task.
pub fn cmd_delete(store: &mut Store, id: String) {
    let task_id = resolve_task_or_exit(store, &id);
    match store.remove_task(&task_id) {
        Ok(task) => println!("Deleted task {} ({})", task.id, task.content),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Assign a task to someone, or clear the assignee with --clear.
pub fn cmd_assign(store: &mut Store, id: String, who: Option<String>, clear: bool) {
    if who.is_none() && !clear {
        eprintln!("Error: provide an assignee name, or --clear to unassign");
        std::process::exit(1);
    }
    let task_id = resolve_task_or_exit(store, &id);
    let update = TaskUpdate {
        assigned_to: who,
        clear_assignee: clear,
        ..TaskUpdate::default()
    };
    match store.update_task(&task_id, update) {
        Ok(task) => match task.assigned_to {
            Some(who) => println!("Task {} assigned to {}", task.id, who),
            None => println!("Task {} unassigned", task.id),
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle project management commands.
pub fn cmd_project(store: &mut Store, action: ProjectAction) {
    match action {
        ProjectAction::List => {
            println!(
                "{:<22} {:<20} {:<10} {:<8} {:<9} {}",
                "ID", "Name", "Status", "Pri", "Progress", "Tasks"
            );
            for p in store.projects() {
                println!(
                    "{:<22} {:<20} {:<10} {:<8} {:<9} {}",
                    clip(&p.id, 22),
                    clip(&p.name, 20),
                    format_project_status(p.status),
                    format_priority(p.priority),
                    format!("{}%", p.progress),
                    store.tasks_in_project(&p.id).len()
                );
            }
        }
        ProjectAction::Add {
            name,
            desc,
            status,
            priority,
            manager,
            members,
            category,
            tags,
            start,
            due,
            progress,
        } => {
            let start_date = start.map(|ds| parse_due_or_exit(&ds));
            let due = due.map(|ds| parse_due_or_exit(&ds));
            match store.add_project(ProjectDraft {
                name,
                description: desc,
                start_date,
                due,
                status,
                priority,
                manager,
                members,
                category,
                tags,
                progress,
            }) {
                Ok(project) => println!("Added project {} ({})", project.id, project.name),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        ProjectAction::View { id } => {
            let project_id = resolve_project_or_exit(store, &id);
            let Some(p) = store.project(&project_id) else {
                eprintln!("Project {project_id} not found.");
                std::process::exit(1);
            };
            println!("ID:        {}", p.id);
            println!("Name:      {}", p.name);
            println!("Status:    {}", format_project_status(p.status));
            println!("Priority:  {}", format_priority(p.priority));
            println!("Manager:   {}", p.manager.as_deref().unwrap_or("-"));
            println!(
                "Members:   {}",
                if p.members.is_empty() {
                    "-".into()
                } else {
                    p.members.join(", ")
                }
            );
            println!("Category:  {}", p.category.as_deref().unwrap_or("-"));
            println!(
                "Tags:      {}",
                if p.tags.is_empty() {
                    "-".into()
                } else {
                    p.tags.join(",")
                }
            );
            println!("Progress:  {}%", p.progress);
            println!(
                "Start:     {}",
                p.start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
            );
            println!(
                "Due:       {}",
                p.due.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
            );
            println!(
                "Description:\n{}\n",
                p.description.as_deref().unwrap_or("-")
            );
            let owned = store.tasks_in_project(&project_id);
            if owned.is_empty() {
                println!("No tasks in this project.");
            } else {
                print_task_table(store, &owned);
            }
        }
        ProjectAction::Delete { id } => {
            let project_id = resolve_project_or_exit(store, &id);
            match store.remove_project(&project_id) {
                Ok(outcome) => println!(
                    "Deleted project {} ({}) and {} task(s)",
                    outcome.project.id, outcome.project.name, outcome.removed_tasks
                ),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Print aggregate statistics over the (optionally filtered) collection.
pub fn cmd_stats(
    store: &Store,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    assignee: Option<String>,
    project: Option<String>,
    search: Option<String>,
) {
    let project = project.map(|p| resolve_project_or_exit(store, &p));
    let filter = TaskFilter {
        status,
        priority,
        assignee,
        project,
        search: search.unwrap_or_default(),
    };
    let tasks = filter.apply(store.tasks());

    let counts = status_counts(tasks.iter().copied());
    println!("Tasks:       {}", counts.total());
    for status in TaskStatus::ALL {
        println!("  {:<12} {}", format_task_status(status), counts.get(status));
    }
    println!(
        "Completion:  {}",
        format_percent(completion_rate(tasks.iter().copied()))
    );

    println!("Priority:");
    let breakdown = priority_breakdown(tasks.iter().copied());
    for p in [Priority::High, Priority::Medium, Priority::Low] {
        let share = breakdown.get(p);
        println!(
            "  {:<12} {:<4} {}",
            format_priority(p),
            share.count,
            format_percent(share.share)
        );
    }

    let loads = workload(tasks.iter().copied());
    if !loads.is_empty() {
        println!("Workload:");
        for load in &loads {
            println!(
                "  {:<14} {:<4} {}",
                clip(&load.name, 14),
                load.count,
                load.label()
            );
        }
    }
}

/// Export the current dataset as pretty-printed JSON.
pub fn cmd_export(store: &Store, output: Option<String>) {
    let path = output.unwrap_or_else(|| "taskdeck.json".to_string());
    let dataset = Dataset::from_store(store);
    let data = match serde_json::to_string_pretty(&dataset) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to serialise dataset: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&path, data) {
        eprintln!("Failed to write {path}: {e}");
        std::process::exit(1);
    }
    println!(
        "Exported {} project(s) and {} task(s) to {}",
        dataset.projects.len(),
        dataset.tasks.len(),
        path
    );
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Resolve a task identifier (id, or exact content match, case-insensitive)
/// to a task id. Ambiguous content matches are an error suggesting the id.
pub fn resolve_task(store: &Store, identifier: &str) -> Result<String, String> {
    if store.task(identifier).is_some() {
        return Ok(identifier.to_string());
    }
    let matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.content.eq_ignore_ascii_case(identifier))
        .collect();
    match matches.len() {
        0 => Err(format!("No task with id or content '{identifier}'")),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|t| t.id.as_str()).collect();
            Err(format!(
                "Multiple tasks with content '{identifier}' ({}). Use the id instead.",
                ids.join(", ")
            ))
        }
    }
}

/// Resolve a project identifier (id, or exact name match, case-insensitive)
/// to a project id.
pub fn resolve_project(store: &Store, identifier: &str) -> Result<String, String> {
    if store.project(identifier).is_some() {
        return Ok(identifier.to_string());
    }
    let matches: Vec<&Project> = store
        .projects()
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(identifier))
        .collect();
    match matches.len() {
        0 => Err(format!("No project with id or name '{identifier}'")),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|p| p.id.as_str()).collect();
            Err(format!(
                "Multiple projects named '{identifier}' ({}). Use the id instead.",
                ids.join(", ")
            ))
        }
    }
}

fn resolve_task_or_exit(store: &Store, identifier: &str) -> String {
    match resolve_task(store, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn resolve_project_or_exit(store: &Store, identifier: &str) -> String {
    match resolve_project(store, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_due_or_exit(input: &str) -> NaiveDate {
    let today = Local::now().date_naive();
    match parse_due_input(input, today) {
        Some(d) => d,
        None => {
            eprintln!(
                "Unrecognised date '{input}'. Use YYYY-MM-DD, 'today', 'tomorrow', 'in Nd' or 'in Nw'."
            );
            std::process::exit(1);
        }
    }
}

/// Print tasks in a formatted table.
pub fn print_task_table(store: &Store, tasks: &[&Task]) {
    println!(
        "{:<20} {:<12} {:<8} {:<10} {:<14} {:<16} {}",
        "ID", "Status", "Pri", "Due", "Assignee", "Project", "Content"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let project = store
            .project(&t.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| t.project_id.clone());
        println!(
            "{:<20} {:<12} {:<8} {:<10} {:<14} {:<16} {}",
            clip(&t.id, 20),
            format_task_status(t.status),
            format_priority(t.priority),
            describe_due(t.due, today),
            clip(t.assigned_to.as_deref().unwrap_or("-"), 14),
            clip(&project, 16),
            t.content
        );
    }
}

/// Format a fraction as a whole-number percentage.
pub fn format_percent(share: f64) -> String {
    format!("{}%", (share * 100.0).round() as u32)
}

/// Clip a cell value to its column width, marking the cut with "..".
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{kept}..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn resolves_tasks_by_id_and_by_content() {
        let store = seed::sample();
        assert_eq!(resolve_task(&store, "task-3").unwrap(), "task-3");
        assert_eq!(
            resolve_task(&store, "prototype onboarding flow").unwrap(),
            "task-3"
        );
        assert!(resolve_task(&store, "does not exist").is_err());
    }

    #[test]
    fn resolves_projects_by_id_and_by_name() {
        let store = seed::sample();
        assert_eq!(resolve_project(&store, "project-2").unwrap(), "project-2");
        assert_eq!(resolve_project(&store, "mobile app").unwrap(), "project-2");
        assert!(resolve_project(&store, "Nonesuch").is_err());
    }

    #[test]
    fn percent_formatting_rounds_to_whole_numbers() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(2.0 / 7.0), "29%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn clip_respects_column_width() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a rather long name", 7), "a rat..");
        assert_eq!(clip("exact", 5), "exact");
    }
}
