//! Task record and the input shapes the store accepts for it.
//!
//! A `Task` is one unit of work. Its `id` is an opaque, timestamp-derived
//! string assigned by the store at creation time and never changed after.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, TaskStatus};

/// A unit of work with status, priority, assignee, due date and a project
/// reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub project_id: String,
    #[serde(default)]
    pub created_at_utc: i64,
    #[serde(default)]
    pub updated_at_utc: i64,
}

/// Input for creating a task. The store assigns the id and timestamps and
/// validates the rest.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub content: String,
    pub assigned_to: Option<String>,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub project_id: String,
}

/// Partial update for an existing task. Absent fields are left untouched;
/// the `clear_*` flags reset their optional counterparts.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub content: Option<String>,
    pub assigned_to: Option<String>,
    pub due: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub project_id: Option<String>,
    pub clear_assignee: bool,
    pub clear_due: bool,
}
