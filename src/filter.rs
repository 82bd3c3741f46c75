//! The filter stage of the task pipeline.
//!
//! A `TaskFilter` is a conjunction of per-field predicates. A field left
//! as `None` (or an empty search string) is a wildcard. Applying a filter
//! is a pure read: it returns a subsequence of the input, never reorders
//! it, and an empty result is a valid outcome rather than an error.

use crate::fields::{Priority, TaskStatus};
use crate::task::Task;

/// A combination of field-level match predicates applied conjunctively.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub project: Option<String>,
    pub search: String,
}

impl TaskFilter {
    /// True when every field is a wildcard, i.e. the filter passes
    /// everything through.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.project.is_none()
            && self.search.is_empty()
    }

    /// Whether a single task satisfies every non-wildcard predicate.
    ///
    /// The assignee match is a case-insensitive equality check; `search`
    /// is a case-insensitive substring match against the content and,
    /// when present, the assignee name.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(ref who) = self.assignee {
            let matched = task
                .assigned_to
                .as_ref()
                .is_some_and(|a| a.to_lowercase() == who.to_lowercase());
            if !matched {
                return false;
            }
        }
        if let Some(ref project) = self.project {
            if task.project_id != *project {
                return false;
            }
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_content = task.content.to_lowercase().contains(&needle);
            let in_assignee = task
                .assigned_to
                .as_ref()
                .is_some_and(|a| a.to_lowercase().contains(&needle));
            if !in_content && !in_assignee {
                return false;
            }
        }
        true
    }

    /// Narrow a task slice to the subsequence satisfying this filter.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
