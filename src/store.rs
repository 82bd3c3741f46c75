//! The in-memory store every screen reads from and mutates through.
//!
//! `Store` owns the task and project collections behind accessor methods,
//! so mutation points are auditable and testable in isolation. Mutating
//! operations validate their input and return `Result` with a typed
//! error; lookups that can legitimately miss return `Option`.
//!
//! Nothing here touches disk. The store lives for the process lifetime
//! and is discarded on exit; `export` is the one explicit snapshot path.

use chrono::Utc;

use crate::error::StoreError;
use crate::fields::TaskStatus;
use crate::project::{Project, ProjectDraft};
use crate::task::{Task, TaskDraft, TaskUpdate};

/// In-memory repository for tasks and projects.
#[derive(Debug, Default)]
pub struct Store {
    tasks: Vec<Task>,
    projects: Vec<Project>,
}

/// Outcome of removing a project: the record itself plus how many owned
/// tasks were cascaded away with it.
#[derive(Debug)]
pub struct RemovedProject {
    pub project: Project,
    pub removed_tasks: usize,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// All tasks, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All projects, in insertion order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Get a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a project by id.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Tasks referencing the given project, in insertion order.
    pub fn tasks_in_project(&self, project_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    /// Create a task from a draft.
    ///
    /// Content must be non-empty and the referenced project must exist;
    /// both are checked here rather than at call sites. The id and
    /// timestamps are assigned by the store.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task, StoreError> {
        if draft.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        if self.project(&draft.project_id).is_none() {
            return Err(StoreError::UnknownProject(draft.project_id));
        }
        let now = Utc::now().timestamp();
        let task = Task {
            id: self.next_task_id(),
            content: draft.content,
            assigned_to: draft.assigned_to,
            due: draft.due,
            priority: draft.priority,
            status: draft.status,
            project_id: draft.project_id,
            created_at_utc: now,
            updated_at_utc: now,
        };
        tracing::debug!(id = %task.id, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Insert a fully formed task record, as when loading a dataset file.
    /// The id must be unused; content and the project reference are
    /// validated as in `add_task`, so a malformed dataset fails the same
    /// way malformed interactive input does.
    pub fn insert_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.task(&task.id).is_some() {
            return Err(StoreError::DuplicateId(task.id));
        }
        if task.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        if self.project(&task.project_id).is_none() {
            return Err(StoreError::UnknownProject(task.project_id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Apply a partial update to a task, returning the updated record.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<Task, StoreError> {
        if let Some(ref pid) = update.project_id {
            if self.project(pid).is_none() {
                return Err(StoreError::UnknownProject(pid.clone()));
            }
        }
        if let Some(ref content) = update.content {
            if content.trim().is_empty() {
                return Err(StoreError::EmptyContent);
            }
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StoreError::UnknownTask(id.to_string()));
        };
        if let Some(content) = update.content {
            task.content = content;
        }
        if update.clear_assignee {
            task.assigned_to = None;
        }
        if let Some(who) = update.assigned_to {
            task.assigned_to = Some(who);
        }
        if update.clear_due {
            task.due = None;
        }
        if let Some(due) = update.due {
            task.due = Some(due);
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(pid) = update.project_id {
            task.project_id = pid;
        }
        task.updated_at_utc = Utc::now().timestamp();
        tracing::debug!(id = %task.id, "task updated");
        Ok(task.clone())
    }

    /// Move a task to a status column. Any status may move to any other;
    /// there are no transition-validity rules.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        self.update_task(
            id,
            TaskUpdate {
                status: Some(status),
                ..TaskUpdate::default()
            },
        )
    }

    /// Remove a task, returning the removed record.
    pub fn remove_task(&mut self, id: &str) -> Result<Task, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Err(StoreError::UnknownTask(id.to_string()));
        };
        let task = self.tasks.remove(idx);
        tracing::debug!(id = %task.id, "task removed");
        Ok(task)
    }

    /// Create a project from a draft. Name must be non-empty and progress
    /// within 0-100.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<Project, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if draft.progress > 100 {
            return Err(StoreError::InvalidProgress(draft.progress));
        }
        let project = Project {
            id: self.next_project_id(),
            name: draft.name,
            description: draft.description,
            start_date: draft.start_date,
            due: draft.due,
            status: draft.status,
            priority: draft.priority,
            manager: draft.manager,
            members: draft.members,
            category: draft.category,
            tags: draft.tags,
            progress: draft.progress,
        };
        tracing::debug!(id = %project.id, "project added");
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Insert a fully formed project record, as when loading a dataset
    /// file. Validated like `add_project`, plus id uniqueness.
    pub fn insert_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.project(&project.id).is_some() {
            return Err(StoreError::DuplicateId(project.id));
        }
        if project.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if project.progress > 100 {
            return Err(StoreError::InvalidProgress(project.progress));
        }
        self.projects.push(project);
        Ok(())
    }

    /// Remove a project and every task referencing it.
    ///
    /// Cascading is the store's fixed policy: tasks never outlive their
    /// project, and this method is the only place that referential state
    /// is repaired. The outcome reports exactly how many tasks went with
    /// the project.
    pub fn remove_project(&mut self, id: &str) -> Result<RemovedProject, StoreError> {
        let Some(idx) = self.projects.iter().position(|p| p.id == id) else {
            return Err(StoreError::UnknownProject(id.to_string()));
        };
        let project = self.projects.remove(idx);
        let before = self.tasks.len();
        self.tasks.retain(|t| t.project_id != project.id);
        let removed_tasks = before - self.tasks.len();
        tracing::debug!(id = %project.id, removed_tasks, "project removed");
        Ok(RemovedProject {
            project,
            removed_tasks,
        })
    }

    // Ids are timestamp-derived, bumped past any collision so they stay
    // unique when several records are created in the same millisecond.
    fn next_task_id(&self) -> String {
        let mut n = Utc::now().timestamp_millis();
        loop {
            let id = format!("task-{n}");
            if self.task(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    fn next_project_id(&self) -> String {
        let mut n = Utc::now().timestamp_millis();
        loop {
            let id = format!("project-{n}");
            if self.project(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, ProjectStatus, TaskStatus};

    fn project_draft(name: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.to_string(),
            description: None,
            start_date: None,
            due: None,
            status: ProjectStatus::Active,
            priority: Priority::Medium,
            manager: None,
            members: Vec::new(),
            category: None,
            tags: Vec::new(),
            progress: 0,
        }
    }

    fn task_draft(content: &str, project_id: &str) -> TaskDraft {
        TaskDraft {
            content: content.to_string(),
            assigned_to: None,
            due: None,
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            project_id: project_id.to_string(),
        }
    }

    #[test]
    fn add_task_validates_content_and_project() {
        let mut store = Store::new();
        let project = store.add_project(project_draft("Alpha")).unwrap();

        let err = store.add_task(task_draft("   ", &project.id)).unwrap_err();
        assert!(matches!(err, StoreError::EmptyContent));

        let err = store.add_task(task_draft("Ship it", "project-missing")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(_)));

        let task = store.add_task(task_draft("Ship it", &project.id)).unwrap();
        assert_eq!(store.task(&task.id).unwrap().content, "Ship it");
    }

    #[test]
    fn generated_ids_are_unique_under_rapid_creation() {
        let mut store = Store::new();
        let project = store.add_project(project_draft("Alpha")).unwrap();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let task = store
                .add_task(task_draft(&format!("Task {i}"), &project.id))
                .unwrap();
            assert!(ids.insert(task.id));
        }
    }

    #[test]
    fn update_task_applies_partial_changes() {
        let mut store = Store::new();
        let project = store.add_project(project_draft("Alpha")).unwrap();
        let task = store
            .add_task(TaskDraft {
                assigned_to: Some("Alice".into()),
                ..task_draft("Initial", &project.id)
            })
            .unwrap();

        let updated = store
            .update_task(
                &task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Review),
                    clear_assignee: true,
                    ..TaskUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Review);
        assert_eq!(updated.assigned_to, None);
        // Untouched fields survive.
        assert_eq!(updated.content, "Initial");

        let err = store
            .update_task("task-missing", TaskUpdate::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTask(_)));
    }

    #[test]
    fn any_status_may_move_to_any_other() {
        let mut store = Store::new();
        let project = store.add_project(project_draft("Alpha")).unwrap();
        let task = store
            .add_task(TaskDraft {
                status: TaskStatus::Done,
                ..task_draft("Jumpy", &project.id)
            })
            .unwrap();

        for status in TaskStatus::ALL {
            let moved = store.set_status(&task.id, status).unwrap();
            assert_eq!(moved.status, status);
        }
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut store = Store::new();
        let project = store.add_project(project_draft("Alpha")).unwrap();
        let task = store.add_task(task_draft("One", &project.id)).unwrap();

        let err = store.insert_task(task.clone()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
    }

    #[test]
    fn project_validation() {
        let mut store = Store::new();
        let err = store.add_project(project_draft("")).unwrap_err();
        assert!(matches!(err, StoreError::EmptyName));

        let err = store
            .add_project(ProjectDraft {
                progress: 101,
                ..project_draft("Alpha")
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidProgress(101)));
    }

    #[test]
    fn removing_a_project_cascades_to_exactly_its_tasks() {
        let mut store = Store::new();
        let keep = store.add_project(project_draft("Keep")).unwrap();
        let doomed = store.add_project(project_draft("Doomed")).unwrap();

        for i in 0..3 {
            store
                .add_task(task_draft(&format!("Doomed {i}"), &doomed.id))
                .unwrap();
        }
        let survivor = store.add_task(task_draft("Survivor", &keep.id)).unwrap();

        let before = store.tasks().len();
        let outcome = store.remove_project(&doomed.id).unwrap();
        assert_eq!(outcome.removed_tasks, 3);
        assert_eq!(before - store.tasks().len(), 3);
        assert!(store.task(&survivor.id).is_some());
        assert!(store.project(&doomed.id).is_none());

        let err = store.remove_project(&doomed.id).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(_)));
    }
}
