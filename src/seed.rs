//! Built-in sample dataset and dataset-file loading.
//!
//! The store is seeded once at startup, either from the sample below or
//! from a JSON dataset file named on the command line. Dataset records go
//! through the same store validation as interactive input, so a file with
//! a duplicate id, empty content or a dangling project reference is
//! rejected with the same typed errors.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fields::{Priority, ProjectStatus, TaskStatus};
use crate::project::Project;
use crate::store::Store;
use crate::task::Task;

/// On-disk dataset shape. Projects are listed before the tasks that
/// reference them so validation can run in one pass.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Dataset {
    /// Snapshot the current store contents, e.g. for `export`.
    pub fn from_store(store: &Store) -> Self {
        Dataset {
            projects: store.projects().to_vec(),
            tasks: store.tasks().to_vec(),
        }
    }

    /// Build a store from the dataset, validating every record.
    pub fn into_store(self) -> Result<Store, StoreError> {
        let mut store = Store::new();
        for project in self.projects {
            store.insert_project(project)?;
        }
        for task in self.tasks {
            store.insert_task(task)?;
        }
        Ok(store)
    }
}

/// Read and validate a dataset file into a fresh store.
pub fn load_dataset(path: &Path) -> Result<Store, StoreError> {
    let raw = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&raw)?;
    tracing::info!(
        path = %path.display(),
        projects = dataset.projects.len(),
        tasks = dataset.tasks.len(),
        "dataset loaded"
    );
    dataset.into_store()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

fn project(
    id: &str,
    name: &str,
    status: ProjectStatus,
    priority: Priority,
    manager: Option<&str>,
    members: &[&str],
    category: &str,
    tags: &[&str],
    progress: u8,
) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        start_date: Some(date(2026, 7, 1)),
        due: Some(date(2026, 9, 30)),
        status,
        priority,
        manager: manager.map(str::to_string),
        members: members.iter().map(|m| m.to_string()).collect(),
        category: Some(category.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        progress,
    }
}

fn task(
    id: &str,
    content: &str,
    assigned_to: Option<&str>,
    due: Option<NaiveDate>,
    priority: Priority,
    status: TaskStatus,
    project_id: &str,
) -> Task {
    // Fixed timestamps keep the fixtures deterministic.
    const CREATED_AT: i64 = 1_753_600_000;
    Task {
        id: id.to_string(),
        content: content.to_string(),
        assigned_to: assigned_to.map(str::to_string),
        due,
        priority,
        status,
        project_id: project_id.to_string(),
        created_at_utc: CREATED_AT,
        updated_at_utc: CREATED_AT,
    }
}

/// The built-in sample dataset: three projects and seven tasks.
///
/// The shapes are load-bearing for the demo views: two tasks are done,
/// two are high priority, one is unassigned, `project-2` owns exactly
/// three tasks and `project-3` owns none.
pub fn sample() -> Store {
    let dataset = Dataset {
        projects: vec![
            project(
                "project-1",
                "Website Redesign",
                ProjectStatus::Active,
                Priority::High,
                Some("Dana Whitfield"),
                &["Alice", "Bob"],
                "Design",
                &["web", "frontend"],
                45,
            ),
            project(
                "project-2",
                "Mobile App",
                ProjectStatus::Planning,
                Priority::Medium,
                Some("Priya Shah"),
                &["Alice", "Carol"],
                "Engineering",
                &["mobile"],
                10,
            ),
            project(
                "project-3",
                "Internal Tools",
                ProjectStatus::OnHold,
                Priority::Low,
                None,
                &[],
                "Engineering",
                &[],
                0,
            ),
        ],
        tasks: vec![
            task(
                "task-1",
                "Draft landing page copy",
                Some("Alice"),
                Some(date(2026, 8, 10)),
                Priority::Medium,
                TaskStatus::Todo,
                "project-1",
            ),
            task(
                "task-2",
                "Audit colour contrast",
                Some("Bob"),
                Some(date(2026, 8, 6)),
                Priority::Low,
                TaskStatus::InProgress,
                "project-1",
            ),
            task(
                "task-3",
                "Prototype onboarding flow",
                Some("Alice"),
                Some(date(2026, 8, 5)),
                Priority::High,
                TaskStatus::Review,
                "project-2",
            ),
            task(
                "task-4",
                "Collect beta feedback",
                Some("Alice"),
                None,
                Priority::Medium,
                TaskStatus::Todo,
                "project-2",
            ),
            task(
                "task-5",
                "Write release notes",
                None,
                Some(date(2026, 8, 20)),
                Priority::Low,
                TaskStatus::InProgress,
                "project-2",
            ),
            task(
                "task-6",
                "Fix checkout regression",
                Some("Alice"),
                Some(date(2026, 8, 3)),
                Priority::High,
                TaskStatus::Done,
                "project-1",
            ),
            task(
                "task-7",
                "Update style guide",
                Some("Bob"),
                Some(date(2026, 8, 14)),
                Priority::Medium,
                TaskStatus::Done,
                "project-1",
            ),
        ],
    };
    dataset
        .into_store()
        .expect("built-in sample dataset is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn sample_has_the_documented_shape() {
        let store = sample();
        assert_eq!(store.projects().len(), 3);
        assert_eq!(store.tasks().len(), 7);

        let ids: HashSet<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 7);

        assert_eq!(store.tasks_in_project("project-2").len(), 3);
        assert!(store.tasks_in_project("project-3").is_empty());
        assert_eq!(
            store
                .tasks()
                .iter()
                .filter(|t| t.status == TaskStatus::Done)
                .count(),
            2
        );
        assert_eq!(
            store
                .tasks()
                .iter()
                .filter(|t| t.priority == Priority::High)
                .count(),
            2
        );
    }

    #[test]
    fn dataset_round_trips_through_json() {
        let store = sample();
        let json = serde_json::to_string_pretty(&Dataset::from_store(&store)).unwrap();
        let reloaded: Dataset = serde_json::from_str(&json).unwrap();
        let restored = reloaded.into_store().unwrap();
        assert_eq!(restored.tasks().len(), store.tasks().len());
        assert_eq!(restored.projects().len(), store.projects().len());
        // Spellings on the wire stay camelCase.
        assert!(json.contains("\"inProgress\""));
        assert!(json.contains("\"onHold\""));
        assert!(json.contains("\"projectId\""));
    }

    #[test]
    fn load_dataset_reads_a_file() {
        let store = sample();
        let json = serde_json::to_string_pretty(&Dataset::from_store(&store)).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load_dataset(file.path()).unwrap();
        assert_eq!(loaded.tasks().len(), 7);
    }

    #[test]
    fn dataset_with_dangling_project_reference_is_rejected() {
        let json = r#"{
            "projects": [],
            "tasks": [{
                "id": "task-1",
                "content": "Orphan",
                "priority": "low",
                "status": "todo",
                "projectId": "project-9"
            }]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let err = dataset.into_store().unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(_)));
    }

    #[test]
    fn dataset_with_unknown_enum_spelling_is_rejected() {
        let json = r#"{
            "projects": [],
            "tasks": [{
                "id": "task-1",
                "content": "Bad status",
                "priority": "low",
                "status": "blocked",
                "projectId": "project-1"
            }]
        }"#;
        assert!(serde_json::from_str::<Dataset>(json).is_err());
    }
}
