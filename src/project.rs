//! Project record and the input shape the store accepts for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, ProjectStatus};

/// A grouping entity owning zero or more tasks.
///
/// `progress` is a manually maintained 0-100 figure; the store rejects
/// values above 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub priority: Priority,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub progress: u8,
}

/// Input for creating a project. The store assigns the id and validates
/// the rest.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub manager: Option<String>,
    pub members: Vec<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub progress: u8,
}
