//! Error types for store operations and dataset loading.

use thiserror::Error;

/// Failure modes of the in-memory store and the dataset boundary.
///
/// Every mutating store operation returns one of these instead of a
/// boolean or null sentinel, so callers always know why a change was
/// refused.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task content cannot be empty")]
    EmptyContent,

    #[error("project name cannot be empty")]
    EmptyName,

    #[error("no task with id '{0}'")]
    UnknownTask(String),

    #[error("no project with id '{0}'")]
    UnknownProject(String),

    #[error("id '{0}' is already taken")]
    DuplicateId(String),

    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    #[error("failed to read dataset: {0}")]
    DatasetIo(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    DatasetFormat(#[from] serde_json::Error),
}
