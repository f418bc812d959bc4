use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque task identifier. Stable for the task's whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> Self {
        TaskId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Which of the two ordered collections a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Active,
    Archived,
}

impl Collection {
    pub fn other(self) -> Collection {
        match self {
            Collection::Active => Collection::Archived,
            Collection::Archived => Collection::Active,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Active => write!(f, "active"),
            Collection::Archived => write!(f, "archived"),
        }
    }
}

/// A single task record.
///
/// Serialized with camelCase fields and epoch-millisecond timestamps.
/// `completedAt` is omitted entirely while the task is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create an active task. The title is stored as given; callers trim and
    /// validate before getting here.
    pub fn new(id: TaskId, title: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            title,
            created_at,
            completed_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Trim a user-supplied title, returning `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Current time truncated to whole milliseconds, the precision tasks are
/// persisted with. Keeps in-memory and reloaded records equal.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
