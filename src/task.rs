//! Task records and their creation-time validation.
//!
//! A record is validated once, when it is constructed; the due-date rule is
//! deliberately not re-checked afterward, so a stored record may show a due
//! date in the past once time has advanced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 70;

/// Identifier assigned sequentially by the registry, starting at 1.
pub type TaskId = u64;

/// A field-level failure while constructing or parsing a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title exceeds {MAX_TITLE_LEN} characters (got {0})")]
    TitleTooLong(usize),

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("due date cannot be in the past")]
    DueDateInPast,
}

/// Priority level of a task.
///
/// The sort order is low < medium < high; see [`Priority::rank`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "baja")]
    Low,
}

impl Priority {
    /// Rank used for ordering: low = 1, medium = 2, high = 3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    /// Canonical serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse user-supplied text, case-insensitively.
    ///
    /// The Spanish forms written by the previous deployment are accepted as
    /// aliases so old snapshots and operator habits keep working.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        match text.trim().to_lowercase().as_str() {
            "high" | "alta" => Ok(Priority::High),
            "medium" | "media" => Ok(Priority::Medium),
            "low" | "baja" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownPriority(text.to_string())),
        }
    }
}

/// Lifecycle state of a task. New records start as pending.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "en progreso")]
    InProgress,
    #[serde(alias = "completada")]
    Completed,
}

impl Status {
    /// Canonical serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    /// Parse user-supplied text, case-insensitively, with legacy aliases.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        match text.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(Status::Pending),
            "in_progress" | "in progress" | "en progreso" | "en_progreso" => {
                Ok(Status::InProgress)
            }
            "completed" | "completada" => Ok(Status::Completed),
            _ => Err(ValidationError::UnknownStatus(text.to_string())),
        }
    }
}

/// One task's full set of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    pub due_at: DateTime<Utc>,
}

impl Task {
    /// Construct a new pending record, enforcing the creation-time rules.
    ///
    /// `now` is supplied by the caller; validation never reads the clock.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let task = Task {
            id,
            title: title.into(),
            description: description.into(),
            priority,
            status: Status::Pending,
            due_at,
        };
        task.validate(now)?;
        Ok(task)
    }

    /// Creation-time rules: non-empty title, length cap, due date not in the past.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.validate_stored()?;
        if self.due_at < now {
            return Err(ValidationError::DueDateInPast);
        }
        Ok(())
    }

    /// Rules that must hold for a stored record regardless of its age.
    ///
    /// Used when loading a snapshot: the due-date rule is creation-time only.
    pub fn validate_stored(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let len = self.title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong(len));
        }
        Ok(())
    }

    /// A copy of this record with the status replaced.
    ///
    /// The registry owns every record; status changes go through this rather
    /// than aliased in-place mutation.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Order tasks by priority rank. Relative order of equal priorities is
/// unspecified.
pub fn sort_by_priority(tasks: &mut [Task], ascending: bool) {
    if ascending {
        tasks.sort_by_key(|task| task.priority.rank());
    } else {
        tasks.sort_by_key(|task| std::cmp::Reverse(task.priority.rank()));
    }
}
