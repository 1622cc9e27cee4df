//! Task record model for the planning pipeline.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => bail!("unknown priority: {other} (expected Low, Medium or High)"),
        }
    }
}

/// Classification attached by the reminder check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Overdue,
    DueWithin { minutes: i64 },
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderKind::Overdue => write!(f, "overdue"),
            ReminderKind::DueWithin { minutes } if minutes % 60 == 0 => {
                write!(f, "due_in_{}h", minutes / 60)
            }
            ReminderKind::DueWithin { minutes } => write!(f, "due_in_{minutes}min"),
        }
    }
}

/// Core task record.
///
/// The planner fills the base fields, the scheduler adds `scheduled_time`,
/// `preparation_time` and `buffer_time`, and the store owns persistence.
/// `optimization_score` and `reminder_type` are written back lazily by
/// re-ranking and reminder checks; both go stale as soon as `due_date` or
/// `priority` changes, until the respective pass runs again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,

    pub priority: Priority,
    pub status: TaskStatus,

    pub due_date: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,

    /// Minutes, one of 30/60/120.
    pub estimated_duration: i64,
    /// Vocabulary tags, in vocabulary order.
    #[serde(default)]
    pub tags: Vec<String>,

    /// None until the scheduler has annotated the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Minutes.
    #[serde(default)]
    pub preparation_time: i64,
    /// Minutes.
    #[serde(default)]
    pub buffer_time: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_type: Option<ReminderKind>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Mark completed, stamping `completed_date`. Idempotent.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if self.status == TaskStatus::Completed {
            return;
        }
        self.status = TaskStatus::Completed;
        self.completed_date = Some(now);
    }
}
