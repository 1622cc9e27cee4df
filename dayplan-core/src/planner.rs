//! Planner: synthesizes a base task record from validated user input,
//! inferring an estimated duration and content tags.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::task::{Priority, Task, TaskStatus};

/// Fixed tag vocabulary; extraction output preserves this order.
pub const TAG_VOCABULARY: [&str; 7] = [
    "meeting",
    "call",
    "email",
    "report",
    "review",
    "urgent",
    "important",
];

/// Build a fresh pending task from raw fields.
///
/// Input validation (non-empty title, priority parsing, due-date parsing) is
/// the caller's job; everything here is taken as given. The record still
/// needs a scheduling pass before it carries `scheduled_time`.
pub fn create_task(
    title: impl Into<String>,
    description: impl Into<String>,
    priority: Priority,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Task {
    let title = title.into();
    let description = description.into();
    let estimated_duration = estimate_duration(&title, &description);
    let tags = extract_tags(&title, &description);

    Task {
        id: Uuid::new_v4(),
        title,
        description,
        priority,
        status: TaskStatus::Pending,
        due_date,
        created_date: now,
        completed_date: None,
        estimated_duration,
        tags,
        scheduled_time: None,
        preparation_time: 0,
        buffer_time: 0,
        optimization_score: None,
        reminder_type: None,
    }
}

/// Duration estimate in minutes from combined content length:
/// under 50 chars is a quick task, under 100 an hour, anything longer two.
pub fn estimate_duration(title: &str, description: &str) -> i64 {
    let content_length = title.chars().count() + description.chars().count();
    if content_length < 50 {
        30
    } else if content_length < 100 {
        60
    } else {
        120
    }
}

/// Case-insensitive substring scan of title + description against the
/// vocabulary. Substring, not word match: "recall" does contain "call".
pub fn extract_tags(title: &str, description: &str) -> Vec<String> {
    let content = format!("{title} {description}").to_lowercase();
    TAG_VOCABULARY
        .iter()
        .filter(|tag| content.contains(*tag))
        .map(|tag| (*tag).to_string())
        .collect()
}
