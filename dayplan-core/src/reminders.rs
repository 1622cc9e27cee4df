//! Reminder evaluator: classifies tasks against priority-tiered lead
//! windows and renders human-readable notices.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, ReminderKind, Task};

/// Lead windows in minutes, widest first. Higher priorities start nagging
/// earlier.
fn lead_minutes(priority: Priority) -> &'static [i64] {
    match priority {
        Priority::High => &[120, 60, 30],
        Priority::Medium => &[60, 30],
        Priority::Low => &[30],
    }
}

/// Classify a single task against `now`. `None` means no reminder yet.
///
/// Overdue always fires. Otherwise the tightest lead window that still
/// covers the remaining time wins, so a High task 25 minutes out reads
/// `due_in_30min`, not `due_in_2h`.
pub fn classify(task: &Task, now: DateTime<Utc>) -> Option<ReminderKind> {
    if task.is_completed() {
        return None;
    }

    let time_until_due = task.due_date - now;
    if time_until_due < Duration::zero() {
        return Some(ReminderKind::Overdue);
    }

    lead_minutes(task.priority)
        .iter()
        .rev()
        .find(|&&minutes| time_until_due <= Duration::minutes(minutes))
        .map(|&minutes| ReminderKind::DueWithin { minutes })
}

/// Scan tasks and return copies of those needing attention, stamping each
/// matching record's `reminder_type` in place. Completed tasks are skipped;
/// a previously stamped classification is left alone when a task has gone
/// quiet again.
pub fn check_reminders(tasks: &mut [Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut needing_attention = Vec::new();

    for task in tasks.iter_mut() {
        if let Some(kind) = classify(task, now) {
            task.reminder_type = Some(kind);
            needing_attention.push(task.clone());
        }
    }

    needing_attention
}

/// Render a notice for a classified task.
pub fn reminder_message(task: &Task, now: DateTime<Utc>) -> String {
    let time_until_due = task.due_date - now;
    if time_until_due < Duration::zero() {
        format!(
            "OVERDUE: '{}' was due {} ago",
            task.title,
            format_duration_human(-time_until_due)
        )
    } else {
        format!(
            "REMINDER: '{}' is due in {}",
            task.title,
            format_duration_human(time_until_due)
        )
    }
}

/// Pending tasks due on the same calendar day as `now`, in `now`'s timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub count_today: usize,
    pub high_priority_today: usize,
    pub records_today: Vec<Task>,
}

pub fn daily_summary<Tz: TimeZone>(tasks: &[Task], now: DateTime<Tz>) -> DailySummary {
    let today = now.date_naive();
    let tz = now.timezone();

    let records_today: Vec<Task> = tasks
        .iter()
        .filter(|t| t.is_pending() && t.due_date.with_timezone(&tz).date_naive() == today)
        .cloned()
        .collect();

    DailySummary {
        count_today: records_today.len(),
        high_priority_today: records_today
            .iter()
            .filter(|t| t.priority == Priority::High)
            .count(),
        records_today,
    }
}

/// Largest two non-zero units of days/hours/minutes.
pub fn format_duration_human(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 1 {
        return "less than a minute".to_string();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    for (amount, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if amount > 0 {
            parts.push(if amount == 1 {
                format!("1 {unit}")
            } else {
                format!("{amount} {unit}s")
            });
        }
        if parts.len() == 2 {
            break;
        }
    }

    parts.join(" ")
}
