//! dayplan-core: task records, planning heuristics and the file-backed store

pub mod planner;
pub mod reminders;
pub mod scheduler;
pub mod store;
pub mod task;
pub mod time;

pub use planner::{TAG_VOCABULARY, create_task, estimate_duration, extract_tags};
pub use reminders::{
    DailySummary, check_reminders, classify, daily_summary, format_duration_human,
    reminder_message,
};
pub use scheduler::{BUFFER_MINUTES, optimize_schedule, schedule_task};
pub use store::{StoreStats, TaskStore};
pub use task::{Priority, ReminderKind, Task, TaskStatus};
pub use time::{parse_local_deadline_to_utc, parse_timezone};
