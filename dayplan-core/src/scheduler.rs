//! Scheduler: derives working-time annotations for a single task and
//! re-ranks a task list by a composite urgency score.
//!
//! Everything here is deterministic: `now` is always passed in explicitly.

use chrono::{DateTime, Duration, Utc};

use crate::task::{Priority, Task};

/// Fixed slack added to every scheduled task, in minutes.
pub const BUFFER_MINUTES: i64 = 15;

/// Annotate a task with its optimal working time, preparation estimate and
/// buffer.
///
/// The working time is offset back from the deadline by priority; the offset
/// is deliberately not clamped, so a task due sooner than its offset gets a
/// scheduled time in the past.
pub fn schedule_task(mut task: Task) -> Task {
    task.scheduled_time = Some(task.due_date - priority_offset(task.priority));
    task.preparation_time = preparation_minutes(&task);
    task.buffer_time = BUFFER_MINUTES;
    task
}

/// Re-rank a task list by composite urgency.
///
/// Only pending tasks are scored and reordered; they come first in the
/// result, highest score first, equal scores keeping their input order.
/// Non-pending tasks follow at the tail in their original relative order,
/// unscored.
pub fn optimize_schedule(tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
    let mut pending = Vec::new();
    let mut rest = Vec::new();

    for mut task in tasks {
        if task.is_pending() {
            task.optimization_score = Some(composite_score(&task, now));
            pending.push(task);
        } else {
            rest.push(task);
        }
    }

    // sort_by is stable, so ties keep input order
    pending.sort_by(|a, b| b.optimization_score.cmp(&a.optimization_score));

    pending.extend(rest);
    pending
}

/// urgency + priority weight, where urgency grows as the deadline nears.
fn composite_score(task: &Task, now: DateTime<Utc>) -> i64 {
    // Whole days until due, floored: an hour overdue counts as day -1.
    let days_until_due = (task.due_date - now).num_seconds().div_euclid(86_400);
    let urgency = (5 - days_until_due).max(1);
    urgency + priority_score(task.priority)
}

fn priority_score(priority: Priority) -> i64 {
    match priority {
        Priority::High => 3,
        Priority::Medium => 2,
        Priority::Low => 1,
    }
}

fn priority_offset(priority: Priority) -> Duration {
    match priority {
        Priority::High => Duration::hours(2),
        Priority::Medium => Duration::hours(1),
        Priority::Low => Duration::minutes(30),
    }
}

/// Meetings need a short warm-up, reports a longer one; the meeting check
/// wins when a task carries both tags.
fn preparation_minutes(task: &Task) -> i64 {
    if task.tags.iter().any(|t| t == "meeting") {
        15
    } else if task.tags.iter().any(|t| t == "report") {
        30
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::create_task;

    #[test]
    fn test_offsets_by_priority() {
        let now = Utc::now();
        let due = now + Duration::days(1);

        let high = schedule_task(create_task("h", "", Priority::High, due, now));
        let medium = schedule_task(create_task("m", "", Priority::Medium, due, now));
        let low = schedule_task(create_task("l", "", Priority::Low, due, now));

        assert_eq!(high.scheduled_time, Some(due - Duration::hours(2)));
        assert_eq!(medium.scheduled_time, Some(due - Duration::hours(1)));
        assert_eq!(low.scheduled_time, Some(due - Duration::minutes(30)));
    }

    #[test]
    fn test_offset_not_clamped_to_now() {
        // due in 90 minutes, High offset is 2h: scheduled time lands in the past
        let now = Utc::now();
        let due = now + Duration::minutes(90);
        let t = schedule_task(create_task("Call client", "", Priority::High, due, now));
        assert_eq!(t.scheduled_time, Some(due - Duration::hours(2)));
        assert!(t.scheduled_time.unwrap() < now);
    }

    #[test]
    fn test_preparation_minutes() {
        let now = Utc::now();
        let due = now + Duration::days(1);

        let meeting = schedule_task(create_task("Team meeting", "", Priority::Low, due, now));
        assert_eq!(meeting.preparation_time, 15);

        let report = schedule_task(create_task("Draft report", "", Priority::Low, due, now));
        assert_eq!(report.preparation_time, 30);

        // meeting takes precedence when both tags are present
        let both = schedule_task(create_task(
            "Meeting about the report",
            "",
            Priority::Low,
            due,
            now,
        ));
        assert_eq!(both.preparation_time, 15);

        let plain = schedule_task(create_task("Water plants", "", Priority::Low, due, now));
        assert_eq!(plain.preparation_time, 5);
    }

    #[test]
    fn test_buffer_is_constant() {
        let now = Utc::now();
        let t = schedule_task(create_task("x", "", Priority::Medium, now, now));
        assert_eq!(t.buffer_time, BUFFER_MINUTES);
    }

    #[test]
    fn test_near_deadline_low_beats_far_high() {
        // A: due in 1 day, Low  -> urgency max(1, 5-1)=4, +1 = 5
        // B: due in 4 days, High -> urgency max(1, 5-4)=1, +3 = 4
        let now = Utc::now();
        let a = create_task("A", "", Priority::Low, now + Duration::days(1), now);
        let b = create_task("B", "", Priority::High, now + Duration::days(4), now);

        let ranked = optimize_schedule(vec![b.clone(), a.clone()], now);
        assert_eq!(ranked[0].id, a.id);
        assert_eq!(ranked[0].optimization_score, Some(5));
        assert_eq!(ranked[1].id, b.id);
        assert_eq!(ranked[1].optimization_score, Some(4));
    }

    #[test]
    fn test_overdue_days_floor() {
        // one hour overdue floors to day -1: urgency 6, +1 = 7
        let now = Utc::now();
        let t = create_task("late", "", Priority::Low, now - Duration::hours(1), now);
        let ranked = optimize_schedule(vec![t], now);
        assert_eq!(ranked[0].optimization_score, Some(7));
    }

    #[test]
    fn test_urgency_floor_for_far_deadlines() {
        // 30 days out: 5 - 30 would be negative, floors at 1
        let now = Utc::now();
        let t = create_task("someday", "", Priority::Medium, now + Duration::days(30), now);
        let ranked = optimize_schedule(vec![t], now);
        assert_eq!(ranked[0].optimization_score, Some(3));
    }

    #[test]
    fn test_stable_on_equal_scores() {
        let now = Utc::now();
        let due = now + Duration::days(1);
        let first = create_task("first", "", Priority::Medium, due, now);
        let second = create_task("second", "", Priority::Medium, due, now);

        let ranked = optimize_schedule(vec![first.clone(), second.clone()], now);
        assert_eq!(ranked[0].id, first.id);
        assert_eq!(ranked[1].id, second.id);
    }

    #[test]
    fn test_completed_tasks_keep_tail_order_unscored() {
        let now = Utc::now();
        let mut done_a = create_task("done a", "", Priority::High, now + Duration::days(1), now);
        done_a.complete(now);
        let mut done_b = create_task("done b", "", Priority::Low, now + Duration::days(2), now);
        done_b.complete(now);
        let pending = create_task("todo", "", Priority::Low, now + Duration::days(9), now);

        let ranked = optimize_schedule(vec![done_a.clone(), pending.clone(), done_b.clone()], now);
        assert_eq!(ranked[0].id, pending.id);
        assert_eq!(ranked[1].id, done_a.id);
        assert_eq!(ranked[2].id, done_b.id);
        assert!(ranked[1].optimization_score.is_none());
        assert!(ranked[2].optimization_score.is_none());
    }
}
