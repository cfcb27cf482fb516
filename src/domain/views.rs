use super::enums::{DeadlineClass, Filter};
use super::task::Task;
use chrono::{Local, NaiveDateTime, TimeZone};

/// Milliseconds in one hour
pub const HOUR_MS: i64 = 3_600_000;
/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

/// Signed milliseconds from `now` until `deadline` (negative once passed),
/// measured between the local instants the two wall-clock times denote
pub fn millis_until(deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    millis_until_in(&Local, deadline, now)
}

/// A wall-clock time skipped by a DST jump falls back to the plain difference
fn millis_until_in<Tz: TimeZone>(tz: &Tz, deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let instants = (
        tz.from_local_datetime(&deadline).earliest(),
        tz.from_local_datetime(&now).earliest(),
    );

    match instants {
        (Some(deadline), Some(now)) => deadline.signed_duration_since(now).num_milliseconds(),
        _ => deadline.signed_duration_since(now).num_milliseconds(),
    }
}

/// Classify a task's deadline.
///
/// The remaining time falls into the half-open window `[0, 24h)` for urgent;
/// anything below zero on an open task has passed.
pub fn deadline_class(task: &Task, now: NaiveDateTime) -> DeadlineClass {
    if task.completed {
        return DeadlineClass::Normal;
    }

    let Some(deadline) = task.deadline() else {
        return DeadlineClass::Normal;
    };

    let remaining = millis_until(deadline, now);
    if remaining < 0 {
        DeadlineClass::Passed
    } else if remaining < DAY_MS {
        DeadlineClass::Urgent
    } else {
        DeadlineClass::Normal
    }
}

/// Check whether a task belongs to a filtered view
pub fn matches_filter(task: &Task, filter: Filter, now: NaiveDateTime) -> bool {
    match filter {
        Filter::All => true,
        Filter::Completed => task.completed,
        Filter::Pending => !task.completed,
        Filter::Urgent => deadline_class(task, now) == DeadlineClass::Urgent,
        Filter::Overdue => deadline_class(task, now) == DeadlineClass::Passed,
    }
}

/// Select the tasks visible under a filter, preserving list order
pub fn filter_tasks(tasks: &[Task], filter: Filter, now: NaiveDateTime) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| matches_filter(task, filter, now))
        .collect()
}

/// Counters shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    TaskStats {
        total,
        completed,
        pending: total - completed,
    }
}
