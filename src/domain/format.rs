use super::task::Task;
use super::views::{millis_until, DAY_MS, HOUR_MS};
use chrono::{Duration, NaiveDateTime};

/// Coarse size of a time difference, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpan {
    Days(i64),
    Hours(i64),
    UnderAnHour,
}

impl TimeSpan {
    /// Bucket a non-negative millisecond difference (floor division)
    pub fn from_millis(ms: i64) -> Self {
        let ms = ms.max(0);
        let days = ms / DAY_MS;
        let hours = (ms % DAY_MS) / HOUR_MS;

        if days > 0 {
            TimeSpan::Days(days)
        } else if hours > 0 {
            TimeSpan::Hours(hours)
        } else {
            TimeSpan::UnderAnHour
        }
    }

    fn phrase(&self) -> String {
        match self {
            TimeSpan::Days(1) => "1 day".to_string(),
            TimeSpan::Days(n) => format!("{} days", n),
            TimeSpan::Hours(1) => "1 hour".to_string(),
            TimeSpan::Hours(n) => format!("{} hours", n),
            TimeSpan::UnderAnHour => "less than an hour".to_string(),
        }
    }
}

/// Format time of day as HH:MM
fn format_time(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

/// Human-friendly absolute deadline: "today 14:00", "tomorrow 09:30",
/// "Friday 18:00" within the week, else "March 5, 2026 18:00"
pub fn format_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> String {
    let days_ahead = (deadline.date() - now.date()).num_days();

    match days_ahead {
        0 => format!("today {}", format_time(deadline)),
        1 => format!("tomorrow {}", format_time(deadline)),
        2..=6 => format!("{} {}", deadline.format("%A"), format_time(deadline)),
        _ => format!("{} {}", deadline.format("%B %-d, %Y"), format_time(deadline)),
    }
}

/// Countdown text for a deadline still ahead, e.g. "3 hours left"
pub fn format_remaining(ms: i64) -> String {
    format!("{} left", TimeSpan::from_millis(ms).phrase())
}

/// Elapsed text for a deadline already behind, e.g. "2 days ago"
pub fn format_elapsed(ms: i64) -> String {
    format!("{} ago", TimeSpan::from_millis(ms).phrase())
}

/// Remaining/elapsed badge for an open task with a readable deadline
pub fn time_left_badge(task: &Task, now: NaiveDateTime) -> Option<String> {
    if task.completed {
        return None;
    }

    let deadline = task.deadline()?;
    let ms = millis_until(deadline, now);
    if ms < 0 {
        Some(format!("overdue by {}", TimeSpan::from_millis(-ms).phrase()))
    } else {
        Some(format_remaining(ms))
    }
}

/// Short age of a task, used by the details pane ("created 2 days ago")
pub fn format_age(age: Duration) -> String {
    format_elapsed(age.num_milliseconds())
}
