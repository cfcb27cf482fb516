use crate::error::{TaskError, TaskResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formats accepted for stored deadlines (browser datetime-local and friends)
const STORED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Task identifier: the creation timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A single to-do item with an optional deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Raw deadline string as stored; parsed on demand by [`Task::deadline`]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

impl Task {
    pub fn new(
        id: TaskId,
        text: String,
        deadline: Option<NaiveDateTime>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            time: deadline.map(format_stored_time),
            completed: false,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parsed deadline in local time, if present and readable
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.time.as_deref().and_then(parse_stored_time)
    }

    /// Replace the deadline, normalizing its stored form
    pub fn set_deadline(&mut self, deadline: NaiveDateTime) {
        self.time = Some(format_stored_time(deadline));
    }

    /// Creation time converted to local time
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Local))
    }
}

/// Treat a missing, null, or blank deadline as "no deadline"
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Parse a stored deadline string into local wall-clock time
pub fn parse_stored_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    if let Some(dt) = STORED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    // Date-only values mean midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Format a deadline for storage ("YYYY-MM-DDTHH:MM", seconds only when set)
pub fn format_stored_time(dt: NaiveDateTime) -> String {
    if dt.second() == 0 && dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// Parse a deadline typed by the user.
///
/// Empty input means "no deadline". A bare "HH:MM" means today at that time.
pub fn parse_deadline_input(input: &str, today: NaiveDate) -> TaskResult<Option<NaiveDateTime>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(time) = NaiveTime::parse_from_str(input, "%H:%M") {
        return Ok(Some(today.and_time(time)));
    }

    parse_stored_time(input)
        .map(Some)
        .ok_or_else(|| TaskError::InvalidDeadline(input.to_string()))
}
