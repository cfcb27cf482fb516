use serde::{Deserialize, Serialize};

/// Named view over the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
    Urgent,
    Overdue,
}

impl Filter {
    /// Parse a filter from its name like "urgent"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "urgent" => Some(Self::Urgent),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Urgent => "urgent",
            Self::Overdue => "overdue",
        }
    }

    /// Title-case label for the filter bar
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Urgent => "Urgent",
            Self::Overdue => "Overdue",
        }
    }

    /// Message shown when the filtered view is empty
    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::All => "No tasks yet",
            Self::Completed => "No completed tasks",
            Self::Pending => "No pending tasks",
            Self::Urgent => "No urgent tasks",
            Self::Overdue => "No overdue tasks",
        }
    }

    /// Next filter in bar order, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|f| f == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn all() -> &'static [Filter] {
        &[
            Filter::All,
            Filter::Completed,
            Filter::Pending,
            Filter::Urgent,
            Filter::Overdue,
        ]
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!("unknown filter '{}' (expected all, completed, pending, urgent or overdue)", s)
        })
    }
}

/// Urgency of a task's deadline relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineClass {
    /// Completed, no deadline, or at least a day away
    Normal,
    /// Deadline within the next 24 hours
    Urgent,
    /// Deadline already passed on an open task
    Passed,
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask,
    ConfirmDelete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_name() {
        assert_eq!(Filter::from_name("all"), Some(Filter::All));
        assert_eq!(Filter::from_name("URGENT"), Some(Filter::Urgent));
        assert_eq!(Filter::from_name(" overdue "), Some(Filter::Overdue));
        assert_eq!(Filter::from_name("later"), None);
    }

    #[test]
    fn test_filter_name_round_trips() {
        for filter in Filter::all() {
            assert_eq!(Filter::from_name(filter.name()), Some(*filter));
        }
    }

    #[test]
    fn test_filter_next_wraps() {
        assert_eq!(Filter::All.next(), Filter::Completed);
        assert_eq!(Filter::Urgent.next(), Filter::Overdue);
        assert_eq!(Filter::Overdue.next(), Filter::All);
    }

    #[test]
    fn test_filter_empty_messages() {
        assert_eq!(Filter::All.empty_message(), "No tasks yet");
        assert_eq!(Filter::Overdue.empty_message(), "No overdue tasks");
    }

    #[test]
    fn test_filter_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Filter::Pending).unwrap(), "\"pending\"");
        let parsed: Filter = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, Filter::Completed);
    }

    #[test]
    fn test_filter_from_str_error() {
        let err = "soon".parse::<Filter>().unwrap_err();
        assert!(err.contains("soon"));
    }
}
