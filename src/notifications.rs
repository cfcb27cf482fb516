use std::time::{Duration, Instant};

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
        }
    }
}

/// A (message, severity) pair reported after a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn task_added() -> Self {
        Self::success("Task added")
    }

    pub fn task_updated() -> Self {
        Self::success("Task updated")
    }

    pub fn task_deleted() -> Self {
        Self::warning("Task deleted")
    }

    pub fn task_toggled(completed: bool) -> Self {
        if completed {
            Self::info("Task completed")
        } else {
            Self::info("Task reopened")
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.severity.icon(), self.message)
    }
}

/// Notice currently on screen, removed once it expires
#[derive(Debug, Clone)]
pub struct ActiveNotice {
    pub notice: Notice,
    pub expires_at: Instant,
}

impl ActiveNotice {
    pub fn new(notice: Notice, ttl: Duration) -> Self {
        Self {
            notice,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_notices() {
        assert_eq!(Notice::task_toggled(true), Notice::info("Task completed"));
        assert_eq!(Notice::task_toggled(false), Notice::info("Task reopened"));
    }

    #[test]
    fn test_outcome_severities() {
        assert_eq!(Notice::task_added().severity, Severity::Success);
        assert_eq!(Notice::task_updated().severity, Severity::Success);
        assert_eq!(Notice::task_deleted().severity, Severity::Warning);
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::error("Nope").to_string(), "✗ Nope");
        assert_eq!(Notice::task_added().to_string(), "✓ Task added");
    }

    #[test]
    fn test_active_notice_expiry() {
        let active = ActiveNotice::new(Notice::task_added(), Duration::from_secs(3));
        assert!(!active.is_expired(Instant::now()));
        assert!(active.is_expired(active.expires_at));
        assert!(active.is_expired(active.expires_at + Duration::from_millis(1)));
    }
}
