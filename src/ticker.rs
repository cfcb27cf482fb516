use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// How long a notice stays visible
pub fn notice_duration(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}
