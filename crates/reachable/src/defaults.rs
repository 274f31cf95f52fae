//! Process-wide default settings consumed by checkers at start time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Port dialed when a target does not name one.
pub const DEFAULT_PORT: u16 = 80;

/// Built-in poll interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Longest poll interval a run will use; larger values are clamped.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Built-in TCP connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

// Milliseconds; 0 means "use the built-in constant".
static INTERVAL_MS: AtomicU64 = AtomicU64::new(0);
static TIMEOUT_MS: AtomicU64 = AtomicU64::new(0);

fn load(slot: &AtomicU64, fallback: Duration) -> Duration {
    match slot.load(Ordering::Relaxed) {
        0 => fallback,
        ms => Duration::from_millis(ms),
    }
}

fn store(slot: &AtomicU64, value: Duration) {
    let ms = if value.is_zero() {
        0
    } else {
        u64::try_from(value.as_millis()).unwrap_or(u64::MAX).max(1)
    };
    slot.store(ms, Ordering::Relaxed);
}

/// Current default poll interval.
pub fn interval() -> Duration {
    load(&INTERVAL_MS, DEFAULT_INTERVAL)
}

/// Override the default poll interval. Zero restores [`DEFAULT_INTERVAL`].
///
/// Only checkers started after this call pick up the new value.
pub fn set_interval(value: Duration) {
    store(&INTERVAL_MS, value);
}

/// Current default TCP connect timeout.
pub fn timeout() -> Duration {
    load(&TIMEOUT_MS, DEFAULT_TIMEOUT)
}

/// Override the default connect timeout. Zero restores [`DEFAULT_TIMEOUT`].
pub fn set_timeout(value: Duration) {
    store(&TIMEOUT_MS, value);
}
