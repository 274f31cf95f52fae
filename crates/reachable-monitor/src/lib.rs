//! reachable-monitor: log reachability transitions for a set of hosts.
//!
//! Each configured host gets its own [`reachable::Checker`] whose notifier
//! logs `"<host> is UP"` / `"<host> is DOWN"`. Optionally the process-wide
//! checker is started on one host and its shared flag is logged on a fixed
//! cadence.

pub mod config;
pub mod monitor;

pub use config::{Config, ConfigError, LogFormat};
pub use monitor::Monitor;
