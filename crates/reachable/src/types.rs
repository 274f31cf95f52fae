//! Reachability types and structures.

use crate::defaults::DEFAULT_PORT;
use common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::time::Duration;

/// Remote endpoint probed by a checker.
///
/// Always carries an explicit port; `example.com` means `example.com:80`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Create a target from an already split host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP literal, without brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Target {
    type Err = Error;

    /// Parse `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6 literal.
    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(Error::invalid_target(s, "empty host"));
        }

        if input.parse::<Ipv6Addr>().is_ok() {
            return Ok(Self::new(input, DEFAULT_PORT));
        }

        let (host, port) = if let Some(rest) = input.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| Error::invalid_target(s, "missing ']'"))?;
            match after {
                "" => (host, None),
                _ => match after.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(Error::invalid_target(s, "unexpected text after ']'")),
                },
            }
        } else {
            match input.split_once(':') {
                Some((_, port)) if port.contains(':') => {
                    return Err(Error::invalid_target(s, "too many colons"));
                }
                Some((host, port)) => (host, Some(port)),
                None => (input, None),
            }
        };

        if host.is_empty() {
            return Err(Error::invalid_target(s, "empty host"));
        }

        let port = match port {
            None => DEFAULT_PORT,
            Some(p) => match p.parse::<u16>() {
                Ok(0) => return Err(Error::invalid_target(s, "port 0 is not dialable")),
                Ok(port) => port,
                Err(e) => return Err(Error::invalid_target(s, format!("bad port: {}", e))),
            },
        };

        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for Target {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Last reachability state delivered to the notifier during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// No probe has completed yet in this run
    #[default]
    Unknown,
    /// Last delivered notification was "reachable"
    Up,
    /// Last delivered notification was "not reachable"
    Down,
}

impl Status {
    /// Apply a probe outcome.
    ///
    /// Returns the new status when it differs from `self` (a notification is
    /// due), or `None` when the outcome repeats the last delivered one.
    pub fn transition(self, reachable: bool) -> Option<Status> {
        let next = if reachable { Status::Up } else { Status::Down };
        (next != self).then_some(next)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unknown => write!(f, "UNKNOWN"),
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

/// Checker configuration.
///
/// `None` (or zero) interval and timeout fall back to the process-wide
/// defaults in [`crate::defaults`], resolved when the checker starts.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Endpoint to dial
    pub target: Target,

    /// Poll period override
    pub interval: Option<Duration>,

    /// TCP connect timeout override
    pub timeout: Option<Duration>,
}

impl CheckerConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            interval: None,
            timeout: None,
        }
    }

    /// Interval for the next run, at most [`crate::defaults::MAX_INTERVAL`].
    pub fn effective_interval(&self) -> Duration {
        let interval = match self.interval {
            Some(d) if !d.is_zero() => d,
            _ => crate::defaults::interval(),
        };
        interval.min(crate::defaults::MAX_INTERVAL)
    }

    /// Connect timeout for the next run.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout {
            Some(d) if !d.is_zero() => d,
            _ => crate::defaults::timeout(),
        }
    }
}
