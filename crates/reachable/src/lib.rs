//! Edge-triggered network reachability notifications.
//!
//! A [`Checker`] polls one `host:port` on a fixed interval and tells you when
//! it becomes reachable or stops being reachable. Each probe is two stages:
//! - a local check that at least one non-loopback interface is up
//! - a TCP connect to the target, bounded by a timeout (skipped if the local
//!   check fails)
//!
//! Repeated identical outcomes are silent; the first probe of a run always
//! notifies.
//!
//! # Example
//!
//! ```no_run
//! use reachable::Checker;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut checker = Checker::new("example.com:443".parse()?, |up| {
//!     println!("example.com is {}", if up { "UP" } else { "DOWN" });
//! })
//! .with_interval(Duration::from_secs(5));
//!
//! checker.start()?;
//! // ...
//! checker.stop()?;
//!
//! // Or the zero-configuration process-wide checker:
//! reachable::start("example.com")?;
//! if reachable::network_is_reachable() {
//!     // ...
//! }
//! reachable::stop()?;
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod defaults;
pub mod global;
pub mod probes;
pub mod types;

pub use checker::{Checker, Notifier};
pub use global::{network_is_reachable, start, stop};
pub use probes::{Interface, InterfaceProbe, InterfaceSource, Probe, ReachabilityProbe, SystemInterfaces, TcpProbe};
pub use types::{CheckerConfig, Status, Target};
