//! Process-wide default checker.
//!
//! `start("example.com")` once, then read [`network_is_reachable`] anywhere.
//! The flag reads `true` until the first probe says otherwise and is reset to
//! `true` by [`stop`], so code that never starts monitoring behaves as if the
//! network were present.

use crate::checker::Checker;
use crate::types::Target;
use common::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

static NETWORK_IS_REACHABLE: AtomicBool = AtomicBool::new(true);

static SINGLETON: Mutex<Option<Checker>> = Mutex::new(None);

fn singleton() -> MutexGuard<'static, Option<Checker>> {
    SINGLETON.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Last reachability reported by the default checker.
///
/// Best effort: readers may see a value that is one transition behind.
pub fn network_is_reachable() -> bool {
    NETWORK_IS_REACHABLE.load(Ordering::Relaxed)
}

fn set_network_is_reachable(reachable: bool) {
    NETWORK_IS_REACHABLE.store(reachable, Ordering::Relaxed);
}

/// Start the default checker against `hostname` (`host` or `host:port`).
///
/// Uses the process-wide default interval and timeout. Fails with
/// `AlreadyRunning` if the default checker is active.
pub fn start(hostname: &str) -> Result<()> {
    let target: Target = hostname.parse()?;
    start_checker(|| Checker::new(target, set_network_is_reachable))
}

fn start_checker(build: impl FnOnce() -> Checker) -> Result<()> {
    let mut slot = singleton();
    if slot.as_ref().is_some_and(Checker::is_running) {
        return Err(common::Error::AlreadyRunning);
    }
    slot.insert(build()).start()
}

/// Stop the default checker and reset the shared flag to `true`.
///
/// The flag is reset even when the checker was not running.
pub fn stop() -> Result<()> {
    let result = match singleton().as_mut() {
        Some(checker) => checker.stop(),
        None => Err(common::Error::NotRunning),
    };
    set_network_is_reachable(true);
    result
}
