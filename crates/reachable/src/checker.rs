//! Reachability checker: background poll loop with edge-triggered notifications.

use crate::probes::{Probe, ReachabilityProbe};
use crate::types::{CheckerConfig, Status, Target};
use common::{Error, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Reachability callback. Called with `true` when the target becomes
/// reachable and `false` when it stops being reachable.
pub type Notifier = Arc<dyn Fn(bool) + Send + Sync>;

/// Cleared when a run is stopped. The loop holds the lock while calling the
/// notifier, so clearing it waits out any notification in progress.
type Live = Arc<Mutex<bool>>;

/// Handle to one running poll loop
struct Run {
    cancel: oneshot::Sender<()>,
    live: Live,
    task: JoinHandle<()>,
}

impl Run {
    fn close(&self) {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

/// Reachability checker
///
/// Polls its target every interval and calls the notifier only when the
/// outcome differs from the last one delivered. The first probe of every run
/// always notifies.
///
/// Dropping a running checker cancels its poll loop.
pub struct Checker {
    config: CheckerConfig,
    notifier: Notifier,
    probe: Option<Arc<dyn Probe>>,
    run: Option<Run>,
}

impl Checker {
    /// Create a checker for `target` with default interval and timeout
    pub fn new(target: Target, notifier: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self::from_config(CheckerConfig::new(target), notifier)
    }

    /// Create a checker from a full configuration
    pub fn from_config(config: CheckerConfig, notifier: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self {
            config,
            notifier: Arc::new(notifier),
            probe: None,
            run: None,
        }
    }

    /// Override the poll interval (takes effect on the next `start`)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.config.interval = Some(interval);
        self
    }

    /// Override the TCP connect timeout (takes effect on the next `start`)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Replace the interface + TCP probe with a custom one
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn target(&self) -> &Target {
        &self.config.target
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Start polling in a background task.
    ///
    /// Returns immediately. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.run.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let interval = self.config.effective_interval();
        let timeout = self.config.effective_timeout();
        let target = self.config.target.clone();
        let probe = self
            .probe
            .clone()
            .unwrap_or_else(|| Arc::new(ReachabilityProbe::system(target.clone(), timeout)));

        info!(
            target = %target,
            interval_ms = interval.as_millis(),
            timeout_ms = timeout.as_millis(),
            "Starting reachability checker"
        );

        let (cancel, cancel_rx) = oneshot::channel();
        let live: Live = Arc::new(Mutex::new(true));
        let task = handle.spawn(poll_loop(
            target,
            probe,
            interval,
            self.notifier.clone(),
            live.clone(),
            cancel_rx,
        ));
        self.run = Some(Run { cancel, live, task });
        Ok(())
    }

    /// Ask the poll loop to stop.
    ///
    /// Does not wait for the loop to exit. If the notifier is running it
    /// finishes first; no notification is delivered once this returns.
    pub fn stop(&mut self) -> Result<()> {
        self.take_run().map(|_| ())
    }

    /// Stop and wait for the poll loop to exit.
    pub async fn stop_and_wait(&mut self) -> Result<()> {
        let task = self.take_run()?;
        task.await.map_err(Error::task)
    }

    fn take_run(&mut self) -> Result<JoinHandle<()>> {
        let run = self.run.take().ok_or(Error::NotRunning)?;
        debug!(target = %self.config.target, "Stopping reachability checker");
        run.close();
        // The loop may already be gone if the notifier panicked.
        let _ = run.cancel.send(());
        Ok(run.task)
    }
}

impl Drop for Checker {
    fn drop(&mut self) {
        if let Some(run) = &self.run {
            run.close();
        }
    }
}

/// Apply one probe outcome. Returns `false` once the run has been stopped.
fn deliver(live: &Live, status: &mut Status, reachable: bool, target: &Target, notifier: &Notifier) -> bool {
    let live = live.lock().unwrap_or_else(PoisonError::into_inner);
    if !*live {
        return false;
    }

    match status.transition(reachable) {
        Some(next) => {
            info!(target = %target, from = %status, to = %next, "Reachability changed");
            *status = next;
            notifier(reachable);
        }
        None => debug!(target = %target, status = %status, "Reachability unchanged"),
    }
    true
}

/// Poll loop for one run. Owns the ticker, which is released on exit.
async fn poll_loop(
    target: Target,
    probe: Arc<dyn Probe>,
    period: Duration,
    notifier: Notifier,
    live: Live,
    mut cancel: oneshot::Receiver<()>,
) {
    // First probe one full period after start, like a plain ticker.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut status = Status::Unknown;

    loop {
        tokio::select! {
            biased;
            // Fires on an explicit stop and when the checker is dropped.
            _ = &mut cancel => break,
            _ = ticker.tick() => {
                let reachable = probe.check().await;
                // Stop may have arrived while the probe was in flight.
                if !deliver(&live, &mut status, reachable, &target, &notifier) {
                    break;
                }
            }
        }
    }

    debug!(target = %target, "Reachability checker stopped");
}
