//! Runs one reachability checker per configured host.

use crate::config::{Config, ReportSettings};
use common::Result;
use reachable::{Checker, CheckerConfig};
use std::future::Future;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

/// Owns the per-host checkers and the optional process-wide status report
pub struct Monitor {
    checkers: Vec<Checker>,
    report: Option<ReportSettings>,
}

impl Monitor {
    /// Build checkers from configuration and seed the process-wide defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        reachable::defaults::set_interval(config.checker.interval);
        reachable::defaults::set_timeout(config.checker.timeout);

        let checkers = config
            .checker_configs()?
            .into_iter()
            .map(Self::logging_checker)
            .collect();

        Ok(Self {
            checkers,
            report: config.report.clone(),
        })
    }

    /// Build from ready-made checkers (no status report).
    pub fn with_checkers(checkers: Vec<Checker>) -> Self {
        Self {
            checkers,
            report: None,
        }
    }

    fn logging_checker(config: CheckerConfig) -> Checker {
        let host = config.target.to_string();
        Checker::from_config(config, move |up| {
            if up {
                info!(host = %host, "{} is UP", host);
            } else {
                warn!(host = %host, "{} is DOWN", host);
            }
        })
    }

    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Start every checker, and the process-wide one if a report is configured.
    pub fn start(&mut self) -> Result<()> {
        for checker in &mut self.checkers {
            checker.start()?;
        }
        if let Some(report) = &self.report {
            reachable::start(&report.host)?;
        }
        info!(checkers = self.checkers.len(), "Monitor started");
        Ok(())
    }

    /// Stop every running checker and wait for their loops to exit.
    pub async fn stop(&mut self) -> Result<()> {
        for checker in &mut self.checkers {
            if checker.is_running() {
                checker.stop_and_wait().await?;
            }
        }
        if self.report.is_some() {
            reachable::stop()?;
        }
        info!("Monitor stopped");
        Ok(())
    }

    /// Run until `shutdown` resolves, logging the shared flag if configured.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        self.start()?;
        tokio::pin!(shutdown);

        match self.report.clone() {
            Some(report) => {
                let mut ticker = interval(report.interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = ticker.tick() => {
                            let status = if reachable::network_is_reachable() { "REACHABLE" } else { "NOT REACHABLE" };
                            info!(host = %report.host, "{} {}", report.host, status);
                        }
                    }
                }
            }
            None => shutdown.await,
        }

        self.stop().await
    }
}
