//! Automatic print loop
//!
//! Runs a print cycle immediately, then again after every interval until
//! cancelled. Cycle failures are logged and the loop keeps going; the
//! backend being down for a minute must not kill the daemon.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use comanda_odoo::OdooGateway;

use super::service::{KitchenService, ServiceError};
use super::transport::TicketTransport;
use super::types::{CycleReport, LoopState};

/// Shortest allowed cycle interval. Anything lower hammers the backend
/// without getting tickets out faster.
pub const MIN_AUTO_INTERVAL_SECS: u64 = 5;

/// Default cycle interval.
pub const DEFAULT_AUTO_INTERVAL_SECS: u64 = 30;

/// Clamp an interval to the allowed floor.
pub fn effective_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.max(MIN_AUTO_INTERVAL_SECS))
}

/// Periodic driver around [`KitchenService::run_cycle`].
pub struct AutoPrintWorker<G, T> {
    service: Arc<KitchenService<G, T>>,
    interval: Duration,
    state: watch::Sender<LoopState>,
    reports: Option<mpsc::UnboundedSender<CycleReport>>,
}

impl<G, T> AutoPrintWorker<G, T>
where
    G: OdooGateway,
    T: TicketTransport,
{
    /// Build a worker and the handle observers watch the loop state on.
    pub fn new(
        service: Arc<KitchenService<G, T>>,
        interval_secs: u64,
    ) -> (Self, watch::Receiver<LoopState>) {
        let (state, state_rx) = watch::channel(LoopState::Idle);
        let worker = Self {
            service,
            interval: effective_interval(interval_secs),
            state,
            reports: None,
        };
        (worker, state_rx)
    }

    /// Forward every cycle report to `tx` as well as logging it.
    pub fn with_report_channel(mut self, tx: mpsc::UnboundedSender<CycleReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until `shutdown` fires. The first cycle starts immediately;
    /// cancellation interrupts the wait, not an in-flight cycle.
    ///
    /// The published state is `Running` while a cycle is in flight and
    /// `Idle` during the wait between cycles.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Automatic printing started");

        loop {
            let _ = self.state.send(LoopState::Running);
            self.run_one_cycle().await;
            let _ = self.state.send(LoopState::Idle);

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        let _ = self.state.send(LoopState::Stopping);
        info!("Automatic printing stopped");
        let _ = self.state.send(LoopState::Idle);
    }

    async fn run_one_cycle(&self) {
        match self.service.run_cycle().await {
            Ok(report) => {
                if report.is_empty() {
                    debug!("No pending tickets this cycle");
                } else {
                    info!(summary = %report.summary(), "Automatic cycle finished");
                    if !report.failed.is_empty() {
                        warn!(failed = report.failed.len(), "Some tickets failed to print");
                    }
                }
                if let Some(tx) = &self.reports {
                    let _ = tx.send(report);
                }
            }
            // A manual print action holds the flag; this tick is simply lost.
            Err(ServiceError::CycleInProgress) => {
                debug!("Cycle already in progress, skipping this tick");
            }
            Err(e) => {
                error!(error = %e, "Automatic cycle failed");
            }
        }
    }
}
