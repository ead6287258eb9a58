//! Kitchen print service
//!
//! Orchestrates one print cycle: scan pending lines, render each order's
//! ticket, deliver it, then mark the lines printed on the backend. One
//! failing order never blocks the rest of the batch, and only one cycle
//! runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveTime, Utc};
use comanda_odoo::{
    ORDER_LINE_MODEL, OdooError, OdooGateway, OdooResult, PRINTED_AT_FIELD, PRINTED_FLAG_FIELD,
    backend_datetime,
};
use comanda_printer::{PrintError, test_page_document, ticket_document};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use super::pending::fetch_pending_batches;
use super::recent::fetch_recent_orders;
use super::renderer::TicketRenderer;
use super::transport::TicketTransport;
use super::types::{CycleReport, FailedTicket, PendingBatch, PrintedTicket, RecentOrderEntry};

/// Default cap on orders handled per cycle.
pub const DEFAULT_MAX_ORDERS: usize = 20;

/// Text sent by the printer self-test, no backend involved.
pub const TEST_PAGE_MESSAGE: &str = "PRUEBA COCINA – EPSON TM-T20III";

/// Pause between printed-flag write attempts.
const COMMIT_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("backend read failed: {0}")]
    BackendRead(#[source] OdooError),

    #[error("printer transport failed: {0}")]
    Transport(#[from] PrintError),

    #[error("a print cycle is already running")]
    CycleInProgress,

    #[error("order still has unprinted lines, only fully printed orders can be reprinted")]
    NotPrintedYet,
}

/// Cycle tuning knobs, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Restrict the scan to one POS category subtree.
    pub category_id: Option<i64>,
    /// Cap on orders per cycle; the rest wait for the next one.
    pub max_orders: usize,
    /// Render and report without printing or marking anything.
    pub dry_run: bool,
    /// Extra attempts for the printed-flag write after a successful print.
    pub commit_retries: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            category_id: None,
            max_orders: DEFAULT_MAX_ORDERS,
            dry_run: false,
            commit_retries: 0,
        }
    }
}

/// The print pipeline over a backend gateway and a ticket transport.
pub struct KitchenService<G, T> {
    gateway: G,
    transport: T,
    renderer: TicketRenderer,
    options: ServiceOptions,
    cycle_running: AtomicBool,
}

/// Releases the single-flight flag when a cycle ends, error paths included.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G, T> KitchenService<G, T>
where
    G: OdooGateway,
    T: TicketTransport,
{
    pub fn new(gateway: G, transport: T, renderer: TicketRenderer, options: ServiceOptions) -> Self {
        Self {
            gateway,
            transport,
            renderer,
            options,
            cycle_running: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// True while a cycle holds the single-flight flag.
    pub fn is_running(&self) -> bool {
        self.cycle_running.load(Ordering::Acquire)
    }

    /// Run one print cycle and report what happened per order.
    ///
    /// Rejects overlapping calls with [`ServiceError::CycleInProgress`]
    /// instead of queueing them; the caller decides whether to retry.
    pub async fn run_cycle(&self) -> Result<CycleReport, ServiceError> {
        if self
            .cycle_running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(ServiceError::CycleInProgress);
        }
        let _guard = CycleGuard(&self.cycle_running);

        let batches = fetch_pending_batches(
            &self.gateway,
            self.options.category_id,
            self.options.max_orders,
        )
        .await
        .map_err(ServiceError::BackendRead)?;

        if batches.is_empty() {
            debug!("No pending lines to print");
            return Ok(CycleReport::default());
        }

        info!(orders = batches.len(), dry_run = self.options.dry_run, "Printing kitchen tickets");

        let mut report = CycleReport::default();
        for batch in batches {
            self.process_batch(batch, &mut report).await;
        }

        info!(
            printed = report.printed.len(),
            failed = report.failed.len(),
            "Print cycle finished"
        );
        Ok(report)
    }

    /// Handle one order: render, print, commit. Failures land in the
    /// report instead of propagating, so the rest of the batch runs.
    #[instrument(skip(self, batch, report), fields(order_id = batch.order.id, order = batch.order.display_name()))]
    async fn process_batch(&self, batch: PendingBatch, report: &mut CycleReport) {
        let ticket_text = self.renderer.render(&batch.order, &batch.lines, Local::now());

        if self.options.dry_run {
            info!("Dry run, ticket rendered but not printed or marked");
            report.printed.push(PrintedTicket {
                order: batch.order,
                lines: batch.lines,
                ticket_text,
            });
            return;
        }

        let document = ticket_document(&ticket_text);
        if let Err(e) = self.transport.send(&document).await {
            error!(error = %e, target = %self.transport.describe(), "Ticket print failed");
            report.failed.push(FailedTicket {
                order: batch.order,
                lines: batch.lines,
                ticket_text,
                error: e.to_string(),
            });
            return;
        }

        let line_ids = batch.line_ids();
        if let Err(e) = self.commit_printed(&line_ids).await {
            // The paper is already out, so the batch counts as printed for
            // this run. The flags stay unset and the next cycle prints the
            // order again rather than dropping a ticket.
            warn!(
                error = %e,
                order_id = batch.order.id,
                ?line_ids,
                "Ticket printed but lines could not be marked, order will print again"
            );
        } else {
            info!(lines = line_ids.len(), "Ticket printed and committed");
        }

        report.printed.push(PrintedTicket {
            order: batch.order,
            lines: batch.lines,
            ticket_text,
        });
    }

    /// Set the printed flag and timestamp on the given lines.
    async fn commit_printed(&self, line_ids: &[i64]) -> OdooResult<()> {
        let mut attempt = 0u32;
        loop {
            let values = json!({
                PRINTED_FLAG_FIELD: true,
                PRINTED_AT_FIELD: backend_datetime(Utc::now().naive_utc()),
            });
            match self.gateway.write(ORDER_LINE_MODEL, line_ids, values).await {
                Ok(_) => return Ok(()),
                Err(e) if attempt < self.options.commit_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "Printed-flag write failed, retrying");
                    tokio::time::sleep(COMMIT_RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Today's orders with their rendered tickets, newest activity first.
    /// The window opens at local midnight.
    pub async fn recent_orders(&self) -> Result<Vec<RecentOrderEntry>, ServiceError> {
        let now = Local::now();
        let window_start = now.date_naive().and_time(NaiveTime::MIN);
        fetch_recent_orders(
            &self.gateway,
            &self.renderer,
            self.options.category_id,
            window_start,
            self.options.max_orders,
            now,
        )
        .await
        .map_err(ServiceError::BackendRead)
    }

    /// Send a stored ticket to the printer again.
    ///
    /// Only fully printed orders qualify; the backend is never touched,
    /// and the dry-run flag does not apply to an explicit reprint.
    pub async fn reprint(&self, entry: &RecentOrderEntry) -> Result<(), ServiceError> {
        if !entry.printed {
            return Err(ServiceError::NotPrintedYet);
        }

        let document = ticket_document(&entry.ticket_text);
        self.transport.send(&document).await?;
        info!(
            order_id = entry.order.id,
            order = entry.order.display_name(),
            "Ticket reprinted"
        );
        Ok(())
    }
}

/// Printer self-test. Needs no backend connection at all.
pub async fn print_test_page<T: TicketTransport + ?Sized>(transport: &T) -> Result<(), ServiceError> {
    let document = test_page_document(TEST_PAGE_MESSAGE);
    transport.send(&document).await?;
    info!(target = %transport.describe(), "Test page sent");
    Ok(())
}
