//! Data shapes shared across the kitchen printing pipeline.

use comanda_odoo::{OrderLineRecord, OrderRecord};

/// One order together with its unprinted kitchen lines.
///
/// Produced by the pending scan. Line order inside a batch follows the
/// backend read order so the ticket lists items the way they were sold.
#[derive(Debug, Clone)]
pub struct PendingBatch {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
}

impl PendingBatch {
    /// Ids of every line in this batch, in ticket order.
    pub fn line_ids(&self) -> Vec<i64> {
        self.lines.iter().map(|line| line.id).collect()
    }
}

/// Outcome for a ticket that reached the printer, or would have in dry run.
#[derive(Debug, Clone)]
pub struct PrintedTicket {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
    pub ticket_text: String,
}

/// Outcome for a ticket the printer rejected. The rendered text is kept so
/// the operator can inspect or retry what failed.
#[derive(Debug, Clone)]
pub struct FailedTicket {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
    pub ticket_text: String,
    pub error: String,
}

/// Summary of one print cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub printed: Vec<PrintedTicket>,
    pub failed: Vec<FailedTicket>,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.printed.is_empty() && self.failed.is_empty()
    }

    /// One-line summary for log output.
    pub fn summary(&self) -> String {
        format!("{} printed, {} failed", self.printed.len(), self.failed.len())
    }
}

/// Row in the recent-orders view.
///
/// `ticket_text` is rendered up front so a reprint sends exactly what the
/// kitchen saw the first time, even if the backend changed since.
#[derive(Debug, Clone)]
pub struct RecentOrderEntry {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
    pub ticket_text: String,
    /// True only when every line of the order carries the printed flag.
    pub printed: bool,
    /// Latest `write_date` among the order's lines, backend string format.
    pub last_write_date: String,
    /// Max of `last_write_date` and the order's `date_order`. Sort key.
    pub last_activity: String,
}

/// Phases of the automatic print loop. Published over a watch channel so
/// callers can observe startup and shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopping,
}
