//! Kitchen Ticket Printing Module
//!
//! The whole pipeline from backend scan to paper:
//! - Pending scan: which order lines still need a ticket
//! - Rendering: fixed-width ticket text
//! - Service: print cycle with per-order isolation and commit
//! - Recent view: today's orders, reprint source
//! - Worker: the automatic loop

pub mod pending;
pub mod recent;
pub mod renderer;
pub mod service;
pub mod transport;
pub mod types;
pub mod worker;

pub use pending::{PENDING_ORDER_STATES, PENDING_SEARCH_LIMIT, fetch_pending_batches};
pub use recent::fetch_recent_orders;
pub use renderer::{DEFAULT_TICKET_WIDTH, TicketRenderer};
pub use service::{
    DEFAULT_MAX_ORDERS, KitchenService, ServiceError, ServiceOptions, TEST_PAGE_MESSAGE,
    print_test_page,
};
pub use transport::{PrinterTarget, PrinterTransport, TicketTransport};
pub use types::*;
pub use worker::{
    AutoPrintWorker, DEFAULT_AUTO_INTERVAL_SECS, MIN_AUTO_INTERVAL_SECS, effective_interval,
};
