//! Cocina Daemon - kitchen ticket printer for POS orders
//!
//! # Overview
//!
//! Scans the point-of-sale backend for paid orders whose lines have not
//! been printed yet, renders a fixed-width kitchen ticket per order,
//! delivers it to a thermal printer and marks the lines printed so they
//! never print twice. Runs once or stays up printing on an interval.
//!
//! # Module structure
//!
//! ```text
//! cocina-daemon/src/
//! ├── core/          # Configuration and CLI flags
//! ├── common/        # Logging
//! └── printing/      # Pending scan, renderer, cycle service, worker
//! ```

pub mod common;
pub mod core;
pub mod printing;

// Re-export public types
pub use crate::core::{Args, BackendConfig, Config, ConfigError};
pub use printing::{
    AutoPrintWorker, CycleReport, KitchenService, LoopState, PrinterTarget, PrinterTransport,
    RecentOrderEntry, ServiceError, ServiceOptions, TicketRenderer, TicketTransport,
};

// Re-export logger functions
pub use common::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______           _
  / ____/___  _____(_)___  ____ _
 / /   / __ \/ ___/ / __ \/ __ `/
/ /___/ /_/ / /__/ / / / / /_/ /
\____/\____/\___/_/_/ /_/\__,_/
    "#
    );
}
