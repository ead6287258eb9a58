//! # comanda-printer
//!
//! ESC/POS ticket printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS document building (init, code page, feed, cut)
//! - Windows-1252 encoding for Latin-script printers
//! - Network printing (TCP port 9100)
//! - Windows driver printing (RAW spooler documents)
//!
//! Business logic (WHAT to print) stays in application code: ticket
//! layout and the print/commit pipeline live in `cocina-daemon`.
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{ticket_document, NetworkPrinter, Printer};
//!
//! let doc = ticket_document("COMANDA COCINA\n2 x Cafe\n");
//! let printer = NetworkPrinter::from_addr("192.168.1.100:9100")?;
//! printer.print(&doc).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{convert_to_cp1252, normalize_newlines};
pub use error::{PrintError, PrintResult};
pub use escpos::{CODE_PAGE_WPC1252, EscPosBuilder, test_page_document, ticket_document};
pub use printer::{NetworkPrinter, Printer};

#[cfg(windows)]
pub use printer::WindowsPrinter;
