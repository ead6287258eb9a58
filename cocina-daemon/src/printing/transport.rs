//! Ticket transport
//!
//! How finished ESC/POS documents reach a physical printer. The trait is
//! the seam the pipeline tests against; [`PrinterTransport`] is the
//! production implementation.

use std::fmt;

use async_trait::async_trait;
use comanda_printer::{NetworkPrinter, PrintResult, Printer};
use tracing::debug;

#[cfg(windows)]
use comanda_printer::WindowsPrinter;
#[cfg(not(windows))]
use comanda_printer::PrintError;

/// Where tickets are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// Raw TCP printer, `host` or `host:port` (9100 when omitted).
    Network(String),
    /// Named spooler queue (Windows driver printing).
    Spooler(String),
    /// Whatever queue the system reports as default.
    DefaultSpooler,
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterTarget::Network(addr) => write!(f, "network printer {addr}"),
            PrinterTarget::Spooler(name) => write!(f, "spooler queue {name}"),
            PrinterTarget::DefaultSpooler => write!(f, "default spooler queue"),
        }
    }
}

/// Delivery seam for rendered tickets.
#[async_trait]
pub trait TicketTransport: Send + Sync {
    /// Deliver one complete document to the kitchen printer.
    async fn send(&self, document: &[u8]) -> PrintResult<()>;

    /// Destination label for logs and error messages.
    fn describe(&self) -> String;
}

/// Sends documents to the configured [`PrinterTarget`].
///
/// The target is resolved on every send rather than once at startup, so
/// a queue that appears (or a printer that comes online) mid-shift is
/// picked up without restarting the daemon.
pub struct PrinterTransport {
    target: PrinterTarget,
}

impl PrinterTransport {
    pub fn new(target: PrinterTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &PrinterTarget {
        &self.target
    }

    async fn send_to_network(&self, addr: &str, document: &[u8]) -> PrintResult<()> {
        let printer = NetworkPrinter::from_addr(addr)?;
        debug!(addr = %printer.addr(), "Sending document to network printer");
        printer.print(document).await
    }

    #[cfg(windows)]
    async fn send_to_spooler(&self, name: Option<&str>, document: &[u8]) -> PrintResult<()> {
        let printer = WindowsPrinter::resolve(name)?;
        debug!(printer = printer.name(), "Sending document to spooler");
        printer.print(document).await
    }

    #[cfg(not(windows))]
    async fn send_to_spooler(&self, _name: Option<&str>, _document: &[u8]) -> PrintResult<()> {
        Err(PrintError::InvalidConfig(
            "spooler printing requires Windows; configure a network printer address".to_string(),
        ))
    }
}

#[async_trait]
impl TicketTransport for PrinterTransport {
    async fn send(&self, document: &[u8]) -> PrintResult<()> {
        match &self.target {
            PrinterTarget::Network(addr) => self.send_to_network(addr, document).await,
            PrinterTarget::Spooler(name) => self.send_to_spooler(Some(name), document).await,
            PrinterTarget::DefaultSpooler => self.send_to_spooler(None, document).await,
        }
    }

    fn describe(&self) -> String {
        self.target.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        assert_eq!(
            PrinterTarget::Network("192.168.1.50:9100".to_string()).to_string(),
            "network printer 192.168.1.50:9100"
        );
        assert_eq!(
            PrinterTarget::Spooler("EPSON TM-T20III".to_string()).to_string(),
            "spooler queue EPSON TM-T20III"
        );
        assert_eq!(
            PrinterTarget::DefaultSpooler.to_string(),
            "default spooler queue"
        );
    }

    #[cfg(not(windows))]
    #[tokio::test]
    async fn test_spooler_target_rejected_off_windows() {
        let transport = PrinterTransport::new(PrinterTarget::DefaultSpooler);
        let err = transport.send(b"ticket").await.unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_network_target_with_bad_addr_fails_resolution() {
        let transport = PrinterTransport::new(PrinterTarget::Network("not an addr".to_string()));
        assert!(transport.send(b"ticket").await.is_err());
    }
}
