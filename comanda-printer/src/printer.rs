//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - Windows driver printers (via Win32 API, RAW datatype)

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers accept raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer from host and port
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from an address string; the port defaults to 9100 when absent
    /// (e.g. both "192.168.1.50" and "192.168.1.50:9100" are accepted).
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let parsed: SocketAddr = match addr.parse() {
            Ok(a) => a,
            Err(_) => format!("{}:9100", addr)
                .parse()
                .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?,
        };

        Ok(Self {
            addr: parsed,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        let mut stream = stream;
        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;

        info!("Print job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Windows driver printer
///
/// Sends RAW documents through an installed printer driver, matching what
/// ticket printers installed via their vendor driver expect.
#[cfg(windows)]
pub struct WindowsPrinter {
    name: String,
}

#[cfg(windows)]
impl WindowsPrinter {
    /// Create a printer with a specific name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Get the printer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List available printers (filters out virtual printers)
    pub fn list() -> PrintResult<Vec<String>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
        };
        use windows::core::PWSTR;

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|_| PrintError::Spooler("EnumPrintersW failed".to_string()))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_5W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut result: Vec<String> = Vec::new();
            for info in slice.iter() {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = PWSTR(info.pPrinterName.0).to_string().unwrap_or_default();

                let port = if info.pPortName.is_null() {
                    String::new()
                } else {
                    PWSTR(info.pPortName.0).to_string().unwrap_or_default()
                };

                if !Self::is_virtual_port(&port) {
                    result.push(name);
                }
            }

            Ok(result)
        }
    }

    /// Check if a port belongs to a virtual printer (PDF, XPS, OneNote...).
    /// A kitchen ticket silently "printed" to a file is a lost ticket.
    fn is_virtual_port(port: &str) -> bool {
        let p = port.to_lowercase();
        p == "file:"
            || p == "portprompt:"
            || p == "xpsport:"
            || p.starts_with("onenote")
            || p == "nul:"
    }

    /// Get the default printer name
    pub fn default_printer() -> PrintResult<Option<String>> {
        use windows::Win32::Graphics::Printing::GetDefaultPrinterW;
        use windows::core::PWSTR;

        unsafe {
            let mut needed: u32 = 0;
            let _ = GetDefaultPrinterW(None, &mut needed);

            if needed == 0 {
                return Ok(None);
            }

            let mut buf: Vec<u16> = vec![0; needed as usize];
            let ok = GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed);

            if !ok.as_bool() {
                return Ok(None);
            }

            let name = PWSTR(buf.as_mut_ptr())
                .to_string()
                .map_err(|e| PrintError::Spooler(format!("UTF-16 decode failed: {}", e)))?;

            Ok(Some(name))
        }
    }

    /// Resolve a printer: an explicit name is validated against the
    /// installed list; otherwise the platform default is used.
    pub fn resolve(name: Option<&str>) -> PrintResult<WindowsPrinter> {
        if let Some(name) = name {
            let printers = Self::list()?;
            if printers.iter().any(|p| p == name) {
                return Ok(WindowsPrinter::new(name));
            }
            return Err(PrintError::NoPrinter(format!("Printer not found: {}", name)));
        }

        match Self::default_printer()? {
            Some(default) => Ok(WindowsPrinter::new(&default)),
            None => Err(PrintError::NoPrinter(
                "No default printer configured; pass an explicit printer name".to_string(),
            )),
        }
    }

    fn write_raw(&self, data: &[u8]) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
            StartDocPrinterW, StartPagePrinter, WritePrinter,
        };
        use windows::core::{PCWSTR, PWSTR};

        fn to_wide(s: &str) -> Vec<u16> {
            s.encode_utf16().chain(std::iter::once(0)).collect()
        }

        unsafe {
            let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
            let name_w = to_wide(&self.name);

            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                .map_err(|_| PrintError::Spooler("OpenPrinterW failed".to_string()))?;

            let doc_name_w = to_wide("Comanda Cocina");
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartDocPrinter failed".to_string()));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartPagePrinter failed".to_string()));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle);
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);

            if !ok.as_bool() {
                return Err(PrintError::Spooler("WritePrinter failed".to_string()));
            }

            if written != data.len() as u32 {
                return Err(PrintError::Spooler("Incomplete write".to_string()));
            }

            Ok(())
        }
    }
}

#[cfg(windows)]
impl Printer for WindowsPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // Spooler calls are synchronous, run in a blocking task
        let name = self.name.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let printer = WindowsPrinter { name };
            printer.write_raw(&data)
        })
        .await
        .map_err(|e| PrintError::Spooler(format!("Task join failed: {}", e)))?
    }

    async fn is_online(&self) -> bool {
        let name = self.name.clone();

        tokio::task::spawn_blocking(move || {
            Self::list()
                .map(|printers| printers.iter().any(|p| *p == name))
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_from_addr_with_port() {
        let printer = NetworkPrinter::from_addr("192.168.1.100:9101").unwrap();
        assert_eq!(printer.addr().port(), 9101);
    }

    #[test]
    fn test_from_addr_defaults_port() {
        let printer = NetworkPrinter::from_addr("192.168.1.100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("not an address");
        assert!(result.is_err());
    }
}
