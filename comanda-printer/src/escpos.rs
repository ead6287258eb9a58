//! ESC/POS command builder
//!
//! Builds the raw byte documents sent to kitchen ticket printers.

use crate::encoding::{convert_to_cp1252, normalize_newlines};

/// Windows-1252 code page slot on Epson-compatible printers (WPC1252).
pub const CODE_PAGE_WPC1252: u8 = 16;

/// ESC/POS command builder
///
/// Accumulates commands and code-page-encoded text into a byte buffer.
/// Text is converted to Windows-1252 as it is written, so command bytes
/// and text bytes never need a separating conversion pass.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Create a new builder, starting with printer initialization (ESC @)
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf }
    }

    /// Select a character code page (ESC t n)
    pub fn code_page(&mut self, n: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x74, n]);
        self
    }

    /// Write text, normalizing line endings and encoding to the code page
    pub fn text(&mut self, s: &str) -> &mut Self {
        let normalized = normalize_newlines(s);
        self.buf.extend_from_slice(&convert_to_cp1252(&normalized));
        self
    }

    /// Feed n blank lines (plain LF bytes)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        for _ in 0..lines {
            self.buf.push(b'\n');
        }
        self
    }

    /// Partial cut (GS V 1, leaves a small connection)
    pub fn cut_partial(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the byte document for one rendered ticket.
///
/// Protocol: init, code page select, the ticket text, three trailing
/// line feeds so the tail clears the cutter, then a partial cut.
pub fn ticket_document(text: &str) -> Vec<u8> {
    let mut builder = EscPosBuilder::new();
    builder
        .code_page(CODE_PAGE_WPC1252)
        .text(text)
        .feed(3)
        .cut_partial();
    builder.build()
}

/// Build a printer test document (no backend involved).
pub fn test_page_document(msg: &str) -> Vec<u8> {
    let mut builder = EscPosBuilder::new();
    builder
        .code_page(CODE_PAGE_WPC1252)
        .text(msg)
        .feed(2)
        .cut_partial();
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_seq(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn test_ticket_document_framing() {
        let doc = ticket_document("COMANDA COCINA\n");

        // starts with init + code page select
        assert_eq!(&doc[..5], &[0x1B, 0x40, 0x1B, 0x74, 16]);
        // ends with partial cut
        assert_eq!(&doc[doc.len() - 3..], &[0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_ticket_document_trailing_feed() {
        let doc = ticket_document("abc");
        // text has no newline of its own, so exactly the 3 feed LFs
        assert_eq!(count_seq(&doc, b"\n"), 3);
    }

    #[test]
    fn test_crlf_normalized() {
        let doc = ticket_document("a\r\nb");
        assert_eq!(count_seq(&doc, b"\r"), 0);
        assert_eq!(count_seq(&doc, b"a\nb"), 1);
    }

    #[test]
    fn test_unmappable_dropped_in_document() {
        let doc = ticket_document("Caf\u{e9} \u{1F525}");
        assert_eq!(count_seq(&doc, &[0xE9]), 1);
        assert_eq!(count_seq(&doc, b"&#"), 0);
    }

    #[test]
    fn test_test_page_document() {
        let doc = test_page_document("PRUEBA COCINA");
        assert_eq!(&doc[..2], &[0x1B, 0x40]);
        assert_eq!(count_seq(&doc, b"PRUEBA COCINA"), 1);
        assert_eq!(&doc[doc.len() - 3..], &[0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_builder_single_init() {
        let doc = ticket_document("x");
        assert_eq!(count_seq(&doc, &[0x1B, 0x40]), 1);
    }
}
