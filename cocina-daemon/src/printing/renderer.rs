//! Kitchen ticket renderer
//!
//! Renders an order and its lines into the fixed-width plain text layout
//! the kitchen reads. Byte handling (code page, cut) lives in
//! `comanda-printer`; this module only produces text.

use chrono::{DateTime, Local};
use comanda_odoo::{OrderLineRecord, OrderRecord};

/// Characters per line on 80mm paper. 42 suits the Epson TM series.
pub const DEFAULT_TICKET_WIDTH: usize = 42;

/// Kitchen ticket renderer
///
/// Layout per ticket: centered title and timestamp, a dashed rule, the
/// ticket number plus optional table and customer, a double rule, one
/// block per item (quantity, description, wrapped note), and a footer.
pub struct TicketRenderer {
    width: usize,
}

impl TicketRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render the full ticket text. Ends with a single trailing newline.
    ///
    /// `now` is the wall-clock moment stamped on the header; callers pass
    /// `Local::now()` outside tests.
    pub fn render(
        &self,
        order: &OrderRecord,
        lines: &[OrderLineRecord],
        now: DateTime<Local>,
    ) -> String {
        let mut out: Vec<String> = Vec::new();

        self.render_header(&mut out, order, now);

        for line in lines {
            self.render_item(&mut out, line);
        }

        out.push(self.rule('='));
        out.push(self.center("FIN COMANDA"));
        out.push(String::new());

        out.join("\n")
    }

    /// Header: title, timestamp, ticket number, table/customer when set.
    fn render_header(&self, out: &mut Vec<String>, order: &OrderRecord, now: DateTime<Local>) {
        out.push(self.center("COMANDA COCINA"));
        out.push(self.center(&now.format("%d/%m/%Y %H:%M").to_string()));
        out.push(self.rule('-'));
        out.push(self.trunc_pad(&format!("Ticket: {}", order.display_name())));
        if let Some(table) = &order.table {
            out.push(self.trunc_pad(&format!("Mesa: {}", table.name)));
        }
        if let Some(partner) = &order.partner {
            out.push(self.trunc_pad(&format!("Cliente: {}", partner.name)));
        }
        out.push(self.rule('='));
        // Blank line separates the header from the first item.
        out.push(String::new());
    }

    /// One item block: `QTY x DESCRIPTION`, the note wrapped below it,
    /// then a blank line.
    fn render_item(&self, out: &mut Vec<String>, line: &OrderLineRecord) {
        let base = format!("{} x {}", format_qty(line.qty), line.description());
        out.push(self.trunc_pad(&base));

        if let Some(note) = line.note.as_deref() {
            let note = note.trim();
            if !note.is_empty() {
                out.extend(self.wrap_note(&format!("({note})"), 2));
            }
        }

        out.push(String::new());
    }

    /// Truncate to the ticket width, then pad with spaces to exactly
    /// that width.
    fn trunc_pad(&self, text: &str) -> String {
        let mut s: String = text.chars().take(self.width).collect();
        let len = s.chars().count();
        for _ in len..self.width {
            s.push(' ');
        }
        s
    }

    /// Truncate, then indent so the text sits centered. Leading spaces
    /// only, no trailing pad.
    fn center(&self, text: &str) -> String {
        let s: String = text.chars().take(self.width).collect();
        let len = s.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        format!("{}{}", " ".repeat(pad), s)
    }

    fn rule(&self, ch: char) -> String {
        std::iter::repeat(ch).take(self.width).collect()
    }

    /// Greedy word wrap at `width - indent`, each segment prefixed with
    /// `indent` spaces. Words longer than one line are hard-broken.
    /// Segments are not padded.
    fn wrap_note(&self, text: &str, indent: usize) -> Vec<String> {
        let limit = self.width.saturating_sub(indent).max(1);
        let prefix = " ".repeat(indent);
        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        let push_word = |word: &str, seg: &mut Vec<String>, cur: &mut String, cur_len: &mut usize| {
            let word_len = word.chars().count();
            if *cur_len > 0 && *cur_len + 1 + word_len <= limit {
                cur.push(' ');
                cur.push_str(word);
                *cur_len += 1 + word_len;
            } else if *cur_len == 0 && word_len <= limit {
                cur.push_str(word);
                *cur_len = word_len;
            } else {
                seg.push(format!("{prefix}{cur}"));
                cur.clear();
                cur.push_str(word);
                *cur_len = word_len;
            }
        };

        for word in text.split_whitespace() {
            if word.chars().count() <= limit {
                push_word(word, &mut segments, &mut current, &mut current_len);
                continue;
            }
            // Hard-break an overlong word into width-sized chunks.
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(limit) {
                let piece: String = chunk.iter().collect();
                push_word(&piece, &mut segments, &mut current, &mut current_len);
            }
        }

        if current_len > 0 {
            segments.push(format!("{prefix}{current}"));
        }
        segments
    }
}

impl Default for TicketRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_WIDTH)
    }
}

/// Quantities print without decimals when integral (`2 x ...`), with the
/// decimal part otherwise (`0.5 x ...`).
fn format_qty(qty: f64) -> String {
    if (qty - qty.round()).abs() < f64::EPSILON {
        format!("{qty:.0}")
    } else {
        format!("{qty}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use comanda_odoo::Many2One;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 13, 45, 0).unwrap()
    }

    fn test_order() -> OrderRecord {
        OrderRecord {
            id: 101,
            name: Some("Pedido 00042-001-0001".to_string()),
            partner: Some(Many2One {
                id: 7,
                name: "Mesa Terraza".to_string(),
            }),
            table: Some(Many2One {
                id: 3,
                name: "T5".to_string(),
            }),
            date_order: Some("2024-03-07 12:40:00".to_string()),
            amount_total: 34.5,
            state: "paid".to_string(),
        }
    }

    fn line(qty: f64, desc: &str, note: Option<&str>) -> OrderLineRecord {
        OrderLineRecord {
            id: 1,
            order: Many2One {
                id: 101,
                name: "Pedido 00042-001-0001".to_string(),
            },
            product: Some(Many2One {
                id: 11,
                name: desc.to_string(),
            }),
            display_name: Some(desc.to_string()),
            qty,
            note: note.map(|n| n.to_string()),
            printed: false,
            write_date: None,
        }
    }

    #[test]
    fn test_render_full_ticket_layout() {
        let renderer = TicketRenderer::default();
        let order = test_order();
        let lines = vec![
            line(2.0, "Milanesa napolitana", Some("sin papas")),
            line(1.0, "Ensalada mixta", None),
        ];

        let text = renderer.render(&order, &lines, test_time());
        let rows: Vec<&str> = text.split('\n').collect();

        assert_eq!(rows[0], format!("{}COMANDA COCINA", " ".repeat(14)));
        assert_eq!(rows[1], format!("{}07/03/2024 13:45", " ".repeat(13)));
        assert_eq!(rows[2], "-".repeat(42));
        assert_eq!(rows[3], format!("{:<42}", "Ticket: Pedido 00042-001-0001"));
        assert_eq!(rows[4], format!("{:<42}", "Mesa: T5"));
        assert_eq!(rows[5], format!("{:<42}", "Cliente: Mesa Terraza"));
        assert_eq!(rows[6], "=".repeat(42));
        assert_eq!(rows[7], "");
        assert_eq!(rows[8], format!("{:<42}", "2 x Milanesa napolitana"));
        assert_eq!(rows[9], "  (sin papas)");
        assert_eq!(rows[10], "");
        assert_eq!(rows[11], format!("{:<42}", "1 x Ensalada mixta"));
        assert_eq!(rows[12], "");
        assert_eq!(rows[13], "=".repeat(42));
        assert_eq!(rows[14], format!("{}FIN COMANDA", " ".repeat(15)));
        assert_eq!(rows[15], "");
        assert_eq!(rows.len(), 16);
    }

    #[test]
    fn test_header_skips_missing_table_and_customer() {
        let renderer = TicketRenderer::default();
        let mut order = test_order();
        order.table = None;
        order.partner = None;

        let text = renderer.render(&order, &[line(1.0, "Cafe", None)], test_time());

        assert!(!text.contains("Mesa:"));
        assert!(!text.contains("Cliente:"));
        assert!(text.contains("Ticket: Pedido 00042-001-0001"));
    }

    #[test]
    fn test_fractional_quantity_keeps_decimals() {
        let renderer = TicketRenderer::default();
        let text = renderer.render(
            &test_order(),
            &[line(0.5, "Porcion flan", None), line(3.0, "Agua", None)],
            test_time(),
        );

        assert!(text.contains("0.5 x Porcion flan"));
        assert!(text.contains("3 x Agua"));
        assert!(!text.contains("3.0 x"));
    }

    #[test]
    fn test_long_description_is_truncated_to_width() {
        let renderer = TicketRenderer::default();
        let desc = "Hamburguesa completa con queso cheddar doble y panceta ahumada";
        let text = renderer.render(&test_order(), &[line(1.0, desc, None)], test_time());

        let item_line = text
            .lines()
            .find(|l| l.starts_with("1 x Hamburguesa"))
            .unwrap();
        assert_eq!(item_line.chars().count(), DEFAULT_TICKET_WIDTH);
    }

    #[test]
    fn test_note_wraps_with_two_space_indent() {
        let renderer = TicketRenderer::default();
        let note = "sin sal sin aceite bien cocida y cortada en cuatro partes iguales";
        let text = renderer.render(&test_order(), &[line(1.0, "Pizza", Some(note))], test_time());

        // Note segments carry exactly two leading spaces; centered header
        // lines carry far more, so require a non-space right after.
        let note_lines: Vec<&str> = text
            .lines()
            .filter(|l| {
                l.strip_prefix("  ")
                    .is_some_and(|rest| !rest.is_empty() && !rest.starts_with(' '))
            })
            .collect();
        assert!(note_lines.len() >= 2, "long note should wrap: {note_lines:?}");
        for l in &note_lines {
            assert!(l.chars().count() <= DEFAULT_TICKET_WIDTH);
            assert!(l.starts_with("  "));
        }
        assert!(note_lines[0].starts_with("  (sin sal"));
        assert!(text.contains("iguales)"));
    }

    #[test]
    fn test_blank_and_whitespace_notes_are_skipped() {
        let renderer = TicketRenderer::default();
        let text = renderer.render(
            &test_order(),
            &[line(1.0, "Te", Some("   ")), line(1.0, "Mate", Some(""))],
            test_time(),
        );

        assert!(!text.contains('('));
        assert!(!text.contains(')'));
    }

    #[test]
    fn test_overlong_word_in_note_is_hard_broken() {
        let renderer = TicketRenderer::default();
        let note: String = "x".repeat(95);
        let text = renderer.render(&test_order(), &[line(1.0, "Combo", Some(&note))], test_time());

        for l in text.lines() {
            assert!(
                l.chars().count() <= DEFAULT_TICKET_WIDTH,
                "line overflows: {l:?}"
            );
        }
    }

    #[test]
    fn test_description_falls_back_to_product_name() {
        let renderer = TicketRenderer::default();
        let mut item = line(1.0, "Lomito", None);
        item.display_name = None;

        let text = renderer.render(&test_order(), &[item], test_time());
        assert!(text.contains("1 x Lomito"));
    }

    #[test]
    fn test_ticket_ends_with_single_newline() {
        let renderer = TicketRenderer::default();
        let text = renderer.render(&test_order(), &[line(1.0, "Cafe", None)], test_time());

        assert!(text.ends_with("FIN COMANDA\n"));
        assert!(!text.ends_with("\n\n"));
    }

    proptest! {
        #[test]
        fn prop_no_rendered_line_exceeds_width(
            desc in "[a-zA-Z0-9 áéíóúñ]{0,80}",
            note in "[a-zA-Z0-9 ]{0,120}",
            qty in 0.1f64..50.0,
        ) {
            let renderer = TicketRenderer::default();
            let note_opt = if note.is_empty() { None } else { Some(note.as_str()) };
            let text = renderer.render(
                &test_order(),
                &[line(qty, &desc, note_opt)],
                test_time(),
            );
            for l in text.lines() {
                prop_assert!(l.chars().count() <= DEFAULT_TICKET_WIDTH);
            }
        }
    }
}
