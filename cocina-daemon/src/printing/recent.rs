//! Recent-orders view
//!
//! Read model over a recent window of orders, printed or not. Backs the
//! reprint action and the activity list; never writes to the backend.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDateTime};
use comanda_odoo::{
    Domain, ORDER_LINE_MODEL, ORDER_MODEL, OdooGateway, OdooResult, OrderLineRecord, OrderRecord,
    backend_datetime, parse_records,
};

use super::pending::{PENDING_ORDER_STATES, group_lines_by_order};
use super::renderer::TicketRenderer;
use super::types::RecentOrderEntry;

/// Minimum lines fetched regardless of the order cap, so small caps
/// still see orders with many lines.
const RECENT_SEARCH_FLOOR: usize = 50;

/// Newest activity first, line id as tiebreak.
const RECENT_SEARCH_ORDER: &str = "order_id.date_order desc, id desc";

/// Fetch the orders placed since `window_start`, newest activity first.
///
/// Unlike the pending scan, printed lines are included; each entry says
/// whether the whole order has been printed and carries the rendered
/// ticket for reprints. `now` is only the render timestamp.
pub async fn fetch_recent_orders<G: OdooGateway + ?Sized>(
    gateway: &G,
    renderer: &TicketRenderer,
    category_id: Option<i64>,
    window_start: NaiveDateTime,
    max_orders: usize,
    now: DateTime<Local>,
) -> OdooResult<Vec<RecentOrderEntry>> {
    let mut domain = Domain::new()
        .gt("qty", 0)
        .any_of("order_id.state", PENDING_ORDER_STATES.iter().copied())
        .ge("order_id.date_order", backend_datetime(window_start));
    if let Some(category) = category_id {
        domain = domain.child_of("product_id.pos_categ_id", category);
    }

    let limit = RECENT_SEARCH_FLOOR.max(max_orders * 10);
    let line_ids = gateway
        .search(ORDER_LINE_MODEL, &domain, limit, Some(RECENT_SEARCH_ORDER))
        .await?;
    if line_ids.is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<OrderLineRecord> = parse_records(
        gateway
            .read(
                ORDER_LINE_MODEL,
                &line_ids,
                OrderLineRecord::FIELDS_WITH_WRITE_DATE,
            )
            .await?,
    )?;

    let (order_ids, mut lines_by_order) = group_lines_by_order(lines);

    let orders: Vec<OrderRecord> = parse_records(
        gateway
            .read(ORDER_MODEL, &order_ids, OrderRecord::FIELDS)
            .await?,
    )?;
    let mut orders_by_id: HashMap<i64, OrderRecord> =
        orders.into_iter().map(|o| (o.id, o)).collect();

    let mut entries: Vec<RecentOrderEntry> = Vec::with_capacity(order_ids.len());
    for order_id in order_ids {
        let Some(order) = orders_by_id.remove(&order_id) else {
            continue;
        };
        let Some(lines) = lines_by_order.remove(&order_id) else {
            continue;
        };
        entries.push(build_entry(renderer, order, lines, now));
    }

    // Stable sort: entries with equal activity keep backend search order.
    entries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    entries.truncate(max_orders);
    Ok(entries)
}

/// Derive the view row for one order: printed state, latest write among
/// its lines, and the activity timestamp used for sorting.
fn build_entry(
    renderer: &TicketRenderer,
    order: OrderRecord,
    lines: Vec<OrderLineRecord>,
    now: DateTime<Local>,
) -> RecentOrderEntry {
    let mut last_write_date = String::new();
    let mut printed = true;
    for line in &lines {
        if let Some(write_date) = line.write_date.as_deref() {
            if write_date > last_write_date.as_str() {
                last_write_date = write_date.to_string();
            }
        }
        if !line.printed {
            printed = false;
        }
    }

    // Backend datetimes are lexically ordered strings, so string max
    // picks the later moment.
    let date_order = order.date_order.clone().unwrap_or_default();
    let last_activity = if date_order > last_write_date {
        date_order
    } else {
        last_write_date.clone()
    };

    let ticket_text = renderer.render(&order, &lines, now);

    RecentOrderEntry {
        order,
        lines,
        ticket_text,
        printed,
        last_write_date,
        last_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use comanda_odoo::Many2One;

    fn order(id: i64, date_order: &str) -> OrderRecord {
        OrderRecord {
            id,
            name: Some(format!("Pedido {id}")),
            partner: None,
            table: None,
            date_order: Some(date_order.to_string()),
            amount_total: 10.0,
            state: "paid".to_string(),
        }
    }

    fn line(id: i64, order_id: i64, printed: bool, write_date: Option<&str>) -> OrderLineRecord {
        OrderLineRecord {
            id,
            order: Many2One {
                id: order_id,
                name: format!("Pedido {order_id}"),
            },
            product: None,
            display_name: Some(format!("Item {id}")),
            qty: 1.0,
            note: None,
            printed,
            write_date: write_date.map(|d| d.to_string()),
        }
    }

    fn test_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_printed_only_when_every_line_printed() {
        let renderer = TicketRenderer::default();

        let all = build_entry(
            &renderer,
            order(1, "2024-03-07 10:00:00"),
            vec![line(1, 1, true, None), line(2, 1, true, None)],
            test_now(),
        );
        assert!(all.printed);

        let partial = build_entry(
            &renderer,
            order(2, "2024-03-07 10:00:00"),
            vec![line(3, 2, true, None), line(4, 2, false, None)],
            test_now(),
        );
        assert!(!partial.printed);
    }

    #[test]
    fn test_entry_activity_is_max_of_writes_and_order_date() {
        let renderer = TicketRenderer::default();

        // A line touched after the order was placed wins.
        let touched = build_entry(
            &renderer,
            order(1, "2024-03-07 10:00:00"),
            vec![
                line(1, 1, true, Some("2024-03-07 10:05:00")),
                line(2, 1, true, Some("2024-03-07 11:30:00")),
            ],
            test_now(),
        );
        assert_eq!(touched.last_write_date, "2024-03-07 11:30:00");
        assert_eq!(touched.last_activity, "2024-03-07 11:30:00");

        // An order placed after its lines were last written wins.
        let fresh = build_entry(
            &renderer,
            order(2, "2024-03-07 12:00:00"),
            vec![line(3, 2, true, Some("2024-03-07 11:00:00"))],
            test_now(),
        );
        assert_eq!(fresh.last_activity, "2024-03-07 12:00:00");
    }

    #[test]
    fn test_entry_without_write_dates_falls_back_to_order_date() {
        let renderer = TicketRenderer::default();
        let entry = build_entry(
            &renderer,
            order(1, "2024-03-07 10:00:00"),
            vec![line(1, 1, false, None)],
            test_now(),
        );

        assert_eq!(entry.last_write_date, "");
        assert_eq!(entry.last_activity, "2024-03-07 10:00:00");
    }

    #[test]
    fn test_entry_keeps_rendered_ticket() {
        let renderer = TicketRenderer::default();
        let entry = build_entry(
            &renderer,
            order(1, "2024-03-07 10:00:00"),
            vec![line(1, 1, true, None)],
            test_now(),
        );

        assert!(entry.ticket_text.contains("COMANDA COCINA"));
        assert!(entry.ticket_text.contains("1 x Item 1"));
    }
}
