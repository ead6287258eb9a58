//! Pending scan
//!
//! Finds order lines that still need a kitchen ticket and groups them
//! into one batch per order, preserving the backend's line order.

use std::collections::HashMap;

use comanda_odoo::{
    Domain, ORDER_LINE_MODEL, ORDER_MODEL, OdooGateway, OdooResult, OrderLineRecord, OrderRecord,
    PRINTED_FLAG_FIELD, parse_records,
};
use tracing::debug;

use super::types::PendingBatch;

/// Order states whose lines are eligible for printing. Draft and
/// cancelled orders never reach the kitchen.
pub const PENDING_ORDER_STATES: &[&str] = &["paid", "done", "invoiced"];

/// Cap on lines fetched per scan. Backstop against unbounded backlogs;
/// anything beyond it is picked up by the next cycle.
pub const PENDING_SEARCH_LIMIT: usize = 500;

/// Fetch the orders with unprinted lines, at most `max_orders` of them.
///
/// Eligible lines have a positive quantity, no printed flag, and belong
/// to an order in a final state. `category_id` narrows the scan to one
/// POS category subtree.
pub async fn fetch_pending_batches<G: OdooGateway + ?Sized>(
    gateway: &G,
    category_id: Option<i64>,
    max_orders: usize,
) -> OdooResult<Vec<PendingBatch>> {
    let mut domain = Domain::new()
        .eq(PRINTED_FLAG_FIELD, false)
        .gt("qty", 0)
        .any_of("order_id.state", PENDING_ORDER_STATES.iter().copied());
    if let Some(category) = category_id {
        domain = domain.child_of("product_id.pos_categ_id", category);
    }

    let line_ids = gateway
        .search(ORDER_LINE_MODEL, &domain, PENDING_SEARCH_LIMIT, None)
        .await?;
    if line_ids.is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<OrderLineRecord> = parse_records(
        gateway
            .read(ORDER_LINE_MODEL, &line_ids, OrderLineRecord::FIELDS)
            .await?,
    )?;

    let (order_ids, mut lines_by_order) = group_lines_by_order(lines);
    let order_ids: Vec<i64> = order_ids.into_iter().take(max_orders).collect();
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let orders: Vec<OrderRecord> = parse_records(
        gateway
            .read(ORDER_MODEL, &order_ids, OrderRecord::FIELDS)
            .await?,
    )?;
    let mut orders_by_id: HashMap<i64, OrderRecord> =
        orders.into_iter().map(|o| (o.id, o)).collect();

    let mut batches = Vec::with_capacity(order_ids.len());
    for order_id in order_ids {
        // An order can disappear between the line search and the order
        // read; its lines simply wait for the next cycle.
        let Some(order) = orders_by_id.remove(&order_id) else {
            debug!(order_id, "Order vanished between search and read, skipping");
            continue;
        };
        let Some(lines) = lines_by_order.remove(&order_id) else {
            continue;
        };
        batches.push(PendingBatch { order, lines });
    }

    Ok(batches)
}

/// Group lines by their parent order id.
///
/// Returns the order ids in first-seen order (which drives the print
/// order) alongside the per-order line lists.
pub(crate) fn group_lines_by_order(
    lines: Vec<OrderLineRecord>,
) -> (Vec<i64>, HashMap<i64, Vec<OrderLineRecord>>) {
    let mut order_ids: Vec<i64> = Vec::new();
    let mut by_order: HashMap<i64, Vec<OrderLineRecord>> = HashMap::new();

    for line in lines {
        let order_id = line.order.id;
        if !by_order.contains_key(&order_id) {
            order_ids.push(order_id);
        }
        by_order.entry(order_id).or_default().push(line);
    }

    (order_ids, by_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comanda_odoo::Many2One;

    fn line(id: i64, order_id: i64) -> OrderLineRecord {
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
            printed: false,
            write_date: None,
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let lines = vec![line(1, 30), line(2, 10), line(3, 30), line(4, 20)];

        let (order_ids, by_order) = group_lines_by_order(lines);

        assert_eq!(order_ids, vec![30, 10, 20]);
        assert_eq!(
            by_order[&30].iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(by_order[&10].len(), 1);
        assert_eq!(by_order[&20].len(), 1);
    }

    #[test]
    fn test_grouping_empty_input() {
        let (order_ids, by_order) = group_lines_by_order(Vec::new());
        assert!(order_ids.is_empty());
        assert!(by_order.is_empty());
    }
}
