//! POS record models
//!
//! Typed views over the `pos.order` / `pos.order.line` records this system
//! reads. Two Odoo JSON conventions need handling here: absent scalar
//! fields come back as `false` (never `null`), and many2one references
//! come back as a `[id, "display name"]` pair.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{OdooError, OdooResult};

/// Order entity name
pub const ORDER_MODEL: &str = "pos.order";
/// Order-line entity name
pub const ORDER_LINE_MODEL: &str = "pos.order.line";

/// Custom flag field marking a line as sent to the kitchen printer
pub const PRINTED_FLAG_FIELD: &str = "x_impreso_cocina";
/// Custom timestamp field recording when the line was printed (UTC)
pub const PRINTED_AT_FIELD: &str = "x_impreso_fecha";

/// Timestamp format used by the backend for datetime fields
pub const BACKEND_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the backend stores datetimes.
///
/// The format sorts lexicographically in chronological order, which the
/// recent-orders view relies on when comparing raw field values.
pub fn backend_datetime(dt: NaiveDateTime) -> String {
    dt.format(BACKEND_DATETIME_FORMAT).to_string()
}

/// Many2one reference: `[id, "display name"]` on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Many2One {
    pub id: i64,
    pub name: String,
}

impl<'de> Deserialize<'de> for Many2One {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (id, name) = <(i64, String)>::deserialize(deserializer)?;
        Ok(Many2One { id, name })
    }
}

/// Deserialize a field where the backend sends `false` for "not set"
fn false_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Bool(false) | Value::Null => Ok(None),
        other => T::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// One point-of-sale order (read-only here)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "false_as_none")]
    pub name: Option<String>,
    #[serde(default, rename = "partner_id", deserialize_with = "false_as_none")]
    pub partner: Option<Many2One>,
    #[serde(default, rename = "table_id", deserialize_with = "false_as_none")]
    pub table: Option<Many2One>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub date_order: Option<String>,
    #[serde(default)]
    pub amount_total: f64,
    #[serde(default)]
    pub state: String,
}

impl OrderRecord {
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "partner_id",
        "table_id",
        "date_order",
        "amount_total",
        "state",
    ];

    /// Ticket/order number shown on the printed header
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// One order line; the only records this system ever writes back to
/// (the printed flag and timestamp).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRecord {
    pub id: i64,
    #[serde(rename = "order_id")]
    pub order: Many2One,
    #[serde(default, rename = "product_id", deserialize_with = "false_as_none")]
    pub product: Option<Many2One>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub qty: f64,
    #[serde(default, deserialize_with = "false_as_none")]
    pub note: Option<String>,
    #[serde(default, rename = "x_impreso_cocina")]
    pub printed: bool,
    #[serde(default, deserialize_with = "false_as_none")]
    pub write_date: Option<String>,
}

impl OrderLineRecord {
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "order_id",
        "product_id",
        "display_name",
        "qty",
        "note",
        "x_impreso_cocina",
    ];

    /// Pending fields plus `write_date`, for the recent-orders view
    pub const FIELDS_WITH_WRITE_DATE: &'static [&'static str] = &[
        "id",
        "order_id",
        "product_id",
        "display_name",
        "qty",
        "note",
        "x_impreso_cocina",
        "write_date",
    ];

    /// Item description: explicit display name, falling back to the
    /// linked product's label (an empty display name also falls back).
    pub fn description(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self
                .product
                .as_ref()
                .map(|p| p.name.as_str())
                .unwrap_or(""),
        }
    }
}

/// Deserialize a batch of raw `read` records into typed ones
pub fn parse_records<T: DeserializeOwned>(values: Vec<Value>) -> OdooResult<Vec<T>> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(OdooError::from))
        .collect()
}
