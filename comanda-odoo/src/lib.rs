//! # comanda-odoo
//!
//! Odoo JSON-RPC client for the kitchen ticket pipeline.
//!
//! ## Scope
//!
//! This crate handles talking to the point-of-sale backend:
//! - JSON-RPC transport (`/jsonrpc`, `common` + `object` services)
//! - authentication (`common.authenticate` -> uid)
//! - the three model operations the pipeline uses: `search`, `read`,
//!   `write`, behind the [`OdooGateway`] trait
//! - domain filter building and the POS record models with their wire
//!   quirks (false-for-absent, many2one pairs)
//!
//! What to fetch and when to write stays in application code
//! (`cocina-daemon`).

mod domain;
mod error;
mod gateway;
mod models;
mod rpc;

// Re-exports
pub use domain::Domain;
pub use error::{OdooError, OdooResult};
pub use gateway::{OdooClient, OdooGateway};
pub use models::{
    BACKEND_DATETIME_FORMAT, Many2One, ORDER_LINE_MODEL, ORDER_MODEL, OrderLineRecord,
    OrderRecord, PRINTED_AT_FIELD, PRINTED_FLAG_FIELD, backend_datetime, parse_records,
};
pub use rpc::JsonRpc;
