//! JSON-RPC transport
//!
//! Odoo exposes its `common` and `object` services on a single
//! `/jsonrpc` endpoint taking `{"method": "call", "params": {service,
//! method, args}}` envelopes. This module owns that wire shape; the
//! typed operations live in [`crate::gateway`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::{OdooError, OdooResult};

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

/// Odoo puts the useful exception text under `error.data.message`;
/// `error.message` is usually just "Odoo Server Error".
#[derive(Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    message: Option<String>,
}

/// JSON-RPC connection to one Odoo server
#[derive(Debug)]
pub struct JsonRpc {
    client: Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpc {
    /// Create a transport for a base URL (e.g. "https://pos.example.com")
    pub fn new(base_url: &str) -> OdooResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/jsonrpc", base_url.trim_end_matches('/')),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one `service.method(args)` call and return its `result`
    #[instrument(skip(self, args), fields(service = service, method = method))]
    pub async fn call(&self, service: &str, method: &str, args: Value) -> OdooResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": service,
                "method": method,
                "args": args,
            },
            "id": id,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse = response.json().await?;

        if let Some(err) = body.error {
            let message = err
                .data
                .and_then(|d| d.message)
                .unwrap_or(err.message);
            return Err(OdooError::Rpc {
                code: err.code,
                message,
            });
        }

        debug!(id, "RPC call completed");
        // `result: false` is a legitimate value (failed authenticate),
        // so a missing field maps to null rather than an error here
        Ok(body.result.unwrap_or(Value::Null))
    }
}
