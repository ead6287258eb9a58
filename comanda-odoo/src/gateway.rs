//! Backend gateway: authenticate plus the three model operations
//!
//! The pipeline only ever needs `search`, `read` and `write`, so that is
//! the whole trait surface. Keeping it a trait lets the print pipeline run
//! against an in-memory backend in tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domain::Domain;
use crate::error::{OdooError, OdooResult};
use crate::rpc::JsonRpc;

/// Remote model operations used by the print pipeline
#[async_trait]
pub trait OdooGateway: Send + Sync {
    /// Search record ids matching a domain
    async fn search(
        &self,
        model: &str,
        domain: &Domain,
        limit: usize,
        order: Option<&str>,
    ) -> OdooResult<Vec<i64>>;

    /// Read the given fields of the given records
    async fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> OdooResult<Vec<Value>>;

    /// Write field values onto the given records
    async fn write(&self, model: &str, ids: &[i64], values: Value) -> OdooResult<bool>;
}

/// Authenticated connection to one Odoo database
#[derive(Debug)]
pub struct OdooClient {
    rpc: JsonRpc,
    db: String,
    uid: i64,
    password: String,
}

impl OdooClient {
    /// Authenticate against `common.authenticate` and capture the session
    /// (db + uid + password travel with every subsequent call).
    pub async fn authenticate(
        url: &str,
        db: &str,
        login: &str,
        password: &str,
    ) -> OdooResult<Self> {
        let rpc = JsonRpc::new(url)?;

        let result = rpc
            .call("common", "authenticate", json!([db, login, password, {}]))
            .await?;

        // a rejected login yields `false`, not an error object
        let uid = result.as_i64().ok_or(OdooError::Unauthorized)?;

        info!(uid, db, "Authenticated with backend");

        Ok(Self {
            rpc,
            db: db.to_string(),
            uid,
            password: password.to_string(),
        })
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> OdooResult<Value> {
        self.rpc
            .call(
                "object",
                "execute_kw",
                json!([self.db, self.uid, self.password, model, method, args, kwargs]),
            )
            .await
    }
}

#[async_trait]
impl OdooGateway for OdooClient {
    #[instrument(skip(self, domain), fields(model = model, limit = limit))]
    async fn search(
        &self,
        model: &str,
        domain: &Domain,
        limit: usize,
        order: Option<&str>,
    ) -> OdooResult<Vec<i64>> {
        let mut kwargs = json!({ "limit": limit });
        if let Some(order) = order {
            kwargs["order"] = json!(order);
        }

        let result = self
            .execute_kw(model, "search", json!([domain.to_value()]), kwargs)
            .await?;

        serde_json::from_value(result)
            .map_err(|e| OdooError::InvalidResponse(format!("search ids: {}", e)))
    }

    #[instrument(skip(self, ids, fields), fields(model = model, count = ids.len()))]
    async fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> OdooResult<Vec<Value>> {
        let result = self
            .execute_kw(model, "read", json!([ids]), json!({ "fields": fields }))
            .await?;

        match result {
            Value::Array(records) => Ok(records),
            other => Err(OdooError::InvalidResponse(format!(
                "read returned non-array: {}",
                other
            ))),
        }
    }

    #[instrument(skip(self, ids, values), fields(model = model, count = ids.len()))]
    async fn write(&self, model: &str, ids: &[i64], values: Value) -> OdooResult<bool> {
        let result = self
            .execute_kw(model, "write", json!([ids, values]), json!({}))
            .await?;

        Ok(result.as_bool().unwrap_or(false))
    }
}
