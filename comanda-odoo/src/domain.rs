//! Domain filter builder
//!
//! Odoo search domains are arrays of `[field, operator, value]` triples;
//! adjacent triples form an implicit conjunction. Only the operators this
//! system queries with are exposed.

use serde_json::{Value, json};

/// Conjunction of `(field, operator, value)` clauses
#[derive(Debug, Clone, Default)]
pub struct Domain {
    clauses: Vec<Value>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    fn clause(mut self, field: &str, op: &str, value: Value) -> Self {
        self.clauses.push(json!([field, op, value]));
        self
    }

    /// `field = value`
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, "=", value.into())
    }

    /// `field > value`
    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, ">", value.into())
    }

    /// `field >= value`
    pub fn ge(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, ">=", value.into())
    }

    /// `field in values`
    pub fn any_of<V: Into<Value>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let list: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.clause(field, "in", Value::Array(list))
    }

    /// `field child_of id` (matches the whole category subtree)
    pub fn child_of(self, field: &str, id: i64) -> Self {
        self.clause(field, "child_of", id.into())
    }

    /// Wire representation: `[[field, op, value], ...]`
    pub fn to_value(&self) -> Value {
        Value::Array(self.clauses.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
