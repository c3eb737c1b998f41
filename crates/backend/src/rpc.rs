//! Remote-procedure execution of translated SQL.
//!
//! The hosted project exposes a single `execute_dynamic_query` function
//! that runs an arbitrary SQL string under the caller's role and returns
//! JSON rows. Nothing here validates the SQL: the translator asks the
//! model for read-only, LIMIT-bounded SELECTs, but the only enforcement
//! is the database's own permission system.

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{BackendClient, BackendError};

/// Name of the remote procedure that runs a dynamic query.
pub const EXECUTE_FN: &str = "execute_dynamic_query";

impl BackendClient {
    /// Call a remote procedure with a JSON argument object.
    pub async fn rpc(&self, function: &str, args: &Value) -> Result<Value, BackendError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url(), function);
        debug!(function, "backend rpc");
        let resp = self.post_rpc(&url, args).await?;
        Ok(resp)
    }

    /// Execute a SQL string via the `execute_dynamic_query` procedure and
    /// normalize the response into rows. The SQL is forwarded as-is.
    pub async fn execute_dynamic_query(&self, sql: &str) -> Result<Vec<Value>, BackendError> {
        info!(sql_len = sql.len(), "executing dynamic query");
        let args = serde_json::json!({ "query_text": sql });
        let body = self.rpc(EXECUTE_FN, &args).await?;
        let rows = normalize_rows(body);
        debug!(rows = rows.len(), "dynamic query returned");
        Ok(rows)
    }
}

/// Normalize a remote-procedure response into a row sequence:
/// an array passes through, a single object is wrapped, null and
/// everything absent becomes empty.
pub fn normalize_rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
