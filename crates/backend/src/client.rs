use serde_json::Value;
use sortie_core::config::BackendConfig;
use tracing::debug;

/// Lightweight handle on the hosted database's REST API.
pub struct BackendClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend not configured: {0}")]
    NotConfigured(String),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Database query failed: {message}")]
    Remote { status: u16, message: String },
}

impl BackendClient {
    /// Create a new client handle from config. Fails fast when the
    /// endpoint URL or key is missing, before any network use.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = config
            .url
            .as_deref()
            .ok_or_else(|| BackendError::NotConfigured("SUPABASE_URL not set".into()))?;
        let anon_key = config
            .anon_key
            .as_deref()
            .ok_or_else(|| BackendError::NotConfigured("SUPABASE_ANON_KEY not set".into()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn post_rpc(&self, url: &str, args: &Value) -> Result<Value, BackendError> {
        let resp = self.authed(self.http.post(url)).json(args).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Apply the auth headers every REST call needs. Authorization is the
    /// anon key too; row-level security is enforced server-side.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Content-Type", "application/json")
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(BackendError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// Insert rows into a table, returning the inserted representation.
    pub async fn insert(&self, table: &str, rows: &[Value]) -> Result<Vec<Value>, BackendError> {
        let url = self.table_url(table);
        debug!(table, count = rows.len(), "backend insert");
        let resp = self
            .authed(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: Value = resp.json().await?;
        Ok(crate::rpc::normalize_rows(body))
    }

    /// Select all columns from a table, optionally with one equality
    /// filter (the owning-identifier scoping the original forms used).
    pub async fn select(
        &self,
        table: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Value>, BackendError> {
        let url = self.table_url(table);
        debug!(table, ?filter, "backend select");
        let mut query: Vec<(String, String)> = vec![("select".into(), "*".into())];
        if let Some((col, value)) = filter {
            query.push((col.to_string(), format!("eq.{}", value)));
        }
        let resp = self.authed(self.http.get(&url)).query(&query).send().await?;
        let resp = Self::check(resp).await?;
        let body: Value = resp.json().await?;
        Ok(crate::rpc::normalize_rows(body))
    }

    /// Update rows matching an equality filter with a partial patch.
    pub async fn update(
        &self,
        table: &str,
        patch: &Value,
        filter: (&str, &str),
    ) -> Result<(), BackendError> {
        let url = self.table_url(table);
        let (col, value) = filter;
        debug!(table, col, "backend update");
        let resp = self
            .authed(self.http.patch(&url))
            .query(&[(col, format!("eq.{}", value))])
            .json(patch)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}
