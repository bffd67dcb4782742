//! HTTP client for the backing store's REST surface.
//!
//! Tables are reached at `{base_url}/{table}` with query-string filters;
//! atomic operations live under `{base_url}/rpc/{function}`. Every request
//! carries the service key both as `apikey` and as a bearer token.

use crate::error::{StoreError, StoreResult};
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Maximum response-body bytes preserved in diagnostics.
const BODY_SNIPPET_LEN: usize = 512;

/// Connection settings for the backing store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store's REST surface, without a trailing slash.
    pub base_url: String,
    /// Service key authorizing server-side access.
    pub service_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Create a config with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            timeout_secs: 10,
        }
    }
}

/// Client for the store's REST surface.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct StoreClient {
    config: StoreConfig,
    http: Client,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Create a new store client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` if the HTTP client cannot be built.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    /// Invoke a store-side function at `rpc/{function}` with named parameters.
    ///
    /// Returns the raw JSON payload of a successful response. Failure
    /// responses are decoded into typed [`StoreError`]s via
    /// [`StoreError::from_rpc_failure`].
    pub async fn rpc(&self, function: &str, params: &Value) -> StoreResult<Value> {
        let url = format!("{}/rpc/{function}", self.config.base_url);
        debug!(function, "Invoking store RPC");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.service_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .json(params)
            .send()
            .await?;

        Self::decode_json(response).await
    }

    /// Insert a row into a table, returning the stored representation.
    pub async fn insert(&self, table: &str, row: &Value) -> StoreResult<Value> {
        let url = format!("{}/{table}", self.config.base_url);
        debug!(table, "Inserting store row");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.service_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let value = Self::decode_json(response).await?;

        // Representation responses are single-element arrays.
        match value {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            other => Ok(other),
        }
    }

    /// Fetch at most one row from a table matching equality filters.
    pub async fn select_one(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> StoreResult<Option<Value>> {
        let url = format!("{}/{table}", self.config.base_url);
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| ((*column).to_string(), format!("eq.{value}")))
            .chain(std::iter::once(("limit".to_string(), "1".to_string())))
            .collect();

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.config.service_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            )
            .query(&query)
            .send()
            .await?;

        let value = Self::decode_json(response).await?;
        match value {
            Value::Array(mut rows) => {
                if rows.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(rows.remove(0)))
                }
            }
            other => Err(StoreError::UnexpectedResponse {
                status: StatusCode::OK.as_u16(),
                body: snippet(&other.to_string()),
            }),
        }
    }

    /// Decode a response body, converting store-reported failures into
    /// typed errors.
    async fn decode_json(response: Response) -> StoreResult<Value> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|_| StoreError::UnexpectedResponse {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        // Error bodies carry {code, message}; anything else is unexpected.
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                let code = map
                    .get("code")
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                return Err(StoreError::from_rpc_failure(code, message.to_string()));
            }
        }

        Err(StoreError::UnexpectedResponse {
            status: status.as_u16(),
            body: snippet(&body),
        })
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        body.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}
