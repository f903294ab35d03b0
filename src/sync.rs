//! Remote sync client for the consultation table
//!
//! Talks to a PostgREST-style table endpoint (Supabase in production):
//! pull everything on startup, opportunistic upserts on save. Callers own
//! the failure policy; this module only maps transport and API failures
//! into a typed error.

use crate::records::Record;
use crate::store::RecordStore;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Remote table name (kept from the production backend)
pub const DEFAULT_TABLE: &str = "phieu_tu_van";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings keys for remote configuration
pub const SETTING_REMOTE_BASE_URL: &str = "remote_base_url";
pub const SETTING_REMOTE_API_KEY: &str = "remote_api_key";
pub const SETTING_REMOTE_TABLE: &str = "remote_table";

/// Environment overrides, checked before the settings table
pub const ENV_REMOTE_URL: &str = "SKINCONSULT_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "SKINCONSULT_REMOTE_KEY";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Remote sync is not configured")]
    NotConfigured,
    #[error("Authentication failed - check your API key")]
    AuthFailed,
    #[error("Rate limited - try again later")]
    RateLimited,
    #[error("Request timeout")]
    Timeout,
}

impl SyncError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(e)
        }
    }
}

/// Remote sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl SyncConfig {
    /// Build the configuration from environment overrides, falling back
    /// to the settings table. Returns `None` when no remote is set up.
    pub fn from_settings(store: &RecordStore) -> Option<Self> {
        let base_url = std::env::var(ENV_REMOTE_URL)
            .ok()
            .or_else(|| store.get_setting(SETTING_REMOTE_BASE_URL).ok().flatten())?;
        let api_key = std::env::var(ENV_REMOTE_KEY)
            .ok()
            .or_else(|| store.get_setting(SETTING_REMOTE_API_KEY).ok().flatten())?;
        let table = store
            .get_setting(SETTING_REMOTE_TABLE)
            .ok()
            .flatten()
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

/// Client for the remote consultation table
#[derive(Clone)]
pub struct SyncClient {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

// Manual Debug keeps the API key out of logs
impl fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl SyncClient {
    pub fn new(config: SyncConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            table: config.table,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Pull every remote row, ordered by remote creation time ascending.
    pub async fn pull_all(&self) -> Result<Vec<Value>, SyncError> {
        let url = format!("{}?select=*&order=created_at.asc", self.table_url());
        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(SyncError::from_transport)?;

        let resp = Self::check_status(resp).await?;
        resp.json::<Vec<Value>>()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))
    }

    /// Insert or update a record in the remote table.
    ///
    /// With a remote id the row is updated in place; without one a new
    /// row is inserted and its remote-assigned id returned.
    pub async fn upsert(&self, record: &Record) -> Result<i64, SyncError> {
        let payload = row_payload(record);

        match record.remote_id {
            Some(remote_id) => {
                let url = format!("{}?id=eq.{}", self.table_url(), remote_id);
                let resp = self
                    .client
                    .patch(&url)
                    .header("apikey", &self.api_key)
                    .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                    .header(header::CONTENT_TYPE, "application/json")
                    .json(&payload)
                    .send()
                    .await
                    .map_err(SyncError::from_transport)?;

                Self::check_status(resp).await?;
                Ok(remote_id)
            }
            None => {
                let resp = self
                    .client
                    .post(self.table_url())
                    .header("apikey", &self.api_key)
                    .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::ACCEPT, "application/json")
                    .header("Prefer", "return=representation")
                    .json(&payload)
                    .send()
                    .await
                    .map_err(SyncError::from_transport)?;

                let resp = Self::check_status(resp).await?;
                let rows: Vec<Value> = resp
                    .json()
                    .await
                    .map_err(|e| SyncError::Parse(e.to_string()))?;
                rows.first()
                    .and_then(|row| row.get("id"))
                    .and_then(Value::as_i64)
                    .ok_or_else(|| SyncError::Parse("insert response missing row id".to_string()))
            }
        }
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::AuthFailed);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SyncError::RateLimited);
        }
        if !status.is_success() {
            // Log size only to avoid leaking row contents
            if let Ok(body) = resp.text().await {
                tracing::debug!(
                    "remote table error response (status: {}, bytes: {})",
                    status,
                    body.len()
                );
            }
            return Err(SyncError::Api(format!("HTTP {}", status)));
        }

        Ok(resp)
    }
}

/// Build the remote row: flattened query columns plus the full record in
/// the `data` payload column.
fn row_payload(record: &Record) -> Value {
    serde_json::json!({
        "full_name": record.full_name,
        "phone": record.phone,
        "main_issues": record.main_issues,
        "main_goal": record.main_goal,
        "data": record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_payload_flattens_query_columns() {
        let record = Record {
            id: 1723000000000,
            full_name: "Anh Le".to_string(),
            phone: "0900000000".to_string(),
            main_issues: "Mụn viêm".to_string(),
            main_goal: "Hết mụn".to_string(),
            ..Record::default()
        };

        let payload = row_payload(&record);
        assert_eq!(payload["full_name"], "Anh Le");
        assert_eq!(payload["phone"], "0900000000");
        assert_eq!(payload["main_issues"], "Mụn viêm");
        assert_eq!(payload["main_goal"], "Hết mụn");
        assert_eq!(payload["data"]["fullName"], "Anh Le");
        assert_eq!(payload["data"]["id"], 1723000000000i64);
    }

    #[test]
    fn test_client_debug_hides_api_key() {
        let client = SyncClient::new(SyncConfig {
            base_url: "https://example.supabase.co".to_string(),
            api_key: "secret-key".to_string(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: 5,
        });
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("example.supabase.co"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SyncClient::new(SyncConfig {
            base_url: "https://example.supabase.co/".to_string(),
            api_key: "k".to_string(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: 5,
        });
        assert_eq!(
            client.table_url(),
            "https://example.supabase.co/rest/v1/phieu_tu_van"
        );
    }
}
