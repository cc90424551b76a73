//! PostgREST-style remote table.
//!
//! Inserts rows with `POST {base_url}/rest/v1/{table}` and reads the assigned
//! id back from the returned representation. Inserts upsert on the local id
//! column, so a push repeated after a lost response does not add a second row.

use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteTable;
use crate::row::RemoteReportRow;
use async_trait::async_trait;
use keben_model::Report;
use keben_types::RemoteId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection settings for the remote table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestTableConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Anonymous API key, sent as `apikey` and as the bearer token.
    pub api_key: String,
    /// Table name.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Unique column used to merge repeated inserts. `None` sends a plain insert.
    #[serde(default = "default_conflict_column")]
    pub on_conflict: Option<String>,
}

fn default_conflict_column() -> Option<String> {
    Some("local_id".to_string())
}

impl Default for RestTableConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "reports".to_string(),
            timeout_secs: 15,
            on_conflict: default_conflict_column(),
        }
    }
}

impl RestTableConfig {
    /// Insert endpoint for the configured table.
    pub fn insert_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}

/// Remote table reached over HTTP.
pub struct RestTable {
    config: RestTableConfig,
    client: Client,
}

impl RestTable {
    /// Creates a client for the given table.
    pub fn new(config: RestTableConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RestTableConfig {
        &self.config
    }
}

#[async_trait]
impl RemoteTable for RestTable {
    fn provider_name(&self) -> &'static str {
        "REST table"
    }

    async fn push(&self, report: &Report) -> SyncResult<RemoteId> {
        let row = RemoteReportRow::from_report(report);
        debug!("Pushing report {} to {}", report.id, self.config.table);

        let mut request = self
            .client
            .post(self.config.insert_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key);
        request = match &self.config.on_conflict {
            Some(column) => request
                .query(&[("on_conflict", column.as_str())])
                .header("Prefer", "return=representation,resolution=merge-duplicates"),
            None => request.header("Prefer", "return=representation"),
        };

        let response = request
            .json(&row)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SyncError::Network(format!("insert timed out: {e}"))
                } else {
                    SyncError::Network(format!("insert failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Remote insert for {} returned {}: {}", report.id, status, body);
            return Err(classify_status(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::Rejected(format!("unreadable insert response: {e}")))?;

        let remote_id = returned_id(&body).ok_or_else(|| {
            SyncError::Rejected("insert response carried no row id".to_string())
        })?;

        info!("Report {} synced as remote row {}", report.id, remote_id);
        Ok(remote_id)
    }
}

/// Transient statuses become `Network`, everything else `Rejected`.
fn classify_status(status: StatusCode, body: String) -> SyncError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };

    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        SyncError::Network(detail)
    } else {
        SyncError::Rejected(detail)
    }
}

/// The representation is either the inserted row or a one-element array.
fn returned_id(body: &Value) -> Option<RemoteId> {
    let row = match body {
        Value::Array(rows) => rows.first()?,
        other => other,
    };
    row.get("id").and_then(RemoteId::from_json)
}
