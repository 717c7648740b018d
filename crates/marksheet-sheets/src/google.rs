//! Google Sheets values API source.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use marksheet_core::table::Row;
use marksheet_core::traits::SheetSource;
use marksheet_core::SourceError;

use crate::cell_text;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How requests are authorized.
#[derive(Clone)]
pub enum GoogleAuth {
    /// API key, sent as the `key` query parameter. Enough for sheets shared
    /// as "anyone with the link can view".
    ApiKey(String),
    /// OAuth2 access token (e.g. from a service account), sent as a bearer token.
    AccessToken(String),
}

/// Reads ranges through `GET /v4/spreadsheets/{id}/values/{range}`.
pub struct GoogleSheetsSource {
    spreadsheet_id: String,
    auth: GoogleAuth,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GoogleSheetsSource {
    pub fn new(
        spreadsheet_id: &str,
        auth: GoogleAuth,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> anyhow::Result<Self> {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            auth,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
            client,
        })
    }

    fn range_url(&self, range: &str) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        if let GoogleAuth::ApiKey(key) = &self.auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    fn name(&self) -> &str {
        "google"
    }

    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    async fn fetch_range(&self, range: &str) -> anyhow::Result<Vec<Row>> {
        let url = self.range_url(range)?;
        let mut request = self.client.get(url);
        if let GoogleAuth::AccessToken(token) = &self.auth {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SourceError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Unauthorized(body).into());
        }
        if status == 404 {
            return Err(SourceError::SpreadsheetNotFound(self.spreadsheet_id.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SourceError::Api { status, message }.into());
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(format!("failed to parse response: {e}")))?;

        let rows: Vec<Row> = value_range
            .values
            .into_iter()
            .map(|r| r.into_iter().map(cell_text).collect())
            .collect();
        tracing::debug!(range, rows = rows.len(), "fetched range");
        Ok(rows)
    }
}
