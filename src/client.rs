use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{LookupOutcome, Report};

// ── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("API error: {0}")]
    Status(StatusCode),
    /// The request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not valid JSON.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

// ── Client ──────────────────────────────────────────────────────

/// Thin async wrapper around the reports backend.
#[derive(Clone)]
pub struct ReportsClient {
    http: reqwest::Client,
    base: String,
}

impl ReportsClient {
    /// Create a new client (does **not** open a connection yet).
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        // Fail fast on a garbage base address; endpoints are built by hand
        // below so path segments reach the backend exactly as given.
        Url::parse(base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, parts: &[&str]) -> String {
        let mut url = self.base.clone();
        for p in parts {
            url.push('/');
            url.push_str(p);
        }
        url
    }

    // ── public API ──────────────────────────────────────────────

    /// `GET /reports` — the full (latest-per-device) report collection.
    ///
    /// A body that is valid JSON but not a sequence comes back as `None`;
    /// the caller decides what that means for its surface.
    pub async fn all_reports(&self) -> Result<Option<Vec<Report>>, ApiError> {
        let url = self.endpoint(&["reports"]);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        if !value.is_array() {
            return Ok(None);
        }

        let reports: Vec<Report> = serde_json::from_value(value)?;
        Ok(Some(reports))
    }

    /// `GET /latest/{device_id}` — the most recent report for one device.
    ///
    /// The id goes into the path exactly as typed, and the body is parsed
    /// regardless of the status code: the backend reports "not found" in
    /// the body, not the status line.
    pub async fn latest_report(&self, device_id: &str) -> Result<LookupOutcome, ApiError> {
        let url = self.endpoint(&["latest", device_id]);
        let body = self.http.get(&url).send().await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ── Tests ───────────────────────────────────────────────────────
