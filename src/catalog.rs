//! Question catalog client.
//!
//! Thin HTTP client for the question-lookup service: `GET
//! {base}/questions/{id}` returns `{id, title, description, difficulty,
//! category}`, 404 on an unknown id. Failures come back as typed errors for
//! the host app to surface in an error panel with a retry affordance — a
//! fetch failure must never blank or crash the session.

use std::time::Duration;

use crate::error::CoderoomError;
use crate::question::QuestionRecord;

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the question service (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Per-request read timeout.
    pub request_timeout: Duration,
}

impl CatalogConfig {
    /// Config with sensible defaults.
    ///
    /// - connect_timeout: 3 s
    /// - request_timeout: 10 s
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Async client for question lookups.
pub struct QuestionCatalog {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl QuestionCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, CoderoomError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(QuestionCatalog { config, client })
    }

    /// URL for one question id.
    pub fn question_url(&self, id: &str) -> String {
        format!("{}/questions/{}", self.config.base_url.trim_end_matches('/'), id)
    }

    /// Fetch one question record.
    ///
    /// # Returns
    /// - `Ok(QuestionRecord)` — on a 2xx response with parseable JSON.
    /// - `Err(CoderoomError::QuestionNotFound)` — on 404.
    /// - `Err(CoderoomError::Http)` — on any other non-2xx status.
    /// - `Err(CoderoomError::Request)` — when the request never completed.
    /// - `Err(CoderoomError::Decode)` — when the body is not a record.
    pub async fn fetch(&self, id: &str) -> Result<QuestionRecord, CoderoomError> {
        let url = self.question_url(id);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CoderoomError::QuestionNotFound { id: id.to_string() });
        }
        if !resp.status().is_success() {
            return Err(CoderoomError::Http {
                status: resp.status().as_u16(),
                url,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice::<QuestionRecord>(&bytes).map_err(|e| CoderoomError::Decode {
            topic: "questions".to_string(),
            detail: e.to_string(),
        })
    }
}
