//! Sink that posts captured activity to the ingestion endpoint over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use luxthrift_core::error::DomainError;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::application::capture::ActivitySink;
use crate::domain::submission::{ActivitySubmission, IngestionRequest, USER_ID_HEADER};

/// Default per-request timeout. Timed-out submissions are dropped, not
/// retried.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts submissions to `{base_url}/api/activity`.
#[derive(Debug, Clone)]
pub struct HttpActivitySink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpActivitySink {
    /// Creates a sink for the API at `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, DomainError> {
        Self::with_timeout(base_url, DEFAULT_SUBMIT_TIMEOUT)
    }

    /// Creates a sink for the API at `base_url` with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/activity", base_url.trim_end_matches('/')),
        })
    }

    /// The full ingestion URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ActivitySink for HttpActivitySink {
    #[instrument(skip(self, submission), fields(action = %submission.action))]
    async fn submit(&self, submission: &ActivitySubmission) -> Result<(), DomainError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&IngestionRequest::from(submission));
        if let Some(user_id) = submission.actor.user_id() {
            request = request.header(USER_ID_HEADER, user_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("activity submission failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "activity submitted");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT {
            Err(DomainError::Validation(format!("ingestion rejected ({status}): {body}")))
        } else {
            Err(DomainError::Infrastructure(format!("ingestion failed ({status}): {body}")))
        }
    }
}
