//! HTTP implementation of [`TaleGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use storyloom_core::generator::{GENERATION_DEADLINE, GenerationError, TaleGenerator};
use storyloom_core::tale::{TaleComponents, TaleStyle};
use tracing::{debug, info, warn};

use crate::extraction::extract_tale_text;

/// Longest slice of an error body kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 512;

/// JSON body posted to the backend.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    components: &'a TaleComponents,
    #[serde(rename = "taleStyle")]
    tale_style: &'a TaleStyle,
}

/// Posts components and style to the generation backend and extracts the
/// tale text from its answer. Each call is a single attempt bounded by the
/// deadline; exceeding it drops the in-flight request.
#[derive(Debug, Clone)]
pub struct HttpTaleGenerator {
    client: reqwest::Client,
    endpoint: String,
    deadline: Duration,
}

impl HttpTaleGenerator {
    /// Create a generator for `endpoint` with the default deadline.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a generator reusing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            deadline: GENERATION_DEADLINE,
        }
    }

    /// Overrides the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the configured deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn call(
        &self,
        components: &TaleComponents,
        style: &TaleStyle,
    ) -> Result<String, GenerationError> {
        let payload = GenerationRequest {
            components,
            tale_style: style,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The body is only logged, so an unreadable one does not change the outcome.
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            warn!(status = status.as_u16(), body = %preview, "generation backend rejected request");
            return Err(GenerationError::InvalidResponse(format!(
                "backend returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        debug!(bytes = body.len(), "generation backend answered");

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            GenerationError::InvalidResponse(format!("response is not valid JSON: {e}"))
        })?;

        extract_tale_text(&value)
    }
}

#[async_trait]
impl TaleGenerator for HttpTaleGenerator {
    async fn generate(
        &self,
        components: &TaleComponents,
        style: &TaleStyle,
    ) -> Result<String, GenerationError> {
        info!(
            endpoint = %self.endpoint,
            style = %style.style,
            deadline_secs = self.deadline.as_secs(),
            "requesting tale generation"
        );

        match tokio::time::timeout(self.deadline, self.call(components, style)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.deadline)),
        }
    }
}
