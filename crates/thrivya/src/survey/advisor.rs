//! Advisory report generation through an external text-generation service.
//!
//! The generator is a collaborator outside the scoring core: its output is an
//! opaque string and any failure degrades to a warning next to the scores.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AdvisorConfig;

pub const NO_RESPONSE_TEXT: &str = "No AI response returned.";

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("report generator credentials are not configured")]
    MissingCredentials,
    #[error("report generator timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("report generator unreachable: {0}")]
    Transport(String),
    #[error("report generator returned HTTP {status}")]
    Status { status: u16 },
    #[error("report generator returned an unreadable payload: {0}")]
    Payload(String),
}

/// Outbound hook producing free text from a formatted prompt.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

/// Chat-endpoint client speaking the Cohere `v1/chat` request shape.
#[derive(Debug, Clone)]
pub struct CohereReportGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
}

impl CohereReportGenerator {
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| CollaboratorError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn map_error(&self, err: reqwest::Error) -> CollaboratorError {
        if err.is_timeout() {
            CollaboratorError::Timeout(self.timeout)
        } else {
            CollaboratorError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ReportGenerator for CohereReportGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingCredentials)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                message: prompt,
            })
            .send()
            .await
            .map_err(|err| self.map_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| CollaboratorError::Payload(err.to_string()))?;

        Ok(extract_text(&payload))
    }
}

fn extract_text(payload: &Value) -> String {
    ["text", "response"]
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or(NO_RESPONSE_TEXT)
        .to_string()
}

/// Narrative section shown next to the scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advisory {
    Generated { text: String },
    Unavailable { warning: String },
}

impl Advisory {
    pub fn is_generated(&self) -> bool {
        matches!(self, Advisory::Generated { .. })
    }
}

/// Requests a narrative report, bounded by `timeout`; never fails.
pub async fn advise<G>(generator: &G, prompt: &str, timeout: Duration) -> Advisory
where
    G: ReportGenerator + ?Sized,
{
    let outcome = match tokio::time::timeout(timeout, generator.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) => {
            info!(chars = text.len(), "advisory report generated");
            Advisory::Generated { text }
        }
        Err(err) => {
            warn!(error = %err, "advisory report unavailable");
            Advisory::Unavailable {
                warning: format!("Recommendations unavailable: {err}"),
            }
        }
    }
}
