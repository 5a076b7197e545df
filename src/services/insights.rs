//! Natural-language summary of the current collection, produced by an
//! external generative-text service.
//!
//! The collaborator is modeled as a single in-flight asynchronous task
//! with an explicit state machine. The "may I start a new request" guard
//! lives here at the data layer, not in whatever UI disables its button:
//! at most one request is ever outstanding. There is no cancellation and
//! no automatic retry; a result that lands after later state changes is
//! simply stored until dismissed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::Movement;

/// Fixed user-visible text substituted for any summarization failure.
pub const INSIGHT_FALLBACK: &str =
    "Could not generate insights right now. Check the AI service configuration and try again.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// External text-summarization collaborator.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Observable lifecycle of the single summarization slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightState {
    Idle,
    Pending,
    Completed(String),
}

/// Wire representation of [`InsightState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InsightStatus {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&InsightState> for InsightStatus {
    fn from(state: &InsightState) -> Self {
        match state {
            InsightState::Idle => InsightStatus {
                state: "idle".into(),
                text: None,
            },
            InsightState::Pending => InsightStatus {
                state: "pending".into(),
                text: None,
            },
            InsightState::Completed(text) => InsightStatus {
                state: "completed".into(),
                text: Some(text.clone()),
            },
        }
    }
}

/// Builds the prompt from a read-only snapshot: total record count, every
/// record's status, and the distinct supplier names in first-seen order.
pub fn build_prompt(movements: &[Movement]) -> String {
    let statuses: Vec<String> = movements.iter().map(|m| m.status.to_string()).collect();
    let mut suppliers: Vec<&str> = Vec::new();
    for m in movements {
        if !m.supplier.is_empty() && !suppliers.contains(&m.supplier.as_str()) {
            suppliers.push(&m.supplier);
        }
    }

    format!(
        "Analyze the following stock and logistics data and provide a three-sentence \
         executive summary.\nTotal records: {}.\nStatuses: {}.\nSuppliers: {}.\nFocus on \
         performance bottlenecks and stock levels.",
        movements.len(),
        statuses.join(", "),
        suppliers.join(", "),
    )
}

#[derive(Clone)]
pub struct InsightService {
    state: Arc<Mutex<InsightState>>,
    summarizer: Arc<dyn Summarizer>,
}

impl InsightService {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InsightState::Idle)),
            summarizer,
        }
    }

    /// Starts a summarization over the given snapshot. Refused with
    /// `Conflict` while a previous request is still pending; an existing
    /// completed result is overwritten. The request itself runs on a
    /// spawned task, and any failure resolves to the fixed fallback text
    /// rather than an error state.
    pub async fn generate(&self, movements: Vec<Movement>) -> Result<InsightStatus, ServiceError> {
        {
            let mut state = self.state.lock().await;
            if *state == InsightState::Pending {
                return Err(ServiceError::Conflict(
                    "an insight request is already in flight".into(),
                ));
            }
            *state = InsightState::Pending;
        }

        let prompt = build_prompt(&movements);
        info!(records = movements.len(), "requesting insight summary");

        let service = self.clone();
        tokio::spawn(async move {
            let text = match service.summarizer.summarize(&prompt).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    warn!("summarizer returned an empty response");
                    INSIGHT_FALLBACK.to_string()
                }
                Err(err) => {
                    warn!("summarization failed: {}", err);
                    INSIGHT_FALLBACK.to_string()
                }
            };
            *service.state.lock().await = InsightState::Completed(text);
        });

        Ok(InsightStatus {
            state: "pending".into(),
            text: None,
        })
    }

    pub async fn current(&self) -> InsightStatus {
        InsightStatus::from(&*self.state.lock().await)
    }

    /// User dismissal of a displayed (or stale) result.
    pub async fn dismiss(&self) -> InsightStatus {
        let mut state = self.state.lock().await;
        *state = InsightState::Idle;
        InsightStatus::from(&*state)
    }
}

/// Summarizer backed by a Gemini-style generative-language HTTP API.
pub struct HttpSummarizer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpSummarizer {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::ExternalServiceError(
                "summarization API key is not configured".into(),
            ));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| ServiceError::ExternalServiceError(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "summarization API returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| ServiceError::ExternalServiceError(err.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::ExternalServiceError("summarization response had no text".into())
            })
    }
}
