// src/agent/brain_client.rs

use crate::agent::PlanSource;
use crate::config::EngineConfig;
use crate::protocol::{ErrorBody, Plan, PlanRequest};
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Anything that keeps the engine from obtaining a usable plan.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("planner returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("planner returned an empty plan")]
    EmptyPlan,
}

/// HTTP client for the planner service.
pub struct BrainClient {
    url: String,
    http: Client,
}

impl BrainClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            http,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, TransportError> {
        Self::new(&config.brain_url, Duration::from_millis(config.timeout_ms))
    }
}

impl PlanSource for BrainClient {
    fn request_plan(&self, query: &str) -> Result<Plan, TransportError> {
        debug!(url = %self.url, "request_plan: called");
        let response = self
            .http
            .post(&self.url)
            .json(&PlanRequest {
                query: query.to_string(),
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.detail)
                .unwrap_or(text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let plan: Plan = response.json()?;
        if plan.is_empty() {
            return Err(TransportError::EmptyPlan);
        }
        debug!(steps = plan.len(), "request_plan: received");
        Ok(plan)
    }
}
