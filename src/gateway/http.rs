//! HTTP client for the remote classification service.
//!
//! Sends `POST {endpoint}/api/analyze/` with `{"text": ...}` and decodes the
//! JSON reply into a [`GatewayReply`]. No retries happen here.

use super::{ClassifierGateway, GatewayReply};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Path of the analyze endpoint relative to the service root.
pub const ANALYZE_PATH: &str = "/api/analyze/";

/// Configuration for the HTTP classifier.
#[derive(Debug, Clone)]
pub struct HttpClassifierConfig {
    /// Service root, e.g. `http://127.0.0.1:8000`.
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for HttpClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Classifier backed by the analyze endpoint.
pub struct HttpClassifier {
    config: HttpClassifierConfig,
    http_client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(config: HttpClassifierConfig) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AnalysisError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            ANALYZE_PATH
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else if e.is_connect() {
            AnalysisError::Connect {
                endpoint: self.config.endpoint.clone(),
            }
        } else {
            AnalysisError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ClassifierGateway for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<GatewayReply, AnalysisError> {
        let url = self.analyze_url();
        debug!("POST {} ({} bytes)", url, text.len());

        let response = self
            .http_client
            .post(&url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        serde_json::from_str::<GatewayReply>(&body)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.config.endpoint
    }
}
