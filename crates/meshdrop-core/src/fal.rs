//! fal.ai queue client for the TripoSR image-to-3D model
//!
//! The queue API is a three-step flow: submit the input, poll the status URL
//! until the request reaches a terminal state, then fetch the response URL.
//! The output is wrapped as `{ data, requestId }`, which is the shape the
//! frontend reads (`data.model_mesh.url`).

use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::{GenerateParams, MeshGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run/fal-ai/triposr";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Model input. Only `do_remove_background` varies per request.
#[derive(Debug, Clone, Serialize)]
pub struct TripoInput {
    pub image_url: String,
    pub output_format: &'static str,
    pub do_remove_background: bool,
    pub foreground_ratio: f64,
    pub mc_resolution: u32,
}

impl TripoInput {
    pub fn from_params(params: &GenerateParams) -> Self {
        Self {
            image_url: params.image_data_url.clone(),
            output_format: "glb",
            do_remove_background: params.remove_background,
            foreground_ratio: 0.9,
            mc_resolution: 256,
        }
    }
}

/// Submit acknowledgement from the queue
#[derive(Debug, Clone, Deserialize)]
struct QueueSubmitted {
    request_id: String,
    status_url: String,
    response_url: String,
}

/// One status poll result
#[derive(Debug, Clone, Deserialize)]
pub struct QueueStatus {
    pub status: String,
    #[serde(default)]
    pub logs: Vec<QueueLogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueLogEntry {
    pub message: String,
}

impl QueueStatus {
    /// Still waiting for the model to finish
    pub fn is_pending(&self) -> bool {
        matches!(self.status.as_str(), "IN_QUEUE" | "IN_PROGRESS")
    }

    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

/// Client for the fal.ai queue API
pub struct FalClient {
    http: reqwest::Client,
    api_key: String,
    queue_url: String,
    poll_interval: Duration,
}

impl FalClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            queue_url: DEFAULT_QUEUE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the queue endpoint (tests, self-hosted gateways)
    pub fn with_queue_url(mut self, url: impl Into<String>) -> Self {
        self.queue_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn auth_value(&self) -> String {
        format!("Key {}", self.api_key)
    }

    async fn submit(&self, input: &TripoInput) -> GeneratorResult<QueueSubmitted> {
        let response = self
            .http
            .post(&self.queue_url)
            .header("Authorization", self.auth_value())
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let submitted: QueueSubmitted = response.json().await?;
        tracing::info!("Submitted generation request {}", submitted.request_id);
        Ok(submitted)
    }

    async fn poll_until_done(&self, status_url: &str) -> GeneratorResult<()> {
        // logs=1 makes the queue include model log lines in each poll
        let url = format!("{}?logs=1", status_url);
        let mut seen_logs = 0usize;

        loop {
            let response = self
                .http
                .get(&url)
                .header("Authorization", self.auth_value())
                .send()
                .await?;

            let http_status = response.status();
            if !http_status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GeneratorError::UpstreamStatus {
                    status: http_status.as_u16(),
                    body,
                });
            }

            let status: QueueStatus = response.json().await?;
            for entry in status.logs.iter().skip(seen_logs) {
                tracing::debug!("model: {}", entry.message);
            }
            seen_logs = status.logs.len();

            if status.is_completed() {
                return Ok(());
            }
            if !status.is_pending() {
                return Err(GeneratorError::Failed(status.status));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn fetch_response(&self, response_url: &str) -> GeneratorResult<Value> {
        let response = self
            .http
            .get(response_url)
            .header("Authorization", self.auth_value())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MeshGenerator for FalClient {
    async fn generate(&self, params: &GenerateParams) -> GeneratorResult<Value> {
        let input = TripoInput::from_params(params);
        let submitted = self.submit(&input).await?;

        self.poll_until_done(&submitted.status_url).await?;
        let output = self.fetch_response(&submitted.response_url).await?;
        tracing::info!("Generation {} completed", submitted.request_id);

        Ok(serde_json::json!({
            "data": output,
            "requestId": submitted.request_id,
        }))
    }
}
