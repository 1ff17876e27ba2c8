//! Ollama-compatible inference client.
//!
//! Talks to the `/api/generate` endpoint with JSON-formatted, non-streaming
//! output. Any local or remote server speaking the same protocol works.

use crate::config::InferenceConfig;
use crate::error::{CheckerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A text-generation endpoint the model-backed evaluator can call.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one generation request and return the raw text payload.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering the requests.
    fn model(&self) -> &str;
}

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'static str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Response from `/api/generate` (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: Option<bool>,
}

/// Ollama error response.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

/// HTTP client for an Ollama-compatible server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    config: InferenceConfig,
}

impl OllamaClient {
    /// Create a new client. The HTTP timeout mirrors the configured budget.
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Get the API endpoint URL.
    fn endpoint(&self) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        format!("{}/api/generate", base)
    }

    /// Test connectivity to the API.
    pub async fn test_connection(&self) -> Result<()> {
        let response = self
            .generate(r#"Reply with the JSON object {"status": "hello"} and nothing else."#)
            .await?;

        if response.to_lowercase().contains("hello") {
            Ok(())
        } else {
            Err(CheckerError::Inference(format!(
                "Unexpected response: {}",
                response
            )))
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            format: "json",
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(
            endpoint = %self.endpoint(),
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending generate request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(CheckerError::Inference(format!(
                    "API error ({}): {}",
                    status, api_error.error
                )));
            }
            return Err(CheckerError::Inference(format!(
                "Request failed ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let generated: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| CheckerError::MalformedResponse(format!("generate envelope: {}", e)))?;

        if generated.done == Some(false) {
            return Err(CheckerError::Inference(
                "Generation did not finish".to_string(),
            ));
        }

        Ok(generated.response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
