use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use model::{PipelineError, Result};

/// The external text-generation capability. Substitutable: the pipeline only
/// ever sees this trait, never a concrete provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Ollama-backed generator.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::configuration(format!("http client: {e}")))?;

        Ok(Self {
            base_url,
            model,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::generation(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::generation(format!(
                "generation request failed with status {}",
                response.status()
            )));
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::generation(format!("malformed generation response: {e}")))?;

        Ok(body.response)
    }
}
