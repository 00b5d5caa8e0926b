use serde::{Deserialize, Serialize};
use std::time::Duration;

use model::{PipelineError, Result};

/// Client for the embedding endpoint (Ollama `/api/embeddings`).
#[derive(Clone)]
pub struct EmbeddingClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
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

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::generation(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::generation(format!(
                "embedding request failed with status {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::generation(format!("malformed embedding response: {e}")))?;

        Ok(body.embedding)
    }
}
