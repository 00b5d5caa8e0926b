use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Explicit pipeline configuration. No component reads the process
/// environment; the binaries assemble this at the composition root and pass
/// it down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub generation: GenerationConfig,
    /// When absent the pipeline runs store-less: no persistence, no
    /// retrieved context (the text-only baseline).
    pub graph: Option<GraphConfig>,
    /// Embedding model for vector similarity, served from the same base URL
    /// as generation. When absent articles get no embeddings.
    pub embedding_model: Option<String>,
    /// Max correction reprompts for malformed extraction JSON.
    pub extraction_retries: usize,
    /// Cap on relationship triples pulled in as fact-check context.
    pub fact_context_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
                request_timeout_secs: 60,
            },
            graph: None,
            embedding_model: None,
            extraction_retries: 3,
            fact_context_limit: 25,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
