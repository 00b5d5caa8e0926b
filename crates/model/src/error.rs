use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error taxonomy for the verification pipeline.
///
/// `Extraction` and `GraphStore` are absorbed at the per-item boundary in the
/// orchestrator; `GenerationParse` terminates in the fallback verdict; only
/// `Configuration` propagates to the caller of the whole pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("entity extraction failed: {0}")]
    Extraction(String),

    #[error("graph store error: {0}")]
    GraphStore(String),

    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("could not parse generation output: {0}")]
    GenerationParse(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    pub fn graph_store(msg: impl Into<String>) -> Self {
        Self::GraphStore(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::GenerationParse(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
