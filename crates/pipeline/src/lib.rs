pub mod config;
pub mod orchestrator;
pub mod state;

pub use config::{GenerationConfig, GraphConfig, PipelineConfig};
pub use orchestrator::Orchestrator;
pub use state::{
    AnalysisTask, DirectQuery, ItemOutcome, ItemStage, PipelineState, PipelineStatus,
};
