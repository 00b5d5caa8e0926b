use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use extract::TextGenerator;
use model::{FactCheckRecord, FactVerdict, labels::clamp_confidence};

use crate::parse::parse_verdict;
use crate::prompts::build_fact_check_prompt;

#[derive(Debug, Deserialize)]
struct FactResponse {
    verdict: String,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    supporting_nodes: Vec<String>,
}

/// Verifies a factual claim against relationship-level context from the
/// knowledge graph.
pub struct FactCheckAgent {
    generator: Arc<dyn TextGenerator>,
}

impl FactCheckAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails; see `BiasAgent::classify`.
    pub async fn check(&self, claim: &str, kg_context: &str) -> FactCheckRecord {
        let prompt = build_fact_check_prompt(claim, kg_context);

        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "fact-check generation failed, using fallback verdict");
                return FactCheckRecord::fallback(claim, format!("generation failed: {e}"));
            }
        };

        match parse_verdict::<FactResponse>(&raw) {
            Ok(response) => {
                let record = FactCheckRecord::new(
                    claim,
                    FactVerdict::parse(&response.verdict),
                    clamp_confidence(response.confidence_score),
                    response.reasoning,
                    response.supporting_nodes,
                );
                info!(verdict = %record.verdict, confidence = record.confidence, "claim checked");
                record
            }
            Err(e) => {
                warn!(error = %e, "fact-check response unparseable, using fallback verdict");
                FactCheckRecord::fallback(claim, format!("failed to parse generation output: {e}"))
            }
        }
    }
}
