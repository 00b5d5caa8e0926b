use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use extract::TextGenerator;
use model::{BiasAssessment, BiasCategory, labels::clamp_confidence};
use retrieve::SimilarArticle;

use crate::parse::parse_verdict;
use crate::prompts::build_bias_prompt;

/// Wire shape of the bias response before normalization.
#[derive(Debug, Deserialize)]
struct BiasResponse {
    bias: String,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    related_nodes: Vec<String>,
}

/// Classifies an article's political bias, grounded in the most similar
/// prior article when retrieval found one.
pub struct BiasAgent {
    generator: Arc<dyn TextGenerator>,
}

impl BiasAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails: generation or parse errors terminate in the
    /// zero-confidence fallback so the pipeline can move on.
    pub async fn classify(
        &self,
        article_text: &str,
        similar: Option<&SimilarArticle>,
        shared_entities: &[String],
    ) -> BiasAssessment {
        let prompt = build_bias_prompt(article_text, similar, shared_entities);

        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "bias generation failed, using fallback verdict");
                return BiasAssessment::fallback(format!("generation failed: {e}"));
            }
        };

        match parse_verdict::<BiasResponse>(&raw) {
            Ok(response) => {
                let assessment = BiasAssessment {
                    category: BiasCategory::parse(&response.bias),
                    confidence: clamp_confidence(response.confidence_score),
                    reasoning: response.reasoning,
                    related_nodes: response.related_nodes,
                };
                info!(category = %assessment.category, confidence = assessment.confidence,
                    "bias classified");
                assessment
            }
            Err(e) => {
                warn!(error = %e, "bias response unparseable, using fallback verdict");
                BiasAssessment::fallback(format!("failed to parse generation output: {e}"))
            }
        }
    }
}
