use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::labels::{BiasCategory, FactVerdict};

/// Bias classification for a single article. One-to-one with the owning
/// article URL; re-analysis overwrites the previous assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasAssessment {
    pub category: BiasCategory,
    /// Always in [0, 100].
    pub confidence: u8,
    pub reasoning: String,
    pub related_nodes: Vec<String>,
}

/// Verdict on a single factual claim, identified at verification time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRecord {
    pub id: String,
    pub claim: String,
    pub verdict: FactVerdict,
    /// Always in [0, 100].
    pub confidence: u8,
    pub reasoning: String,
    pub supporting_nodes: Vec<String>,
}

impl BiasAssessment {
    /// Terminal recovery value when generation or parsing failed. Never an
    /// error: the pipeline proceeds to the next item with this in hand.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            category: BiasCategory::Unknown,
            confidence: 0,
            reasoning: reason.into(),
            related_nodes: Vec::new(),
        }
    }
}

impl FactCheckRecord {
    pub fn new(
        claim: impl Into<String>,
        verdict: FactVerdict,
        confidence: u8,
        reasoning: impl Into<String>,
        supporting_nodes: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            claim: claim.into(),
            verdict,
            confidence,
            reasoning: reasoning.into(),
            supporting_nodes,
        }
    }

    pub fn fallback(claim: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(claim, FactVerdict::Unknown, 0, reason, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_unknown_with_zero_confidence() {
        let bias = BiasAssessment::fallback("parse failed");
        assert_eq!(bias.category, BiasCategory::Unknown);
        assert_eq!(bias.confidence, 0);

        let fact = FactCheckRecord::fallback("some claim", "parse failed");
        assert_eq!(fact.verdict, FactVerdict::Unknown);
        assert_eq!(fact.confidence, 0);
        assert!(fact.supporting_nodes.is_empty());
    }

    #[test]
    fn fact_check_ids_are_unique() {
        let a = FactCheckRecord::fallback("c", "r");
        let b = FactCheckRecord::fallback("c", "r");
        assert_ne!(a.id, b.id);
    }
}
