use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::{BiasAssessment, FactCheckRecord};

/// A news article as stored in the graph. Identity is the source URL:
/// re-ingesting the same URL updates the existing node, never duplicates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
    /// Entities this article mentions, filled in after extraction.
    #[serde(default)]
    pub entities: Vec<EntityRef>,
    /// Serialized as an explicit `null` when absent; consumers of the
    /// persisted shape key on its presence.
    #[serde(default)]
    pub bias_assessment: Option<BiasAssessment>,
    #[serde(default)]
    pub fact_check: Option<FactCheckRecord>,
    /// Ground-truth bias label, present only on evaluation datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_bias: Option<String>,
}

/// Lightweight reference to an entity node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl Article {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            source: source.into(),
            author: None,
            published_at: None,
            content: content.into(),
            entities: Vec::new(),
            bias_assessment: None,
            fact_check: None,
            ground_truth_bias: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_interop_shape() {
        let mut article = Article::new(
            "https://example.com/a",
            "Senate passes bill",
            "Example Wire",
            "Full text",
        );
        article.entities.push(EntityRef {
            id: "Senator A".to_string(),
            entity_type: "Person".to_string(),
        });

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["url"], "https://example.com/a");
        assert_eq!(json["entities"][0]["type"], "Person");
        // Unset verdicts are an explicit null, keys always present.
        assert!(json.get("biasAssessment").is_some_and(|v| v.is_null()));
        assert!(json.get("factCheck").is_some_and(|v| v.is_null()));
    }

    #[test]
    fn round_trips_with_verdicts() {
        let mut article = Article::new("u", "t", "s", "c");
        article.bias_assessment = Some(crate::BiasAssessment::fallback("r"));
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert!(back.bias_assessment.is_some());
    }
}
