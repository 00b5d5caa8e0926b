use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use graph::{GraphStore, MentionOverlap};

/// A prior article retrieved as similar to the subject, carrying whatever
/// verdict the graph recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarArticle {
    pub url: String,
    pub title: String,
    pub prior_bias: Option<String>,
    pub score: f64,
}

/// Structural-overlap retrieval: similarity is the count of entities two
/// articles share via MENTIONS edges.
pub struct StructuralRetriever {
    store: Arc<dyn GraphStore>,
}

impl StructuralRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Top-k candidates by shared-entity count. The subject article is
    /// excluded: on re-analysis it would otherwise match itself on every
    /// entity and feed its own prior verdict back as context. An empty id
    /// set, a cold graph, or a store failure all return an empty list; the
    /// first few articles of any run have nothing to match against.
    pub async fn top_k(
        &self,
        subject_url: &str,
        entity_ids: &[String],
        k: usize,
    ) -> Vec<SimilarArticle> {
        if entity_ids.is_empty() {
            return Vec::new();
        }

        let overlaps = match self.store.articles_mentioning(entity_ids).await {
            Ok(overlaps) => overlaps,
            Err(e) => {
                warn!(error = %e, "structural retrieval failed, continuing without context");
                return Vec::new();
            }
        };

        rank(overlaps)
            .into_iter()
            .filter(|o| o.url != subject_url)
            .take(k)
            .map(|o| SimilarArticle {
                url: o.url,
                title: o.title,
                prior_bias: o.prior_bias,
                score: o.shared as f64,
            })
            .collect()
    }

    /// The single most structurally similar prior article that carries a
    /// recorded bias, for grounding a bias classification.
    pub async fn most_similar_bias(
        &self,
        subject_url: &str,
        entity_ids: &[String],
    ) -> Option<SimilarArticle> {
        self.top_k(subject_url, entity_ids, usize::MAX)
            .await
            .into_iter()
            .find(|a| a.prior_bias.is_some())
    }
}

/// Order by shared-entity count descending, most recent publication first on
/// ties.
fn rank(mut overlaps: Vec<MentionOverlap>) -> Vec<MentionOverlap> {
    overlaps.sort_by(|a, b| {
        b.shared
            .cmp(&a.shared)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn overlap(url: &str, shared: usize, day: u32) -> MentionOverlap {
        MentionOverlap {
            url: url.to_string(),
            title: url.to_string(),
            prior_bias: None,
            published_at: Some(Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()),
            shared,
        }
    }

    #[test]
    fn higher_overlap_ranks_strictly_above() {
        let ranked = rank(vec![overlap("low", 1, 20), overlap("high", 3, 1)]);
        assert_eq!(ranked[0].url, "high");
        assert_eq!(ranked[1].url, "low");
    }

    #[test]
    fn ties_break_on_recency() {
        let ranked = rank(vec![overlap("old", 2, 1), overlap("new", 2, 25)]);
        assert_eq!(ranked[0].url, "new");
    }

    #[test]
    fn missing_timestamp_sorts_last_on_tie() {
        let mut undated = overlap("undated", 2, 1);
        undated.published_at = None;
        let ranked = rank(vec![undated, overlap("dated", 2, 1)]);
        assert_eq!(ranked[0].url, "dated");
    }

    #[tokio::test]
    async fn empty_entity_set_returns_empty() {
        let store = Arc::new(graph::MemoryStore::new());
        let retriever = StructuralRetriever::new(store);
        assert!(retriever.top_k("u0", &[], 5).await.is_empty());
    }

    #[tokio::test]
    async fn cold_graph_returns_empty_not_error() {
        let store = Arc::new(graph::MemoryStore::new());
        let retriever = StructuralRetriever::new(store);
        let results = retriever.top_k("u0", &["Senator A".to_string()], 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn reanalysis_does_not_retrieve_the_subject_itself() {
        use graph::GraphStore;
        use model::{Article, BiasAssessment, BiasCategory, EntityRef};

        let store = Arc::new(graph::MemoryStore::new());
        let mut article = Article::new("u1", "t", "Wire", "text");
        article.entities.push(EntityRef {
            id: "Senator A".to_string(),
            entity_type: "Person".to_string(),
        });
        store.upsert_article(&article).await.unwrap();
        let assessment = BiasAssessment {
            category: BiasCategory::Left,
            confidence: 80,
            reasoning: "r".to_string(),
            related_nodes: vec![],
        };
        store.upsert_bias_assessment("u1", &assessment).await.unwrap();

        // Second ingestion of the same URL, as a re-analysis run would do.
        store.upsert_article(&article).await.unwrap();

        let retriever = StructuralRetriever::new(store);
        let ids = vec!["Senator A".to_string()];

        // The article shares every entity with itself; it must still not be
        // its own context.
        assert!(retriever.most_similar_bias("u1", &ids).await.is_none());
        assert!(retriever.top_k("u1", &ids, 5).await.is_empty());

        // A different subject still sees it.
        let similar = retriever.most_similar_bias("u2", &ids).await.unwrap();
        assert_eq!(similar.url, "u1");
    }
}
