use std::sync::Arc;
use tracing::warn;

use graph::GraphStore;

use crate::structural::SimilarArticle;

/// Embedding-based retrieval: cosine similarity between the subject
/// article's stored vector and every candidate carrying both a vector and a
/// recorded bias.
pub struct EmbeddingRetriever {
    store: Arc<dyn GraphStore>,
}

impl EmbeddingRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    pub async fn top_k_similar(&self, article_url: &str, k: usize) -> Vec<SimilarArticle> {
        let target = match self.store.article_embedding(article_url).await {
            Ok(Some(embedding)) => embedding,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "embedding lookup failed, continuing without context");
                return Vec::new();
            }
        };

        let candidates = match self.store.embedding_candidates(article_url).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "candidate lookup failed, continuing without context");
                return Vec::new();
            }
        };

        let mut scored: Vec<SimilarArticle> = candidates
            .into_iter()
            .map(|c| SimilarArticle {
                score: cosine_similarity(&target, &c.embedding) as f64,
                url: c.url,
                title: c.title,
                prior_bias: Some(c.prior_bias),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity in [-1, 1]. Zero when either vector is empty, zero, or
/// the dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph::MemoryStore;
    use model::{Article, BiasAssessment, BiasCategory};

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.5, 1.0, -0.25];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let score = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_or_zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    async fn seed_candidate(store: &MemoryStore, url: &str, embedding: Vec<f32>) {
        let article = Article::new(url, url, "s", "c");
        store.upsert_article(&article).await.unwrap();
        store
            .upsert_bias_assessment(
                url,
                &BiasAssessment {
                    category: BiasCategory::Left,
                    confidence: 80,
                    reasoning: String::new(),
                    related_nodes: vec![],
                },
            )
            .await
            .unwrap();
        store.set_article_embedding(url, &embedding).await.unwrap();
    }

    #[tokio::test]
    async fn ranks_candidates_by_similarity() {
        let store = Arc::new(MemoryStore::new());
        let subject = Article::new("subject", "subject", "s", "c");
        store.upsert_article(&subject).await.unwrap();
        store
            .set_article_embedding("subject", &[1.0, 0.0])
            .await
            .unwrap();

        seed_candidate(&store, "close", vec![0.9, 0.1]).await;
        seed_candidate(&store, "far", vec![0.0, 1.0]).await;

        let retriever = EmbeddingRetriever::new(store);
        let results = retriever.top_k_similar("subject", 2).await;
        assert_eq!(results[0].url, "close");
        assert_eq!(results[1].url, "far");
    }

    #[tokio::test]
    async fn subject_without_embedding_returns_empty() {
        let store = Arc::new(MemoryStore::new());
        let retriever = EmbeddingRetriever::new(store);
        assert!(retriever.top_k_similar("missing", 3).await.is_empty());
    }
}
