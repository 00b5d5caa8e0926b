use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use extract::{Entity, Relationship};
use model::{Article, BiasAssessment, FactCheckRecord, Result};

/// The graph-pattern-query capability.
///
/// Every upsert is merge-by-key: calling it twice with the same identity and
/// different attributes updates in place and leaves exactly one node or edge.
/// Concurrent writers converge as long as the backend provides atomic
/// merge-by-key, which both implementations here do.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Merge the article node by URL and a MENTIONS edge to each of its
    /// entities.
    async fn upsert_article(&self, article: &Article) -> Result<()>;

    async fn upsert_entities(&self, entities: &[Entity]) -> Result<()>;

    async fn upsert_relationships(&self, relationships: &[Relationship]) -> Result<()>;

    /// Merge the bias assessment keyed by the owning article URL. A missing
    /// article is a no-op, matching Cypher MATCH-then-MERGE semantics.
    async fn upsert_bias_assessment(&self, url: &str, assessment: &BiasAssessment) -> Result<()>;

    /// Merge the fact-check record by id, with MENTIONS edges to the entities
    /// the claim touches.
    async fn upsert_fact_check(
        &self,
        record: &FactCheckRecord,
        related_entity_ids: &[String],
    ) -> Result<()>;

    async fn set_article_embedding(&self, url: &str, embedding: &[f32]) -> Result<()>;

    async fn article_embedding(&self, url: &str) -> Result<Option<Vec<f32>>>;

    /// Articles connected via MENTIONS to any of the given entities, with
    /// the shared-entity count per article. Unordered; ranking is the
    /// retriever's job.
    async fn articles_mentioning(&self, entity_ids: &[String]) -> Result<Vec<MentionOverlap>>;

    /// Articles carrying both an embedding and a recorded bias, excluding the
    /// subject article.
    async fn embedding_candidates(&self, exclude_url: &str) -> Result<Vec<EmbeddingCandidate>>;

    /// Relationship triples around the given entities, for fact-check context.
    async fn related_facts(&self, entity_ids: &[String], limit: usize) -> Result<Vec<FactTriple>>;

    async fn stats(&self) -> Result<GraphStats>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionOverlap {
    pub url: String,
    pub title: String,
    pub prior_bias: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub shared: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingCandidate {
    pub url: String,
    pub title: String,
    pub prior_bias: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactTriple {
    pub source: String,
    pub rel_type: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GraphStats {
    pub articles: usize,
    pub entities: usize,
    pub relationships: usize,
}
