use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

use extract::{Entity, Relationship};
use model::{Article, BiasAssessment, FactCheckRecord, Result};

use crate::store::{
    EmbeddingCandidate, FactTriple, GraphStats, GraphStore, MentionOverlap,
};

/// In-memory graph store with the same merge-by-key semantics as the Neo4j
/// backend. Used by the test suite and as the store-less baseline's stand-in
/// when a run should not touch a live database.
#[derive(Default)]
pub struct MemoryStore {
    articles: DashMap<String, Article>,
    entities: DashMap<String, Entity>,
    relationships: DashMap<(String, String, String), Relationship>,
    /// article url -> entity ids it mentions
    mentions: DashMap<String, HashSet<String>>,
    embeddings: DashMap<String, Vec<f32>>,
    fact_checks: DashMap<String, FactCheckRecord>,
    /// fact-check id -> entity ids the claim mentions
    fact_mentions: DashMap<String, HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn article(&self, url: &str) -> Option<Article> {
        self.articles.get(url).map(|a| a.clone())
    }

    pub fn fact_check(&self, id: &str) -> Option<FactCheckRecord> {
        self.fact_checks.get(id).map(|f| f.clone())
    }

    pub fn mentions_of(&self, url: &str) -> HashSet<String> {
        self.mentions.get(url).map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn upsert_article(&self, article: &Article) -> Result<()> {
        // Preserve a previously attached verdict when the caller re-ingests
        // the bare article.
        let merged = match self.articles.get(&article.url) {
            Some(existing) => {
                let mut merged = article.clone();
                if merged.bias_assessment.is_none() {
                    merged.bias_assessment = existing.bias_assessment.clone();
                }
                if merged.fact_check.is_none() {
                    merged.fact_check = existing.fact_check.clone();
                }
                merged
            }
            None => article.clone(),
        };
        self.articles.insert(article.url.clone(), merged);

        let mut mentioned = self.mentions.entry(article.url.clone()).or_default();
        for entity in &article.entities {
            mentioned.insert(entity.id.clone());
        }
        Ok(())
    }

    async fn upsert_entities(&self, entities: &[Entity]) -> Result<()> {
        for entity in entities {
            self.entities.insert(entity.id.clone(), entity.clone());
        }
        Ok(())
    }

    async fn upsert_relationships(&self, relationships: &[Relationship]) -> Result<()> {
        for rel in relationships {
            let key = (rel.source.clone(), rel.rel_type.clone(), rel.target.clone());
            self.relationships.insert(key, rel.clone());
        }
        Ok(())
    }

    async fn upsert_bias_assessment(&self, url: &str, assessment: &BiasAssessment) -> Result<()> {
        if let Some(mut article) = self.articles.get_mut(url) {
            article.bias_assessment = Some(assessment.clone());
        }
        Ok(())
    }

    async fn upsert_fact_check(
        &self,
        record: &FactCheckRecord,
        related_entity_ids: &[String],
    ) -> Result<()> {
        self.fact_checks.insert(record.id.clone(), record.clone());
        let mut mentioned = self.fact_mentions.entry(record.id.clone()).or_default();
        for id in related_entity_ids {
            mentioned.insert(id.clone());
        }
        Ok(())
    }

    async fn set_article_embedding(&self, url: &str, embedding: &[f32]) -> Result<()> {
        self.embeddings.insert(url.to_string(), embedding.to_vec());
        Ok(())
    }

    async fn article_embedding(&self, url: &str) -> Result<Option<Vec<f32>>> {
        Ok(self.embeddings.get(url).map(|e| e.clone()))
    }

    async fn articles_mentioning(&self, entity_ids: &[String]) -> Result<Vec<MentionOverlap>> {
        let wanted: HashSet<&str> = entity_ids.iter().map(|s| s.as_str()).collect();
        let mut overlaps = Vec::new();

        for entry in self.mentions.iter() {
            let shared = entry
                .value()
                .iter()
                .filter(|id| wanted.contains(id.as_str()))
                .count();
            if shared == 0 {
                continue;
            }
            if let Some(article) = self.articles.get(entry.key()) {
                overlaps.push(MentionOverlap {
                    url: article.url.clone(),
                    title: article.title.clone(),
                    prior_bias: article
                        .bias_assessment
                        .as_ref()
                        .map(|b| b.category.as_str().to_string()),
                    published_at: article.published_at,
                    shared,
                });
            }
        }

        Ok(overlaps)
    }

    async fn embedding_candidates(&self, exclude_url: &str) -> Result<Vec<EmbeddingCandidate>> {
        let mut candidates = Vec::new();
        for entry in self.embeddings.iter() {
            if entry.key() == exclude_url {
                continue;
            }
            let Some(article) = self.articles.get(entry.key()) else {
                continue;
            };
            let Some(bias) = article.bias_assessment.as_ref() else {
                continue;
            };
            candidates.push(EmbeddingCandidate {
                url: article.url.clone(),
                title: article.title.clone(),
                prior_bias: bias.category.as_str().to_string(),
                embedding: entry.value().clone(),
            });
        }
        Ok(candidates)
    }

    async fn related_facts(&self, entity_ids: &[String], limit: usize) -> Result<Vec<FactTriple>> {
        let wanted: HashSet<&str> = entity_ids.iter().map(|s| s.as_str()).collect();
        let mut triples = Vec::new();

        for entry in self.relationships.iter() {
            let rel = entry.value();
            if wanted.contains(rel.source.as_str()) || wanted.contains(rel.target.as_str()) {
                triples.push(FactTriple {
                    source: rel.source.clone(),
                    rel_type: rel.rel_type.clone(),
                    target: rel.target.clone(),
                });
                if triples.len() >= limit {
                    break;
                }
            }
        }

        Ok(triples)
    }

    async fn stats(&self) -> Result<GraphStats> {
        Ok(GraphStats {
            articles: self.articles.len(),
            entities: self.entities.len(),
            relationships: self.relationships.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{BiasCategory, FactVerdict};

    fn entity(id: &str, entity_type: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: id.to_string(),
            entity_type: entity_type.to_string(),
        }
    }

    #[tokio::test]
    async fn article_upsert_is_idempotent() {
        let store = MemoryStore::new();

        let mut article = Article::new("https://example.com/a", "First title", "Wire", "text");
        store.upsert_article(&article).await.unwrap();

        article.title = "Corrected title".to_string();
        store.upsert_article(&article).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.articles, 1);
        assert_eq!(
            store.article("https://example.com/a").unwrap().title,
            "Corrected title"
        );
    }

    #[tokio::test]
    async fn entity_upsert_is_idempotent() {
        let store = MemoryStore::new();
        store
            .upsert_entities(&[entity("Senator A", "Person")])
            .await
            .unwrap();
        store
            .upsert_entities(&[entity("Senator A", "Person")])
            .await
            .unwrap();

        assert_eq!(store.stats().await.unwrap().entities, 1);
    }

    #[tokio::test]
    async fn relationship_upsert_updates_in_place() {
        let store = MemoryStore::new();
        let mut rel = Relationship {
            source: "Senator A".to_string(),
            target: "Policy X".to_string(),
            rel_type: "supports".to_string(),
            evidence: Some("first quote".to_string()),
        };
        store.upsert_relationships(std::slice::from_ref(&rel)).await.unwrap();

        rel.evidence = Some("better quote".to_string());
        store.upsert_relationships(std::slice::from_ref(&rel)).await.unwrap();

        assert_eq!(store.stats().await.unwrap().relationships, 1);
        let facts = store
            .related_facts(&["Senator A".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(facts.len(), 1);
    }

    #[tokio::test]
    async fn bias_assessment_overwrites_on_reanalysis() {
        let store = MemoryStore::new();
        let article = Article::new("u", "t", "s", "c");
        store.upsert_article(&article).await.unwrap();

        let mut assessment = BiasAssessment {
            category: BiasCategory::Left,
            confidence: 60,
            reasoning: "first pass".to_string(),
            related_nodes: vec![],
        };
        store.upsert_bias_assessment("u", &assessment).await.unwrap();

        assessment.category = BiasCategory::Center;
        assessment.confidence = 85;
        store.upsert_bias_assessment("u", &assessment).await.unwrap();

        let stored = store.article("u").unwrap().bias_assessment.unwrap();
        assert_eq!(stored.category, BiasCategory::Center);
        assert_eq!(stored.confidence, 85);
    }

    #[tokio::test]
    async fn reingesting_article_keeps_recorded_verdict() {
        let store = MemoryStore::new();
        let article = Article::new("u", "t", "s", "c");
        store.upsert_article(&article).await.unwrap();

        let assessment = BiasAssessment {
            category: BiasCategory::Right,
            confidence: 70,
            reasoning: "r".to_string(),
            related_nodes: vec![],
        };
        store.upsert_bias_assessment("u", &assessment).await.unwrap();

        // Re-ingest the bare article, as a repeat collection run would.
        store.upsert_article(&article).await.unwrap();
        assert!(store.article("u").unwrap().bias_assessment.is_some());
    }

    #[tokio::test]
    async fn fact_check_links_to_entities() {
        let store = MemoryStore::new();
        let record =
            FactCheckRecord::new("claim", FactVerdict::True, 90, "reasoning", vec![]);
        store
            .upsert_fact_check(&record, &["Senator A".to_string()])
            .await
            .unwrap();

        assert!(store.fact_check(&record.id).is_some());
    }

    #[tokio::test]
    async fn mentions_accumulate_per_article() {
        let store = MemoryStore::new();
        let mut article = Article::new("u", "t", "s", "c");
        article.entities.push(model::EntityRef {
            id: "Senator A".to_string(),
            entity_type: "Person".to_string(),
        });
        store.upsert_article(&article).await.unwrap();
        store.upsert_article(&article).await.unwrap();

        assert_eq!(store.mentions_of("u").len(), 1);
    }
}
