use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo4rs::{Graph, Query};
use tracing::info;

use extract::{Entity, Relationship};
use model::{Article, BiasAssessment, FactCheckRecord, PipelineError, Result};

use crate::store::{
    EmbeddingCandidate, FactTriple, GraphStats, GraphStore, MentionOverlap,
};

/// Neo4j-backed graph store. Every write is a Cypher MERGE keyed by the
/// node's stable identity, so repeated upserts converge on a single node.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| PipelineError::graph_store(format!("connect to {uri}: {e}")))?;
        Ok(Self::new(graph))
    }

    /// Uniqueness constraints on the merge keys. Safe to run repeatedly.
    pub async fn init_schema(&self) -> Result<()> {
        let statements = [
            "CREATE CONSTRAINT article_url IF NOT EXISTS FOR (a:Article) REQUIRE a.url IS UNIQUE",
            "CREATE CONSTRAINT entity_id IF NOT EXISTS FOR (e:Entity) REQUIRE e.id IS UNIQUE",
            "CREATE CONSTRAINT fact_check_id IF NOT EXISTS FOR (f:FactCheck) REQUIRE f.id IS UNIQUE",
        ];
        for statement in statements {
            self.run(Query::new(statement.to_string())).await?;
        }
        info!("graph schema initialized");
        Ok(())
    }

    async fn run(&self, query: Query) -> Result<()> {
        self.graph
            .run(query)
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn upsert_article(&self, article: &Article) -> Result<()> {
        let query = Query::new(
            r#"
            MERGE (a:Article {url: $url})
            SET a.title = $title,
                a.source = $source,
                a.author = $author,
                a.publishedAt = $published_at,
                a.content = $content
            "#
            .to_string(),
        )
        .param("url", article.url.clone())
        .param("title", article.title.clone())
        .param("source", article.source.clone())
        .param("author", article.author.clone().unwrap_or_default())
        .param(
            "published_at",
            article
                .published_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        )
        .param("content", article.content.clone());

        self.run(query).await?;

        for entity in &article.entities {
            let query = Query::new(
                r#"
                MATCH (a:Article {url: $url})
                MERGE (e:Entity {id: $entity_id})
                ON CREATE SET e.name = $entity_id, e.type = $entity_type
                MERGE (a)-[:MENTIONS]->(e)
                "#
                .to_string(),
            )
            .param("url", article.url.clone())
            .param("entity_id", entity.id.clone())
            .param("entity_type", entity.entity_type.clone());

            self.run(query).await?;
        }

        Ok(())
    }

    async fn upsert_entities(&self, entities: &[Entity]) -> Result<()> {
        for entity in entities {
            let query = Query::new(
                r#"
                MERGE (e:Entity {id: $id})
                SET e.name = $name,
                    e.type = $type
                "#
                .to_string(),
            )
            .param("id", entity.id.clone())
            .param("name", entity.name.clone())
            .param("type", entity.entity_type.clone());

            self.run(query).await?;
        }
        Ok(())
    }

    async fn upsert_relationships(&self, relationships: &[Relationship]) -> Result<()> {
        for rel in relationships {
            let query = Query::new(
                r#"
                MATCH (source:Entity {id: $source_id})
                MATCH (target:Entity {id: $target_id})
                MERGE (source)-[r:RELATION {type: $rel_type}]->(target)
                SET r.evidence = $evidence
                "#
                .to_string(),
            )
            .param("source_id", rel.source.clone())
            .param("target_id", rel.target.clone())
            .param("rel_type", rel.rel_type.clone())
            .param("evidence", rel.evidence.clone().unwrap_or_default());

            self.run(query).await?;
        }
        Ok(())
    }

    async fn upsert_bias_assessment(&self, url: &str, assessment: &BiasAssessment) -> Result<()> {
        let query = Query::new(
            r#"
            MATCH (a:Article {url: $url})
            SET a.bias = $category
            MERGE (b:BiasAssessment {articleUrl: $url})
            SET b.category = $category,
                b.confidence = $confidence,
                b.reasoning = $reasoning,
                b.relatedNodes = $related_nodes
            MERGE (a)-[:HAS_BIAS]->(b)
            "#
            .to_string(),
        )
        .param("url", url.to_string())
        .param("category", assessment.category.as_str().to_string())
        .param("confidence", assessment.confidence as i64)
        .param("reasoning", assessment.reasoning.clone())
        .param("related_nodes", assessment.related_nodes.clone());

        self.run(query).await
    }

    async fn upsert_fact_check(
        &self,
        record: &FactCheckRecord,
        related_entity_ids: &[String],
    ) -> Result<()> {
        let query = Query::new(
            r#"
            MERGE (f:FactCheck {id: $id})
            SET f.claim = $claim,
                f.verdict = $verdict,
                f.confidence = $confidence,
                f.reasoning = $reasoning,
                f.supportingNodes = $supporting_nodes
            "#
            .to_string(),
        )
        .param("id", record.id.clone())
        .param("claim", record.claim.clone())
        .param("verdict", record.verdict.as_str().to_string())
        .param("confidence", record.confidence as i64)
        .param("reasoning", record.reasoning.clone())
        .param("supporting_nodes", record.supporting_nodes.clone());

        self.run(query).await?;

        for entity_id in related_entity_ids {
            let query = Query::new(
                r#"
                MATCH (f:FactCheck {id: $id})
                MERGE (e:Entity {id: $entity_id})
                ON CREATE SET e.name = $entity_id, e.type = 'Issue'
                MERGE (f)-[:MENTIONS]->(e)
                "#
                .to_string(),
            )
            .param("id", record.id.clone())
            .param("entity_id", entity_id.clone());

            self.run(query).await?;
        }

        Ok(())
    }

    async fn set_article_embedding(&self, url: &str, embedding: &[f32]) -> Result<()> {
        let values: Vec<f64> = embedding.iter().map(|v| *v as f64).collect();
        let query = Query::new(
            "MATCH (a:Article {url: $url}) SET a.embedding = $embedding".to_string(),
        )
        .param("url", url.to_string())
        .param("embedding", values);

        self.run(query).await
    }

    async fn article_embedding(&self, url: &str) -> Result<Option<Vec<f32>>> {
        let query = Query::new(
            "MATCH (a:Article {url: $url}) RETURN a.embedding AS embedding".to_string(),
        )
        .param("url", url.to_string());

        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?;

        let Some(row) = result
            .next()
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?
        else {
            return Ok(None);
        };

        let embedding: Option<Vec<f64>> = row.get("embedding").ok().flatten();
        Ok(embedding.map(|e| e.into_iter().map(|v| v as f32).collect()))
    }

    async fn articles_mentioning(&self, entity_ids: &[String]) -> Result<Vec<MentionOverlap>> {
        let query = Query::new(
            r#"
            MATCH (a:Article)-[:MENTIONS]->(e:Entity)
            WHERE e.id IN $entity_ids
            WITH a, count(DISTINCT e) AS shared
            RETURN a.url AS url, a.title AS title, a.bias AS bias,
                   a.publishedAt AS published_at, shared
            "#
            .to_string(),
        )
        .param("entity_ids", entity_ids.to_vec());

        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?;

        let mut overlaps = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?
        {
            let published_at: Option<String> = row.get("published_at").ok().flatten();
            overlaps.push(MentionOverlap {
                url: row
                    .get("url")
                    .map_err(|e| PipelineError::graph_store(e.to_string()))?,
                title: row.get("title").unwrap_or_default(),
                prior_bias: row.get::<Option<String>>("bias").ok().flatten(),
                published_at: published_at
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|t| t.with_timezone(&Utc)),
                shared: row.get::<i64>("shared").unwrap_or(0) as usize,
            });
        }

        Ok(overlaps)
    }

    async fn embedding_candidates(&self, exclude_url: &str) -> Result<Vec<EmbeddingCandidate>> {
        let query = Query::new(
            r#"
            MATCH (b:Article)
            WHERE b.embedding IS NOT NULL AND b.bias IS NOT NULL AND b.url <> $url
            RETURN b.url AS url, b.title AS title, b.bias AS bias, b.embedding AS embedding
            "#
            .to_string(),
        )
        .param("url", exclude_url.to_string());

        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?;

        let mut candidates = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?
        {
            let embedding: Vec<f64> = row.get("embedding").unwrap_or_default();
            candidates.push(EmbeddingCandidate {
                url: row
                    .get("url")
                    .map_err(|e| PipelineError::graph_store(e.to_string()))?,
                title: row.get("title").unwrap_or_default(),
                prior_bias: row.get("bias").unwrap_or_default(),
                embedding: embedding.into_iter().map(|v| v as f32).collect(),
            });
        }

        Ok(candidates)
    }

    async fn related_facts(&self, entity_ids: &[String], limit: usize) -> Result<Vec<FactTriple>> {
        let query = Query::new(
            r#"
            MATCH (e:Entity)-[r:RELATION]-(n:Entity)
            WHERE e.id IN $entity_ids
            RETURN DISTINCT e.id AS source, r.type AS rel_type, n.id AS target
            LIMIT $limit
            "#
            .to_string(),
        )
        .param("entity_ids", entity_ids.to_vec())
        .param("limit", limit as i64);

        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?;

        let mut triples = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| PipelineError::graph_store(e.to_string()))?
        {
            triples.push(FactTriple {
                source: row.get("source").unwrap_or_default(),
                rel_type: row.get("rel_type").unwrap_or_default(),
                target: row.get("target").unwrap_or_default(),
            });
        }

        Ok(triples)
    }

    async fn stats(&self) -> Result<GraphStats> {
        let mut counts = [0usize; 3];
        let statements = [
            "MATCH (a:Article) RETURN count(a) AS count",
            "MATCH (e:Entity) RETURN count(e) AS count",
            "MATCH ()-[r:RELATION]->() RETURN count(r) AS count",
        ];

        for (slot, statement) in counts.iter_mut().zip(statements) {
            let mut result = self
                .graph
                .execute(Query::new(statement.to_string()))
                .await
                .map_err(|e| PipelineError::graph_store(e.to_string()))?;
            if let Some(row) = result
                .next()
                .await
                .map_err(|e| PipelineError::graph_store(e.to_string()))?
            {
                *slot = row.get::<i64>("count").unwrap_or(0) as usize;
            }
        }

        Ok(GraphStats {
            articles: counts[0],
            entities: counts[1],
            relationships: counts[2],
        })
    }
}
