use std::sync::Arc;
use tracing::{info, warn};

use extract::{Extractor, TextGenerator, Vocabulary};
use graph::GraphStore;
use model::{EntityRef, PipelineError, Result};
use retrieve::{StructuralRetriever, related_facts_text};
use verdict::{BiasAgent, FactCheckAgent};

use crate::config::PipelineConfig;
use crate::state::{
    AnalysisTask, DirectQuery, ItemOutcome, ItemStage, PipelineState, PipelineStatus,
};

/// Sequences extraction, graph updates, retrieval, and classification over a
/// `PipelineState`, one article at a time.
///
/// Batch processing is fault-isolated per item: an extraction or store
/// failure degrades that article (recorded error, empty context, fallback
/// verdict) and the batch moves on. Only a missing generation capability
/// aborts, at construction time.
pub struct Orchestrator {
    extractor: Extractor,
    store: Option<Arc<dyn GraphStore>>,
    embedder: Option<graph::EmbeddingClient>,
    bias_agent: BiasAgent,
    fact_agent: FactCheckAgent,
    fact_context_limit: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("store", &self.store.is_some())
            .field("embedder", &self.embedder.is_some())
            .field("fact_context_limit", &self.fact_context_limit)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        store: Option<Arc<dyn GraphStore>>,
        config: &PipelineConfig,
    ) -> Result<Self> {
        let generator = generator.ok_or_else(|| {
            PipelineError::configuration("no text-generation capability configured")
        })?;

        Ok(Self {
            extractor: Extractor::new(generator.clone(), Vocabulary::default())
                .with_max_retries(config.extraction_retries),
            store,
            embedder: None,
            bias_agent: BiasAgent::new(generator.clone()),
            fact_agent: FactCheckAgent::new(generator),
            fact_context_limit: config.fact_context_limit,
        })
    }

    pub fn with_embedder(mut self, embedder: graph::EmbeddingClient) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Assemble the pipeline from configuration: Ollama for generation and,
    /// when configured, Neo4j for the graph.
    pub async fn from_config(config: &PipelineConfig) -> Result<Self> {
        let generator: Arc<dyn TextGenerator> = Arc::new(extract::OllamaClient::new(
            config.generation.base_url.clone(),
            config.generation.model.clone(),
            config.generation.timeout(),
        )?);

        let store: Option<Arc<dyn GraphStore>> = match &config.graph {
            Some(graph_config) => {
                let store = graph::Neo4jStore::connect(
                    &graph_config.uri,
                    &graph_config.user,
                    &graph_config.password,
                )
                .await?;
                store.init_schema().await?;
                Some(Arc::new(store))
            }
            None => None,
        };

        let mut orchestrator = Self::new(Some(generator), store, config)?;
        if let Some(model) = &config.embedding_model {
            orchestrator = orchestrator.with_embedder(graph::EmbeddingClient::new(
                config.generation.base_url.clone(),
                model.clone(),
                config.generation.timeout(),
            )?);
        }
        Ok(orchestrator)
    }

    /// Run the state machine to completion. The single routing decision:
    /// a direct query goes straight to the matching agent, everything else
    /// is a batch.
    pub async fn run(&self, state: PipelineState) -> PipelineState {
        let state = state.with_status(PipelineStatus::Processing);
        match state.direct_query.clone() {
            Some(query) => self.run_direct(state, query).await,
            None => self.run_batch(state).await,
        }
    }

    /// Direct queries bypass collection: no extraction, no article upserts.
    /// Exactly one result slot ends up populated.
    async fn run_direct(&self, state: PipelineState, query: DirectQuery) -> PipelineState {
        let mut state = state;
        match query {
            DirectQuery::Bias(text) => {
                state.last_bias = Some(self.bias_agent.classify(&text, None, &[]).await);
            }
            DirectQuery::FactCheck(claim) => {
                let record = self.fact_agent.check(&claim, "").await;
                if let Some(store) = &self.store {
                    if let Err(e) = store.upsert_fact_check(&record, &[]).await {
                        warn!(error = %e, "could not persist direct-query fact check");
                        state.error = Some(e.to_string());
                    }
                }
                state.last_fact_check = Some(record);
            }
        }
        state.with_status(PipelineStatus::Completed)
    }

    async fn run_batch(&self, state: PipelineState) -> PipelineState {
        let mut state = state;
        let task = state.task;
        let items = std::mem::take(&mut state.items);
        let total = items.len();
        let mut next = state;
        next.items = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            info!(index, total, url = %item.article.url, "processing article");
            let outcome = self.process_item(item, task).await;

            next.last_bias = outcome.article.bias_assessment.clone().or(next.last_bias);
            next.last_fact_check = outcome.article.fact_check.clone().or(next.last_fact_check);
            next.items.push(outcome);
        }

        let status = if next.failed_items() == 0 {
            PipelineStatus::Completed
        } else {
            PipelineStatus::PartiallyFailed
        };
        next.with_status(status)
    }

    async fn process_item(&self, item: ItemOutcome, task: AnalysisTask) -> ItemOutcome {
        let mut article = item.article;
        let mut errors: Vec<String> = Vec::new();
        let mut stage = ItemStage::Pending;

        // Extract. A failure here degrades to an empty entity set; classification
        // still runs on the bare text.
        let extraction = match self.extractor.extract(&article.content).await {
            Ok(extraction) => {
                stage = ItemStage::Extracted;
                extraction
            }
            Err(e) => {
                warn!(url = %article.url, error = %e, "extraction failed, continuing degraded");
                errors.push(e.to_string());
                extract::ExtractionOutcome::default()
            }
        };

        article.entities = extraction
            .entities
            .iter()
            .map(|e| EntityRef {
                id: e.id.clone(),
                entity_type: e.entity_type.clone(),
            })
            .collect();
        let entity_ids = extraction.entity_ids();

        // Persist the article and its subgraph before asking for context, so
        // this article is a candidate for the ones that follow.
        if let Some(store) = &self.store {
            let result = async {
                store.upsert_entities(&extraction.entities).await?;
                store.upsert_relationships(&extraction.relationships).await?;
                store.upsert_article(&article).await
            }
            .await;
            if let Err(e) = result {
                warn!(url = %article.url, error = %e, "graph upsert failed, continuing degraded");
                errors.push(e.to_string());
            }

            // A missing embedding narrows future retrieval but is not worth
            // degrading the item over.
            if let Some(embedder) = &self.embedder {
                match embedder.embed(&article.content).await {
                    Ok(vector) => {
                        if let Err(e) = store.set_article_embedding(&article.url, &vector).await {
                            warn!(url = %article.url, error = %e, "could not store embedding");
                        }
                    }
                    Err(e) => warn!(url = %article.url, error = %e, "embedding failed"),
                }
            }
        }

        // Retrieve context. Skipped when there is no store or no entities.
        let mut similar = None;
        let mut fact_context = String::new();
        if let Some(store) = &self.store {
            if !entity_ids.is_empty() {
                match task {
                    AnalysisTask::Bias => {
                        let retriever = StructuralRetriever::new(store.clone());
                        similar = retriever.most_similar_bias(&article.url, &entity_ids).await;
                    }
                    AnalysisTask::FactCheck => {
                        fact_context =
                            related_facts_text(store, &entity_ids, self.fact_context_limit).await;
                    }
                }
                stage = ItemStage::ContextRetrieved;
            }
        }

        // Classify and persist the verdict.
        match task {
            AnalysisTask::Bias => {
                let assessment = self
                    .bias_agent
                    .classify(&article.content, similar.as_ref(), &entity_ids)
                    .await;
                stage = ItemStage::Classified;

                if let Some(store) = &self.store {
                    match store.upsert_bias_assessment(&article.url, &assessment).await {
                        Ok(()) => stage = ItemStage::Persisted,
                        Err(e) => errors.push(e.to_string()),
                    }
                }
                article.bias_assessment = Some(assessment);
            }
            AnalysisTask::FactCheck => {
                let record = self.fact_agent.check(&article.content, &fact_context).await;
                stage = ItemStage::Classified;

                if let Some(store) = &self.store {
                    match store.upsert_fact_check(&record, &entity_ids).await {
                        Ok(()) => stage = ItemStage::Persisted,
                        Err(e) => errors.push(e.to_string()),
                    }
                }
                article.fact_check = Some(record);
            }
        }

        ItemOutcome {
            article,
            stage,
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }
}
