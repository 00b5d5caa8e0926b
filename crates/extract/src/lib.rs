pub mod llm;
pub mod normalizer;
pub mod prompt;
pub mod schema;
pub mod vocab;

pub use llm::{OllamaClient, TextGenerator};
pub use normalizer::EntityNormalizer;
pub use schema::{Entity, ExtractionOutcome, Relationship};
pub use vocab::Vocabulary;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use model::{PipelineError, Result};
use schema::RawExtraction;

/// Turns raw article text into typed entities and relationships, constrained
/// to the allowed vocabularies.
pub struct Extractor {
    generator: Arc<dyn TextGenerator>,
    vocab: Vocabulary,
    normalizer: EntityNormalizer,
    max_retries: usize,
}

impl Extractor {
    pub fn new(generator: Arc<dyn TextGenerator>, vocab: Vocabulary) -> Self {
        Self {
            generator,
            vocab,
            normalizer: EntityNormalizer::new(),
            max_retries: 3,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Extract entities and relationships from article text.
    ///
    /// Empty input is a valid degenerate case and returns an empty outcome
    /// without touching the generator. Malformed generation output after the
    /// bounded retry is an `Extraction` error.
    pub async fn extract(&self, text: &str) -> Result<ExtractionOutcome> {
        if text.trim().is_empty() {
            return Ok(ExtractionOutcome::default());
        }

        let prompt = prompt::build_extraction_prompt(text, &self.vocab);
        // Network failures during extraction are extraction failures to the
        // rest of the pipeline.
        let json_str = self
            .generate_json_with_retry(&prompt)
            .await
            .map_err(|e| match e {
                PipelineError::Extraction(_) => e,
                other => PipelineError::extraction(other.to_string()),
            })?;

        let raw: RawExtraction = serde_json::from_str(&json_str)
            .map_err(|e| PipelineError::extraction(format!("unparseable extraction: {e}")))?;

        Ok(self.sanitize(raw))
    }

    /// Generate, validating the output is well-formed JSON; on failure,
    /// reprompt the generator to correct its own output.
    async fn generate_json_with_retry(&self, prompt: &str) -> Result<String> {
        let mut response = self.generator.generate(prompt).await?;

        for attempt in 0..self.max_retries {
            if serde_json::from_str::<serde_json::Value>(&response).is_ok() {
                return Ok(response);
            }

            debug!(attempt, "extraction output was not valid JSON, reprompting");
            let retry_prompt = prompt::build_retry_prompt(&response);
            response = self.generator.generate(&retry_prompt).await?;
        }

        if serde_json::from_str::<serde_json::Value>(&response).is_ok() {
            return Ok(response);
        }

        Err(PipelineError::extraction(format!(
            "no valid JSON after {} retries",
            self.max_retries
        )))
    }

    /// Normalize names, drop out-of-vocabulary entities and edges, and
    /// deduplicate by id.
    fn sanitize(&self, raw: RawExtraction) -> ExtractionOutcome {
        let mut entities = Vec::new();
        let mut seen = HashSet::new();

        for raw_entity in raw.entities {
            let id = self.normalizer.normalize(&raw_entity.name);
            if id.is_empty() || !seen.insert(id.clone()) {
                continue;
            }

            match self.vocab.canonical_node_type(&raw_entity.entity_type) {
                Some(entity_type) => entities.push(Entity {
                    id: id.clone(),
                    name: id,
                    entity_type: entity_type.to_string(),
                }),
                None => {
                    warn!(name = %raw_entity.name, entity_type = %raw_entity.entity_type,
                        "dropping entity with out-of-vocabulary type");
                    seen.remove(&id);
                }
            }
        }

        let known: HashSet<&str> = entities.iter().map(|e| e.id.as_str()).collect();
        let mut relationships = Vec::new();

        for raw_rel in raw.relationships {
            let source = self.normalizer.normalize(&raw_rel.source);
            let target = self.normalizer.normalize(&raw_rel.target);

            let Some(rel_type) = self.vocab.canonical_relationship_type(&raw_rel.rel_type) else {
                warn!(rel_type = %raw_rel.rel_type, "dropping out-of-vocabulary relationship");
                continue;
            };
            if !known.contains(source.as_str()) || !known.contains(target.as_str()) {
                continue;
            }

            relationships.push(Relationship {
                source,
                target,
                rel_type: rel_type.to_string(),
                evidence: raw_rel.evidence,
            });
        }

        ExtractionOutcome {
            entities,
            relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Generator returning a scripted sequence of responses.
    struct ScriptedGenerator {
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().rev().map(String::from).collect()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| PipelineError::generation("script exhausted"))
        }
    }

    fn extractor(responses: Vec<&str>) -> Extractor {
        Extractor::new(ScriptedGenerator::new(responses), Vocabulary::default())
    }

    const GOOD_OUTPUT: &str = r#"{
        "entities": [
            {"name": " Senator A ", "type": "Person"},
            {"name": "Senator A", "type": "Person"},
            {"name": "Policy X", "type": "Policy"},
            {"name": "Mars", "type": "Planet"}
        ],
        "relationships": [
            {"source": "Senator A", "target": "Policy X", "type": "supports", "evidence": "the senator backed it"},
            {"source": "Senator A", "target": "Mars", "type": "supports"},
            {"source": "Senator A", "target": "Policy X", "type": "married_to"}
        ]
    }"#;

    #[tokio::test]
    async fn empty_text_skips_generation() {
        let extractor = extractor(vec![]);
        let outcome = extractor.extract("   ").await.unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn sanitizes_names_vocab_and_duplicates() {
        let extractor = extractor(vec![GOOD_OUTPUT]);
        let outcome = extractor.extract("Senator A backs Policy X.").await.unwrap();

        // "Mars" dropped (type outside vocabulary), duplicate "Senator A" merged.
        let ids: Vec<&str> = outcome.entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["Senator A", "Policy X"]);

        // Only the in-vocabulary edge between known entities survives.
        assert_eq!(outcome.relationships.len(), 1);
        assert_eq!(outcome.relationships[0].rel_type, "supports");
    }

    #[tokio::test]
    async fn retries_with_correction_prompt() {
        let extractor = extractor(vec!["not json at all", GOOD_OUTPUT]);
        let outcome = extractor.extract("text").await.unwrap();
        assert_eq!(outcome.entities.len(), 2);
    }

    #[tokio::test]
    async fn persistent_garbage_is_extraction_error() {
        let extractor =
            extractor(vec!["garbage", "garbage", "garbage", "garbage"]).with_max_retries(3);
        let err = extractor.extract("text").await.unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }
}
