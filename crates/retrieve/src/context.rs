use std::sync::Arc;
use tracing::warn;

use graph::GraphStore;

/// Render the relationship triples around the given entities as a plain-text
/// context block for the fact-check prompt. Empty string when there is
/// nothing to say or the store is unreachable.
pub async fn related_facts_text(
    store: &Arc<dyn GraphStore>,
    entity_ids: &[String],
    limit: usize,
) -> String {
    if entity_ids.is_empty() {
        return String::new();
    }

    let triples = match store.related_facts(entity_ids, limit).await {
        Ok(triples) => triples,
        Err(e) => {
            warn!(error = %e, "fact context retrieval failed, continuing without context");
            return String::new();
        }
    };

    let mut text = String::new();
    for triple in triples {
        text.push_str(&format!(
            "- {} {} {}\n",
            triple.source, triple.rel_type, triple.target
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::Relationship;
    use graph::MemoryStore;

    #[tokio::test]
    async fn formats_triples_as_lines() {
        let store = MemoryStore::new();
        store
            .upsert_relationships(&[Relationship {
                source: "Senator A".to_string(),
                target: "Policy X".to_string(),
                rel_type: "supports".to_string(),
                evidence: None,
            }])
            .await
            .unwrap();

        let store: Arc<dyn GraphStore> = Arc::new(store);
        let text = related_facts_text(&store, &["Senator A".to_string()], 10).await;
        assert_eq!(text, "- Senator A supports Policy X\n");
    }

    #[tokio::test]
    async fn empty_entities_yield_empty_context() {
        let store: Arc<dyn GraphStore> = Arc::new(MemoryStore::new());
        assert!(related_facts_text(&store, &[], 10).await.is_empty());
    }
}
