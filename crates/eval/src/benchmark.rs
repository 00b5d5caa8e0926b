use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use model::{Article, BiasCategory};
use pipeline::{AnalysisTask, Orchestrator, PipelineState};

use crate::metrics::{ConfusionMatrix, EvaluationReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub graph_assisted: MethodResults,
    pub text_only: MethodResults,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodResults {
    pub method: String,
    pub total_articles: usize,
    pub degraded_articles: usize,
    pub avg_latency_ms: f64,
    pub report: EvaluationReport,
}

/// Graph-assisted minus text-only, in absolute points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub accuracy_delta: f64,
    pub macro_f1_delta: f64,
    pub kappa_delta: f64,
}

/// Runs the same labeled articles through two pipelines, one with the graph
/// and one without, and scores both against the ground-truth bias labels.
pub struct Benchmarker {
    graph_assisted: Orchestrator,
    text_only: Orchestrator,
}

impl Benchmarker {
    pub fn new(graph_assisted: Orchestrator, text_only: Orchestrator) -> Self {
        Self {
            graph_assisted,
            text_only,
        }
    }

    pub async fn run(&self, test_set: &[Article]) -> Result<BenchmarkResults> {
        println!("Running benchmark with {} labeled articles...", test_set.len());

        println!("Testing text-only baseline...");
        let text_only = evaluate(&self.text_only, "Text-only", test_set).await;

        println!("Testing graph-assisted pipeline...");
        let graph_assisted = evaluate(&self.graph_assisted, "Graph-assisted", test_set).await;

        let comparison = Comparison {
            accuracy_delta: graph_assisted.report.accuracy - text_only.report.accuracy,
            macro_f1_delta: graph_assisted.report.macro_f1 - text_only.report.macro_f1,
            kappa_delta: graph_assisted.report.cohen_kappa - text_only.report.cohen_kappa,
        };

        Ok(BenchmarkResults {
            graph_assisted,
            text_only,
            comparison,
        })
    }
}

async fn evaluate(orchestrator: &Orchestrator, method: &str, test_set: &[Article]) -> MethodResults {
    let state = PipelineState::for_batch(test_set.to_vec(), AnalysisTask::Bias);

    let start = Instant::now();
    let final_state = orchestrator.run(state).await;
    let elapsed_ms = start.elapsed().as_millis() as f64;

    let pairs = prediction_pairs(&final_state);
    let labels: Vec<&str> = BiasCategory::ALL.iter().map(|c| c.as_str()).collect();
    let matrix = ConfusionMatrix::from_pairs(
        &labels,
        pairs.iter().map(|(p, a)| (p.as_str(), a.as_str())),
    );

    MethodResults {
        method: method.to_string(),
        total_articles: final_state.items.len(),
        degraded_articles: final_state.failed_items(),
        avg_latency_ms: if final_state.items.is_empty() {
            0.0
        } else {
            elapsed_ms / final_state.items.len() as f64
        },
        report: matrix.report(),
    }
}

/// `(predicted, actual)` label pairs for every item that carries both a
/// verdict and a ground-truth label. Both sides go through the same label
/// parser, so "lean left" in a dataset and "Left" from the classifier land
/// on the same token.
pub fn prediction_pairs(state: &PipelineState) -> Vec<(String, String)> {
    state
        .items
        .iter()
        .filter_map(|item| {
            let predicted = item.article.bias_assessment.as_ref()?.category;
            let actual = BiasCategory::parse(item.article.ground_truth_bias.as_deref()?);
            Some((predicted.as_str().to_string(), actual.as_str().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use extract::TextGenerator;
    use graph::{GraphStore, MemoryStore};
    use pipeline::PipelineConfig;
    use std::sync::Arc;

    /// Answers extraction prompts with an empty result and classification
    /// prompts with a fixed bias.
    struct FixedBiasGenerator {
        bias: &'static str,
    }

    #[async_trait]
    impl TextGenerator for FixedBiasGenerator {
        async fn generate(&self, prompt: &str) -> model::Result<String> {
            if prompt.contains("JSON OUTPUT:") {
                Ok(r#"{"entities": [], "relationships": []}"#.to_string())
            } else {
                Ok(format!(
                    r#"{{"bias": "{}", "confidence_score": 70, "reasoning": "fixed", "related_nodes": []}}"#,
                    self.bias
                ))
            }
        }
    }

    fn orchestrator(bias: &'static str, with_store: bool) -> Orchestrator {
        let generator: Arc<dyn TextGenerator> = Arc::new(FixedBiasGenerator { bias });
        let store = with_store.then(|| Arc::new(MemoryStore::new()) as Arc<dyn GraphStore>);
        Orchestrator::new(Some(generator), store, &PipelineConfig::default()).unwrap()
    }

    fn labeled_article(url: &str, bias: &str) -> Article {
        let mut article = Article::new(url, url, "Wire", "some political text");
        article.ground_truth_bias = Some(bias.to_string());
        article
    }

    #[tokio::test]
    async fn pairs_use_normalized_labels_on_both_sides() {
        let orch = orchestrator("Left", false);
        let state = PipelineState::for_batch(
            vec![
                labeled_article("u1", "lean left"),
                labeled_article("u2", "right"),
            ],
            AnalysisTask::Bias,
        );
        let final_state = orch.run(state).await;

        let pairs = prediction_pairs(&final_state);
        assert_eq!(
            pairs,
            vec![
                ("Left".to_string(), "Left".to_string()),
                ("Left".to_string(), "Right".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unlabeled_articles_are_excluded_from_scoring() {
        let orch = orchestrator("Center", false);
        let mut unlabeled = Article::new("u3", "u3", "Wire", "text");
        unlabeled.ground_truth_bias = None;
        let state = PipelineState::for_batch(
            vec![labeled_article("u1", "center"), unlabeled],
            AnalysisTask::Bias,
        );
        let final_state = orch.run(state).await;

        assert_eq!(final_state.items.len(), 2);
        assert_eq!(prediction_pairs(&final_state).len(), 1);
    }

    #[tokio::test]
    async fn benchmark_compares_both_methods_over_the_same_set() {
        let benchmarker = Benchmarker::new(
            orchestrator("Left", true),
            orchestrator("Unknown", false),
        );
        let test_set = vec![
            labeled_article("u1", "left"),
            labeled_article("u2", "left"),
            labeled_article("u3", "right"),
        ];

        let results = benchmarker.run(&test_set).await.unwrap();

        assert_eq!(results.graph_assisted.total_articles, 3);
        assert_eq!(results.text_only.total_articles, 3);

        // Both configurations score over the same closed label set.
        let label_rows = |m: &MethodResults| {
            m.report.per_label.iter().map(|l| l.label.clone()).collect::<Vec<_>>()
        };
        assert_eq!(
            label_rows(&results.graph_assisted),
            label_rows(&results.text_only)
        );
        // Always answering Left beats always answering Unknown on this set.
        assert!(results.comparison.accuracy_delta > 0.0);
        assert!(
            (results.graph_assisted.report.accuracy - 2.0 / 3.0).abs() < 1e-9
        );
        assert!(results.text_only.report.accuracy < 1e-9);
    }
}
