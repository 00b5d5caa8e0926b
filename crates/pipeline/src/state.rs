use serde::{Deserialize, Serialize};

use model::{Article, BiasAssessment, FactCheckRecord};

/// Aggregate outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Ready,
    Processing,
    Completed,
    PartiallyFailed,
}

/// Which judgment a batch run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTask {
    Bias,
    FactCheck,
}

/// A user query routed straight to an agent, bypassing collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectQuery {
    Bias(String),
    FactCheck(String),
}

/// Per-item progression through the pipeline. `ContextRetrieved` is skipped
/// when no store is configured or extraction found no entities; any step
/// failure terminates the item at `Classified` with the fallback verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStage {
    Pending,
    Extracted,
    ContextRetrieved,
    Classified,
    Persisted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub article: Article,
    pub stage: ItemStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The orchestrator's working memory for one run. Stages consume a state
/// and return a new one; nothing mutates a state another stage still holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub items: Vec<ItemOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_query: Option<DirectQuery>,
    pub task: AnalysisTask,
    pub status: PipelineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bias: Option<BiasAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fact_check: Option<FactCheckRecord>,
}

impl PipelineState {
    /// State for a batch run. Mutually exclusive with a direct query.
    pub fn for_batch(articles: Vec<Article>, task: AnalysisTask) -> Self {
        Self {
            items: articles
                .into_iter()
                .map(|article| ItemOutcome {
                    article,
                    stage: ItemStage::Pending,
                    error: None,
                })
                .collect(),
            direct_query: None,
            task,
            status: PipelineStatus::Ready,
            error: None,
            last_bias: None,
            last_fact_check: None,
        }
    }

    /// State for a direct user query, with no batch attached.
    pub fn for_query(query: DirectQuery) -> Self {
        let task = match query {
            DirectQuery::Bias(_) => AnalysisTask::Bias,
            DirectQuery::FactCheck(_) => AnalysisTask::FactCheck,
        };
        Self {
            items: Vec::new(),
            direct_query: Some(query),
            task,
            status: PipelineStatus::Ready,
            error: None,
            last_bias: None,
            last_fact_check: None,
        }
    }

    pub fn with_status(mut self, status: PipelineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn failed_items(&self) -> usize {
        self.items.iter().filter(|i| i.error.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_and_query_are_mutually_exclusive() {
        let batch = PipelineState::for_batch(vec![], AnalysisTask::Bias);
        assert!(batch.direct_query.is_none());

        let query = PipelineState::for_query(DirectQuery::FactCheck("claim".to_string()));
        assert!(query.items.is_empty());
        assert_eq!(query.task, AnalysisTask::FactCheck);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(ItemStage::Pending < ItemStage::Extracted);
        assert!(ItemStage::Classified < ItemStage::Persisted);
    }
}
