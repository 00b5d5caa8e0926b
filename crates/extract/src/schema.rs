use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Normalized name, also the merge key in the graph.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// A typed directed edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Direct quote from the article backing this edge.
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl ExtractionOutcome {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    pub fn entity_ids(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }
}

/// Wire shape of the generation output, before normalization and vocabulary
/// filtering.
#[derive(Debug, Deserialize)]
pub(crate) struct RawExtraction {
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRelationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub evidence: Option<String>,
}
