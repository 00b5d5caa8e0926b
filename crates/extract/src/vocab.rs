/// Allowed node types for extraction. Entities outside this set are dropped,
/// along with any relationship touching them.
pub const NODE_TYPES: &[&str] = &[
    "Person",
    "Organization",
    "Event",
    "Policy",
    "Issue",
    "Location",
    "Election",
    "Bill",
    "Vote",
    "Speech",
    "Scandal",
    "Movement",
    "Alliance",
    "Media",
];

/// Allowed relationship types between entities.
pub const RELATIONSHIP_TYPES: &[&str] = &[
    "affiliated_with",
    "participated_in",
    "mentions",
    "supports",
    "opposes",
    "member_of",
    "located_in",
    "sponsored_by",
    "voted_on",
    "spoke_at",
    "criticized",
    "endorsed",
];

/// Allowed vocabularies the extractor is constrained to.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub node_types: Vec<String>,
    pub relationship_types: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            node_types: NODE_TYPES.iter().map(|s| s.to_string()).collect(),
            relationship_types: RELATIONSHIP_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Canonicalize a generated node type, case-insensitively.
    pub fn canonical_node_type(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        self.node_types
            .iter()
            .find(|t| t.eq_ignore_ascii_case(raw))
            .map(|t| t.as_str())
    }

    pub fn canonical_relationship_type(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        self.relationship_types
            .iter()
            .find(|t| t.eq_ignore_ascii_case(raw))
            .map(|t| t.as_str())
    }
}
