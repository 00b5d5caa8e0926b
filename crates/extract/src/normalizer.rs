use regex::Regex;

/// Normalizes entity names so that re-extracting the same entity yields the
/// same merge key. Identity stays case-sensitive: "Turkey" the country and
/// "turkey" the bird must not collide.
pub struct EntityNormalizer {
    edge_punct: Regex,
    whitespace: Regex,
}

impl EntityNormalizer {
    pub fn new() -> Self {
        Self {
            edge_punct: Regex::new(r#"^["'.,!?;:]+|["'.,!?;:]+$"#).unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Trim punctuation and collapse internal whitespace.
    pub fn normalize(&self, name: &str) -> String {
        let trimmed = name.trim();
        let stripped = self.edge_punct.replace_all(trimmed, "");
        self.whitespace.replace_all(stripped.trim(), " ").to_string()
    }
}

impl Default for EntityNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses() {
        let normalizer = EntityNormalizer::new();
        assert_eq!(normalizer.normalize("  Senator A  "), "Senator A");
        assert_eq!(normalizer.normalize("Senator   A"), "Senator A");
        assert_eq!(normalizer.normalize("\"Policy X\","), "Policy X");
    }

    #[test]
    fn identity_is_case_sensitive() {
        let normalizer = EntityNormalizer::new();
        assert_ne!(normalizer.normalize("ACLU"), normalizer.normalize("aclu"));
    }
}
