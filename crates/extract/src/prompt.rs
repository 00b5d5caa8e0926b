use crate::vocab::Vocabulary;

pub fn build_extraction_prompt(article_text: &str, vocab: &Vocabulary) -> String {
    format!(
        r#"Extract the political entities and relationships from the following news article.

INSTRUCTIONS:
1. Identify the key entities the article covers
2. Extract relationships between those entities
3. Output ONLY valid JSON, nothing else
4. Use the exact schema below

SCHEMA:
{{
  "entities": [
    {{"name": "EntityName", "type": "EntityType"}}
  ],
  "relationships": [
    {{"source": "EntityName", "target": "OtherEntityName", "type": "relationship_type", "evidence": "quote from article"}}
  ]
}}

RULES:
- Entity types must be one of: {}
- Relationship types must be one of: {}
- Evidence must be a direct quote from the article
- Output ONLY the JSON object, no markdown, no explanations

ARTICLE:
{}

JSON OUTPUT:"#,
        vocab.node_types.join(", "),
        vocab.relationship_types.join(", "),
        article_text
    )
}

pub fn build_retry_prompt(invalid_json: &str) -> String {
    format!(
        r#"The following JSON is invalid:

{}

Fix this JSON. Output only valid JSON with no markdown formatting, no code blocks, no explanations. Just the raw JSON object."#,
        invalid_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_vocabularies() {
        let prompt = build_extraction_prompt("Some article.", &Vocabulary::default());
        assert!(prompt.contains("Person, Organization"));
        assert!(prompt.contains("affiliated_with"));
        assert!(prompt.contains("Some article."));
    }
}
