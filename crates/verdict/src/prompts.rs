use retrieve::SimilarArticle;

/// Marker embedded in the prompt when retrieval came back empty.
pub const NO_SIMILAR_CONTEXT: &str = "No similar articles available. Use only the article text.";

pub fn build_bias_prompt(
    article_text: &str,
    similar: Option<&SimilarArticle>,
    shared_entities: &[String],
) -> String {
    let (similar_bias, matched_entities) = match similar {
        Some(article) => (
            format!(
                "The most similar article in the political news knowledge graph (\"{}\") has bias: {}.",
                article.title,
                article.prior_bias.as_deref().unwrap_or("Unknown")
            ),
            shared_entities.join(", "),
        ),
        None => (NO_SIMILAR_CONTEXT.to_string(), "N/A".to_string()),
    };

    format!(
        r#"You are a political bias analyst tasked with determining the political bias of a news article.

You are provided with:
- The full text of the article.
- A bias label from the most structurally similar article in a political knowledge graph
- A list of entities that both articles mention

Classify the bias of the article as one of: "Left", "Right", "Center".

Use the bias label and shared entities from the similar article as a clue, but do not rely on it exclusively. Base your final answer on the article's framing, tone, and word choice combined with the knowledge graph context.

Respond in JSON with this exact format:

{{
    "bias": "Left" | "Right" | "Center",
    "confidence_score": 0-100,
    "reasoning": "Brief explanation, including how the similar article's bias and shared entities informed it.",
    "related_nodes": ["article titles or node names used in comparison"]
}}

ARTICLE TEXT:
{article_text}

MOST SIMILAR ARTICLE BIAS:
{similar_bias}

SHARED ENTITIES:
{matched_entities}"#
    )
}

pub fn build_fact_check_prompt(claim: &str, kg_context: &str) -> String {
    let related_kg_context = if kg_context.trim().is_empty() {
        NO_SIMILAR_CONTEXT
    } else {
        kg_context
    };

    format!(
        r#"You are a political fact-checking assistant with access to a U.S. politics knowledge graph.

You are given:
1. A factual claim to verify.
2. Knowledge graph context derived from related articles based on shared entities.

Evaluate whether the claim is true or false. Consider the credibility of the context, alignment with known facts, and the tone or framing used. If the knowledge graph context is not helpful or is missing, rely only on the claim text and your internal knowledge, and make that clear in your reasoning.

Respond ONLY with a JSON object in the following format:

{{
  "verdict": "True" or "False",
  "confidence_score": 0-100,
  "reasoning": "Concise explanation of your reasoning",
  "supporting_nodes": ["key concepts, entities, or phrases from context"]
}}

Claim:
{claim}

Knowledge Graph Context:
{related_kg_context}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_retrieval_gets_explicit_marker() {
        let prompt = build_bias_prompt("text", None, &[]);
        assert!(prompt.contains(NO_SIMILAR_CONTEXT));

        let prompt = build_fact_check_prompt("claim", "  ");
        assert!(prompt.contains(NO_SIMILAR_CONTEXT));
    }

    #[test]
    fn similar_article_label_is_embedded() {
        let similar = SimilarArticle {
            url: "u".to_string(),
            title: "Budget vote".to_string(),
            prior_bias: Some("Left".to_string()),
            score: 3.0,
        };
        let prompt = build_bias_prompt("text", Some(&similar), &["Senator A".to_string()]);
        assert!(prompt.contains("has bias: Left"));
        assert!(prompt.contains("Senator A"));
    }
}
