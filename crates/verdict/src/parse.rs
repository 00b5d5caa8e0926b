use serde::de::DeserializeOwned;

use model::{PipelineError, Result};

/// Parse a structured verdict out of raw generation output.
///
/// Strict parse first; if the model wrapped its JSON in prose or markdown,
/// fall back to a bounded brace-matching scan for the largest well-formed
/// object embedded anywhere in the text. Anything past that is a
/// `GenerationParse` error, which the agents convert into the fallback
/// verdict.
pub fn parse_verdict<T: DeserializeOwned>(raw: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str::<T>(raw) {
        return Ok(value);
    }

    let block = largest_json_block(raw)
        .ok_or_else(|| PipelineError::parse("no JSON object found in response"))?;

    serde_json::from_str::<T>(block)
        .map_err(|e| PipelineError::parse(format!("embedded JSON did not match schema: {e}")))
}

/// Find the largest balanced `{ ... }` span, tracking string literals and
/// escapes so braces inside quoted text do not unbalance the scan.
pub fn largest_json_block(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, usize)> = None;

    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let s = start.take().unwrap_or(i);
                    let candidate = (s, i + 1);
                    if best.is_none_or(|(bs, be)| candidate.1 - candidate.0 > be - bs) {
                        best = Some(candidate);
                    }
                }
            }
            _ => {}
        }
    }

    best.map(|(s, e)| &text[s..e])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        verdict: String,
    }

    #[test]
    fn strict_json_parses_directly() {
        let sample: Sample = parse_verdict(r#"{"verdict": "True"}"#).unwrap();
        assert_eq!(sample.verdict, "True");
    }

    #[test]
    fn json_wrapped_in_prose_is_recovered() {
        let raw = r#"Sure! Here is my analysis:

```json
{"verdict": "False"}
```

Let me know if you need more."#;
        let sample: Sample = parse_verdict(raw).unwrap();
        assert_eq!(sample.verdict, "False");
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let raw = r#"prefix {"verdict": "contains { and } and \" quote"} suffix"#;
        let sample: Sample = parse_verdict(raw).unwrap();
        assert!(sample.verdict.contains('{'));
    }

    #[test]
    fn largest_block_wins() {
        let raw = r#"{"a": 1} and then {"verdict": "True", "confidence": 80}"#;
        assert_eq!(
            largest_json_block(raw),
            Some(r#"{"verdict": "True", "confidence": 80}"#)
        );
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_verdict::<Sample>("complete nonsense").unwrap_err();
        assert!(matches!(err, PipelineError::GenerationParse(_)));
    }

    #[test]
    fn wrong_schema_is_a_parse_error() {
        let err = parse_verdict::<Sample>(r#"{"other_field": 3}"#).unwrap_err();
        assert!(matches!(err, PipelineError::GenerationParse(_)));
    }
}
