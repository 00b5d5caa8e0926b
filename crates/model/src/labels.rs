use serde::{Deserialize, Serialize};
use std::fmt;

/// Political leaning of an article. Closed set: any label outside it
/// normalizes to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiasCategory {
    Left,
    Center,
    Right,
    Unknown,
}

/// Verdict on a factual claim. Closed set, same normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactVerdict {
    True,
    False,
    Unknown,
}

impl BiasCategory {
    /// The full closed set, in a stable order. Evaluation seeds its label
    /// space from this so zero-support categories still show up in reports.
    pub const ALL: [Self; 4] = [Self::Left, Self::Center, Self::Right, Self::Unknown];

    /// Parse a free-form label into the closed set.
    ///
    /// This is the single source of truth for bias label normalization,
    /// shared by the verdict agent and the evaluation harness. Synonym
    /// collapsing follows the labeled reference datasets ("lean left" and
    /// "lean right" are graded variants of the base labels).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "left" | "lean left" | "leans left" | "far left" | "left-leaning" => Self::Left,
            "right" | "lean right" | "leans right" | "far right" | "right-leaning" => Self::Right,
            "center" | "centre" | "centrist" | "moderate" | "neutral" => Self::Center,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
            Self::Unknown => "Unknown",
        }
    }
}

impl FactVerdict {
    pub const ALL: [Self; 3] = [Self::True, Self::False, Self::Unknown];

    /// Parse a free-form verdict into the closed set.
    ///
    /// Graded PolitiFact-style verdicts collapse onto their binary base;
    /// anything unrecognized is `Unknown` rather than `False`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "true" | "mostly true" | "mostly-true" | "half true" | "half-true" => Self::True,
            "false" | "mostly false" | "mostly-false" | "pants on fire" | "pants-fire" => {
                Self::False
            }
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FactVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a raw confidence score from generation output into [0, 100].
pub fn clamp_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_synonyms_collapse() {
        assert_eq!(BiasCategory::parse("Lean Left"), BiasCategory::Left);
        assert_eq!(BiasCategory::parse("  far right "), BiasCategory::Right);
        assert_eq!(BiasCategory::parse("Centre"), BiasCategory::Center);
    }

    #[test]
    fn unrecognized_bias_is_unknown() {
        assert_eq!(BiasCategory::parse("libertarian"), BiasCategory::Unknown);
        assert_eq!(BiasCategory::parse(""), BiasCategory::Unknown);
    }

    #[test]
    fn verdict_grades_collapse() {
        assert_eq!(FactVerdict::parse("mostly-true"), FactVerdict::True);
        assert_eq!(FactVerdict::parse("Half True"), FactVerdict::True);
        assert_eq!(FactVerdict::parse("pants on fire"), FactVerdict::False);
    }

    #[test]
    fn unrecognized_verdict_is_unknown() {
        assert_eq!(FactVerdict::parse("unverifiable"), FactVerdict::Unknown);
    }

    #[test]
    fn confidence_clamped_to_range() {
        assert_eq!(clamp_confidence(-5.0), 0);
        assert_eq!(clamp_confidence(87.4), 87);
        assert_eq!(clamp_confidence(250.0), 100);
        assert_eq!(clamp_confidence(f64::NAN), 0);
    }
}
