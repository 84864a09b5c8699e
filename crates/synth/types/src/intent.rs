//! Structured intent summaries and their encoded form.

use serde::{Deserialize, Serialize};

use crate::{Regime, SemanticVector};

/// Coarse certainty signal derived upstream from the raw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Certainty {
    High,
    #[default]
    Medium,
    Low,
    /// An explicit hedge ("maybe", "not sure", ...) was detected.
    Hedged,
}

impl Certainty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Certainty::High => "high",
            Certainty::Medium => "medium",
            Certainty::Low => "low",
            Certainty::Hedged => "hedged",
        }
    }
}

/// Lexical summary of a request, produced by an external extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct IntentSummary {
    /// Action label, e.g. `search`.
    #[serde(default)]
    pub action: Option<String>,
    /// Target entity label, e.g. `customer`.
    #[serde(default)]
    pub entity: Option<String>,
    /// Attribute tags in any order.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub certainty: Certainty,
}

impl IntentSummary {
    pub fn new(action: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            entity: Some(entity.into()),
            attributes: Vec::new(),
            certainty: Certainty::default(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_certainty(mut self, certainty: Certainty) -> Self {
        self.certainty = certainty;
        self
    }

    /// Trimmed, lower-cased action label if present and non-empty.
    pub fn action_label(&self) -> Option<String> {
        normalize_label(self.action.as_deref())
    }

    /// Trimmed, lower-cased entity label if present and non-empty.
    pub fn entity_label(&self) -> Option<String> {
        normalize_label(self.entity.as_deref())
    }

    /// Attribute tags lower-cased, trimmed, de-duplicated and sorted.
    pub fn canonical_attributes(&self) -> Vec<String> {
        let mut attributes: Vec<String> = self
            .attributes
            .iter()
            .filter_map(|a| normalize_label(Some(a)))
            .collect();
        attributes.sort();
        attributes.dedup();
        attributes
    }

    /// A summary with neither action nor entity carries no usable signal.
    pub fn is_degenerate(&self) -> bool {
        self.action_label().is_none() && self.entity_label().is_none()
    }

    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action_label().map(|label| ActionKind::classify(&label))
    }
}

fn normalize_label(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Known action families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Search,
    Create,
    Update,
    Delete,
    Analyze,
    Report,
    Other(String),
}

impl ActionKind {
    /// Map a normalized action label onto a known family.
    pub fn classify(label: &str) -> Self {
        match label {
            "search" | "find" | "lookup" | "list" | "get" | "show" | "fetch" | "query" => {
                ActionKind::Search
            }
            "create" | "add" | "insert" | "register" | "new" => ActionKind::Create,
            "update" | "modify" | "edit" | "change" | "set" => ActionKind::Update,
            "delete" | "remove" | "drop" | "purge" => ActionKind::Delete,
            "analyze" | "analyse" | "aggregate" | "count" | "summarize" | "compare" => {
                ActionKind::Analyze
            }
            "report" | "export" | "print" | "download" => ActionKind::Report,
            other => ActionKind::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActionKind::Other(_))
    }

    pub fn category(&self) -> IntentCategory {
        match self {
            ActionKind::Search => IntentCategory::Retrieval,
            ActionKind::Create | ActionKind::Update | ActionKind::Delete => {
                IntentCategory::Mutation
            }
            ActionKind::Analyze => IntentCategory::Analysis,
            ActionKind::Report => IntentCategory::Reporting,
            ActionKind::Other(_) => IntentCategory::General,
        }
    }
}

/// Coarse category tag attached to an encoded intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Retrieval,
    Mutation,
    Analysis,
    Reporting,
    General,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Retrieval => "retrieval",
            IntentCategory::Mutation => "mutation",
            IntentCategory::Analysis => "analysis",
            IntentCategory::Reporting => "reporting",
            IntentCategory::General => "general",
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the encoder for one summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedIntent {
    pub vector: SemanticVector,
    pub regime: Regime,
    /// Harmonic mean of the per-field clarity signals, in `[0, 1]`.
    pub confidence: f64,
    pub category: IntentCategory,
    /// True when the summary carried no usable signal.
    pub degenerate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_normalized() {
        let summary = IntentSummary {
            action: Some("  Search ".into()),
            entity: Some("".into()),
            attributes: vec!["Name".into(), "email".into(), "name ".into(), " ".into()],
            certainty: Certainty::High,
        };
        assert_eq!(summary.action_label().as_deref(), Some("search"));
        assert_eq!(summary.entity_label(), None);
        assert_eq!(summary.canonical_attributes(), vec!["email", "name"]);
        assert!(!summary.is_degenerate());
    }

    #[test]
    fn test_degenerate_summary() {
        assert!(IntentSummary::default().is_degenerate());
        let blank = IntentSummary {
            action: Some("   ".into()),
            entity: None,
            attributes: vec!["x".into()],
            certainty: Certainty::High,
        };
        assert!(blank.is_degenerate());
    }

    #[test]
    fn test_action_classification() {
        assert_eq!(ActionKind::classify("find"), ActionKind::Search);
        assert_eq!(ActionKind::classify("purge"), ActionKind::Delete);
        assert_eq!(
            ActionKind::classify("teleport"),
            ActionKind::Other("teleport".into())
        );
        assert_eq!(ActionKind::Search.category(), IntentCategory::Retrieval);
        assert_eq!(ActionKind::Update.category(), IntentCategory::Mutation);
        assert!(!ActionKind::classify("teleport").is_known());
    }
}
