//! Rule model for Scripty user scripts.
//!
//! These types map directly to the stored rule records and replace the
//! stringly-typed identifier/condition/trigger fields with closed enums so
//! an invalid combination is unrepresentable past the deserialization
//! boundary.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

// =============================================================================
// Identifier Types
// =============================================================================

/// What part of the URL a rule's filter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    /// Raw match patterns (comma-separated list)
    Pattern,
    /// Full URL
    Url,
    /// Hostname only
    Host,
    /// Path only
    Path,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Url => "url",
            Self::Host => "host",
            Self::Path => "path",
        }
    }

    /// Parse from the wire string used by the UI and stored rules.
    pub fn parse(s: &str) -> Result<Self, MatchError> {
        match s {
            "pattern" => Ok(Self::Pattern),
            "url" => Ok(Self::Url),
            "host" => Ok(Self::Host),
            "path" => Ok(Self::Path),
            other => Err(MatchError::InvalidIdentifierType(other.to_string())),
        }
    }
}

// =============================================================================
// Match Conditions
// =============================================================================

/// How the filter value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Equals,
    Contains,
    Regex,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::Regex => "regex",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MatchError> {
        match s {
            "equals" => Ok(Self::Equals),
            "contains" => Ok(Self::Contains),
            "regex" => Ok(Self::Regex),
            other => Err(MatchError::InvalidMatchType {
                identifier: String::from("any"),
                condition: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Triggers
// =============================================================================

/// How a rule's snippet is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    /// Runs without user action when a matching page loads
    #[serde(rename = "a")]
    Automatic,
    /// Runs only when explicitly invoked from the popup
    #[serde(rename = "m")]
    Manual,
}

/// When an automatic rule fires during page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerValue {
    #[serde(rename = "pageload")]
    PageLoad,
    #[serde(rename = "beforeload")]
    BeforeLoad,
}

/// Injection timing passed to the script host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAt {
    DocumentStart,
    DocumentEnd,
}

impl RunAt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentStart => "document_start",
            Self::DocumentEnd => "document_end",
        }
    }
}

impl From<TriggerValue> for RunAt {
    fn from(value: TriggerValue) -> Self {
        match value {
            TriggerValue::BeforeLoad => Self::DocumentStart,
            TriggerValue::PageLoad => Self::DocumentEnd,
        }
    }
}

/// Trigger mode of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: TriggerType,
    pub value: TriggerValue,
}

// =============================================================================
// Rule Records
// =============================================================================

/// URL filter of a rule.
///
/// `matches` holds the match patterns generated from the other three fields
/// at save time; it is persisted with the rule and re-checked against live
/// tab URLs on every navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFilter {
    pub identifier: IdentifierType,
    pub condition: MatchType,
    pub value: String,
    #[serde(default)]
    pub matches: Vec<String>,
}

/// The user's JavaScript snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSource {
    pub value: String,
}

/// A complete user-authored rule: filter + snippet + trigger mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRule {
    pub id: String,
    pub title: String,
    pub filter: RuleFilter,
    pub trigger: Trigger,
    #[serde(rename = "script")]
    pub source: ScriptSource,
    #[serde(default, rename = "disable")]
    pub disabled: bool,
}

impl ScriptRule {
    /// True when the rule runs without user action on matching pages.
    pub fn is_automatic(&self) -> bool {
        self.trigger.kind == TriggerType::Automatic
    }

    /// Injection timing derived from the trigger value.
    pub fn run_at(&self) -> RunAt {
        if self.is_automatic() {
            RunAt::from(self.trigger.value)
        } else {
            RunAt::DocumentEnd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_rule_json() -> &'static str {
        r#"{
            "id": "script_1700000000000",
            "title": "Hide sidebar",
            "filter": {
                "identifier": "host",
                "condition": "equals",
                "value": "example.com",
                "matches": ["*://example.com/*"]
            },
            "trigger": { "type": "a", "value": "pageload" },
            "script": { "value": "document.querySelector('aside').remove();" },
            "disable": false
        }"#
    }

    #[test]
    fn test_deserialize_stored_rule() {
        let rule: ScriptRule = serde_json::from_str(stored_rule_json()).unwrap();
        assert_eq!(rule.id, "script_1700000000000");
        assert_eq!(rule.filter.identifier, IdentifierType::Host);
        assert_eq!(rule.filter.condition, MatchType::Equals);
        assert_eq!(rule.filter.matches, vec!["*://example.com/*"]);
        assert_eq!(rule.trigger.kind, TriggerType::Automatic);
        assert_eq!(rule.trigger.value, TriggerValue::PageLoad);
        assert!(!rule.disabled);
    }

    #[test]
    fn test_missing_matches_defaults_empty() {
        let json = r#"{
            "id": "script_2",
            "title": "t",
            "filter": { "identifier": "url", "condition": "contains", "value": "x" },
            "trigger": { "type": "m", "value": "pageload" },
            "script": { "value": "" }
        }"#;
        let rule: ScriptRule = serde_json::from_str(json).unwrap();
        assert!(rule.filter.matches.is_empty());
        assert!(!rule.disabled);
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        assert!(IdentifierType::parse("hostname").is_err());
        let json = r#"{ "identifier": "hostname", "condition": "equals", "value": "x" }"#;
        assert!(serde_json::from_str::<RuleFilter>(json).is_err());
    }

    #[test]
    fn test_run_at_from_trigger() {
        assert_eq!(RunAt::from(TriggerValue::BeforeLoad), RunAt::DocumentStart);
        assert_eq!(RunAt::from(TriggerValue::PageLoad), RunAt::DocumentEnd);
        assert_eq!(RunAt::DocumentStart.as_str(), "document_start");
    }

    #[test]
    fn test_serialize_round_trip() {
        let rule: ScriptRule = serde_json::from_str(stored_rule_json()).unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        let back: ScriptRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
