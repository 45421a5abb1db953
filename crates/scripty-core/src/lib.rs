//! Scripty Core Library
//!
//! This crate provides the URL pattern matching engine for the Scripty
//! user-script manager. A user rule describes which pages a snippet runs on;
//! this crate turns the rule into concrete `scheme://host/path` match
//! patterns and tests live URLs against them.
//!
//! # Architecture
//!
//! Everything here is pure and synchronous: no I/O, no shared mutable state.
//! The registration bookkeeping (scripty-registry) feeds rule fields in and
//! consumes the generated pattern lists; callers may invoke the matcher from
//! any concurrency context without locking.
//!
//! # Modules
//!
//! - `rule`: the rule model (identifier/condition/trigger enums and records)
//! - `url`: URL decomposition without allocations
//! - `pattern`: match-pattern generation and URL-vs-pattern matching
//! - `matcher`: whole-rule evaluation against a URL
//! - `error`: the validation error taxonomy

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod rule;
pub mod url;

// Re-export commonly used types
pub use error::MatchError;
pub use matcher::{rule_matches_url, scripts_for_url, MATCH_ALL};
pub use pattern::{generate, is_valid_pattern, match_pattern};
pub use rule::{
    IdentifierType, MatchType, RuleFilter, RunAt, ScriptRule, ScriptSource, Trigger, TriggerType,
    TriggerValue,
};
