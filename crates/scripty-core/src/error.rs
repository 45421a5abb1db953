//! Validation error taxonomy.
//!
//! Every variant is a recoverable input error: the save/edit UI surfaces it
//! and asks the user to correct the rule. Nothing here is fatal to the
//! extension process.

/// Error type for pattern generation and URL matching.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid identifier type {0:?} (must be \"pattern\", \"url\", \"host\", or \"path\")")]
    InvalidIdentifierType(String),

    #[error("invalid match type {condition:?} for identifier type {identifier:?}")]
    InvalidMatchType {
        identifier: String,
        condition: String,
    },

    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    #[error("invalid regex filter {value:?}: {source}")]
    InvalidRegex {
        value: String,
        #[source]
        source: regex::Error,
    },

    #[error("no valid match patterns generated from {0:?}")]
    NoPatternsGenerated(String),
}
