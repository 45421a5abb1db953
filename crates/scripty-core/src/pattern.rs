//! Match-pattern generation and URL matching
//!
//! A match pattern is a `scheme://host/path` string where each segment may
//! contain `*` wildcards; the scheme is `*`, `http`, `https`, or `file`.
//! Rules are converted into a list of these patterns once at save time, and
//! live tab URLs are tested against the stored list on every navigation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::MatchError;
use crate::rule::{IdentifierType, MatchType};
use crate::url::parse_url;

// =============================================================================
// Pattern Validation
// =============================================================================

/// Validator for raw user-supplied patterns.
fn validator() -> &'static Regex {
    static VALIDATOR: OnceLock<Regex> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        Regex::new(r"^(\*|https?|http|file)://(\*|\*\.[^/*]+|[^/*]+)/(.*)?$")
            .expect("pattern validator regex")
    })
}

/// Check whether a raw pattern is in `scheme://host/path` form.
pub fn is_valid_pattern(pattern: &str) -> bool {
    validator().is_match(pattern)
}

// =============================================================================
// Pattern Generation
// =============================================================================

/// Translate a rule's filter fields into concrete match patterns.
///
/// - `pattern`/`url`: the identifier is a comma-separated list of raw
///   patterns; entries failing [`is_valid_pattern`] are dropped, so the
///   result may be empty.
/// - `host` requires the `equals` condition and yields `*://{host}/*`.
/// - `path` with `equals` yields `*://*{path}` (a leading `/` is added if
///   missing); with `contains` it yields `*://*/*{value}*`.
///
/// Pure function of its inputs: identical calls yield identical sequences.
pub fn generate(
    identifier_type: IdentifierType,
    match_type: MatchType,
    identifier: &str,
) -> Result<Vec<String>, MatchError> {
    match identifier_type {
        IdentifierType::Pattern | IdentifierType::Url => Ok(identifier
            .split(',')
            .map(str::trim)
            .filter(|part| is_valid_pattern(part))
            .map(str::to_string)
            .collect()),
        IdentifierType::Host => match match_type {
            MatchType::Equals => Ok(vec![format!("*://{identifier}/*")]),
            other => Err(invalid_match_type(identifier_type, other)),
        },
        IdentifierType::Path => match match_type {
            MatchType::Equals => {
                let path = if identifier.starts_with('/') {
                    identifier.to_string()
                } else {
                    format!("/{identifier}")
                };
                Ok(vec![format!("*://*{path}")])
            }
            MatchType::Contains => Ok(vec![format!("*://*/*{identifier}*")]),
            other => Err(invalid_match_type(identifier_type, other)),
        },
    }
}

fn invalid_match_type(identifier: IdentifierType, condition: MatchType) -> MatchError {
    MatchError::InvalidMatchType {
        identifier: identifier.as_str().to_string(),
        condition: condition.as_str().to_string(),
    }
}

// =============================================================================
// URL Matching
// =============================================================================

/// Compile a pattern segment into an anchored regex.
///
/// Only `*` is a wildcard (matching any run of characters, including none).
/// Every other character is literal: `.`, `?`, `+` and the rest of the regex
/// metacharacters are escaped before compilation.
fn segment_regex(segment: &str) -> Result<Regex, MatchError> {
    let mut source = String::with_capacity(segment.len() + 8);
    source.push('^');
    for c in segment.chars() {
        if c == '*' {
            source.push_str(".*");
        } else {
            let mut buf = [0u8; 4];
            source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| MatchError::InvalidRegex {
        value: segment.to_string(),
        source: e,
    })
}

/// Test a concrete URL against a single match pattern.
///
/// Matching is whole-string anchored on the hostname and pathname, never a
/// prefix test. A malformed URL is an [`MatchError::InvalidUrl`]; a pattern
/// without a `scheme://` separator simply never matches.
pub fn match_pattern(url: &str, pattern: &str) -> Result<bool, MatchError> {
    let parsed = parse_url(url)?;

    let (scheme, rest) = match pattern.split_once("://") {
        Some(parts) => parts,
        None => {
            log::debug!("pattern {pattern:?} has no scheme separator, skipping");
            return Ok(false);
        }
    };

    let (host, path) = match rest.split_once('/') {
        Some((host, path_rest)) => (host, format!("/{path_rest}")),
        None => (rest, String::from("/")),
    };

    if scheme != "*" && scheme != parsed.scheme {
        return Ok(false);
    }
    if !segment_regex(host)?.is_match(parsed.host) {
        return Ok(false);
    }
    Ok(segment_regex(&path)?.is_match(parsed.path))
}
