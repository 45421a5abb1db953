//! Rule evaluation against live URLs
//!
//! Used by the popup listing and the navigation hook: given the stored
//! rules and the current tab URL, decide which rules are available to run.

use regex::{Regex, RegexBuilder};

use crate::error::MatchError;
use crate::pattern::match_pattern;
use crate::rule::{IdentifierType, MatchType, RuleFilter, ScriptRule};
use crate::url::parse_url;

/// Filter value meaning "match every page". An empty value means the same.
pub const MATCH_ALL: &str = "all";

// =============================================================================
// Rule Evaluation
// =============================================================================

/// Decide whether a rule applies to a URL.
///
/// Disabled rules never match. Manual-trigger rules are available on every
/// page (the popup always lists them). Automatic rules match when the filter
/// is the `all`/empty sentinel, when any stored pattern matches, or when the
/// raw condition holds against the relevant URL component.
pub fn rule_matches_url(rule: &ScriptRule, url: &str) -> Result<bool, MatchError> {
    if rule.disabled {
        return Ok(false);
    }
    if !rule.is_automatic() {
        return Ok(true);
    }
    filter_matches_url(&rule.filter, url)
}

/// Evaluate an automatic rule's filter against a URL.
pub fn filter_matches_url(filter: &RuleFilter, url: &str) -> Result<bool, MatchError> {
    if filter.value.is_empty() || filter.value == MATCH_ALL {
        return Ok(true);
    }

    // Pattern rules only ever carry generated patterns; host/path rules use
    // them when present (they are regenerated at every save).
    let use_patterns = match filter.identifier {
        IdentifierType::Pattern => true,
        IdentifierType::Host | IdentifierType::Path => !filter.matches.is_empty(),
        IdentifierType::Url => false,
    };

    if use_patterns {
        return any_pattern_matches(&filter.matches, url);
    }

    let parsed = parse_url(url)?;
    let component = match filter.identifier {
        IdentifierType::Url | IdentifierType::Pattern => url,
        IdentifierType::Host => parsed.host,
        IdentifierType::Path => parsed.path,
    };

    match filter.condition {
        MatchType::Contains => Ok(component.contains(&filter.value)),
        MatchType::Equals => Ok(component == filter.value),
        MatchType::Regex => Ok(parse_regex_literal(&filter.value)?.is_match(component)),
    }
}

fn any_pattern_matches(patterns: &[String], url: &str) -> Result<bool, MatchError> {
    for pattern in patterns {
        if match_pattern(url, pattern)? {
            return Ok(true);
        }
    }
    Ok(false)
}

// =============================================================================
// Regex Filter Literals
// =============================================================================

/// Parse a `/body/flags` literal into a compiled regex.
///
/// The stored value must be in JS regex-literal form. The `i`, `m`, and `s`
/// flags map onto the engine; `g`, `u`, and `y` are accepted and ignored
/// since they do not change the outcome of a single membership test.
pub fn parse_regex_literal(value: &str) -> Result<Regex, MatchError> {
    let invalid = |value: &str| MatchError::InvalidRegex {
        value: value.to_string(),
        source: regex::Error::Syntax(format!("expected /body/flags literal, got {value:?}")),
    };

    let rest = value.strip_prefix('/').ok_or_else(|| invalid(value))?;
    let slash = rest.rfind('/').ok_or_else(|| invalid(value))?;
    let (body, flags) = (&rest[..slash], &rest[slash + 1..]);

    if !flags.chars().all(|c| "gimsuy".contains(c)) {
        return Err(invalid(value));
    }

    RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|e| MatchError::InvalidRegex {
            value: value.to_string(),
            source: e,
        })
}

// =============================================================================
// Popup Listing
// =============================================================================

/// Rules available for the current tab: every enabled manual rule, plus the
/// enabled automatic rules matching the URL.
///
/// Privileged `chrome://` pages and empty URLs list nothing. A rule whose
/// filter fails to evaluate (e.g. a bad regex literal) is skipped with a
/// warning so one broken rule cannot empty the popup.
pub fn scripts_for_url<'a>(
    rules: &'a [ScriptRule],
    url: &str,
) -> Result<Vec<&'a ScriptRule>, MatchError> {
    if url.is_empty() {
        return Ok(Vec::new());
    }

    let parsed = parse_url(url)?;
    if parsed.scheme == "chrome" {
        return Ok(Vec::new());
    }

    let mut available = Vec::new();
    for rule in rules {
        match rule_matches_url(rule, url) {
            Ok(true) => available.push(rule),
            Ok(false) => {}
            Err(e) => log::warn!("skipping rule {}: {e}", rule.id),
        }
    }
    Ok(available)
}
