//! Snippet preparation for injection
//!
//! Before a snippet is handed to the injection host its source is cleaned
//! (comments and blank lines stripped) and bundled with the metadata the
//! host needs: the match-pattern list, the execution world, and the
//! injection timing derived from the rule's trigger.

use std::sync::OnceLock;

use regex::Regex;
use scripty_core::{RunAt, ScriptRule};

/// Execution world for injected snippets. User scripts run in the page's
/// own context, not the extension's isolated world.
pub const WORLD_MAIN: &str = "MAIN";

/// An injection-ready snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedScript {
    pub id: String,
    pub title: String,
    /// Match patterns restricting where the host may inject this snippet.
    pub matches: Vec<String>,
    pub run_at: RunAt,
    pub world: &'static str,
    /// Cleaned snippet source.
    pub code: String,
}

impl PreparedScript {
    /// Build an injection-ready record from a rule and its generated
    /// pattern list.
    pub fn from_rule(rule: &ScriptRule, matches: Vec<String>) -> Self {
        Self {
            id: rule.id.clone(),
            title: rule.title.clone(),
            matches,
            run_at: rule.run_at(),
            world: WORLD_MAIN,
            code: clean_source(&rule.source.value),
        }
    }
}

/// Strip HTML comments, line comments, block comments, and blank lines
/// from snippet source.
///
/// Line comments are removed only when preceded by whitespace or line
/// start, so `https://` inside a statement survives.
pub fn clean_source(code: &str) -> String {
    static HTML_COMMENT: OnceLock<Regex> = OnceLock::new();
    static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
    static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();

    let html = HTML_COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment regex"));
    let line =
        LINE_COMMENT.get_or_init(|| Regex::new(r"(?m)(^|\s)//[^\n]*").expect("line comment regex"));
    let block =
        BLOCK_COMMENT.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex"));
    let blank = BLANK_LINE.get_or_init(|| Regex::new(r"(?m)^\s*\n").expect("blank line regex"));

    let code = html.replace_all(code, "");
    let code = line.replace_all(&code, "$1");
    let code = block.replace_all(&code, "");
    blank.replace_all(&code, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripty_core::{
        IdentifierType, MatchType, RuleFilter, ScriptSource, Trigger, TriggerType, TriggerValue,
    };

    #[test]
    fn test_clean_strips_line_comments() {
        let cleaned = clean_source("let x = 1; // trailing\n// whole line\nlet y = 2;\n");
        assert_eq!(cleaned, "let x = 1; \nlet y = 2;\n");
    }

    #[test]
    fn test_clean_keeps_urls_in_code() {
        let cleaned = clean_source("fetch('https://a.com/x');\n");
        assert_eq!(cleaned, "fetch('https://a.com/x');\n");
    }

    #[test]
    fn test_clean_strips_block_and_html_comments() {
        let cleaned = clean_source("<!-- note -->a;/* multi\nline */b;\n");
        assert_eq!(cleaned, "a;b;\n");
    }

    #[test]
    fn test_clean_comment_only_input_is_empty() {
        assert_eq!(clean_source("// nothing here\n"), "");
        assert_eq!(clean_source("/* gone */\n"), "");
    }

    #[test]
    fn test_prepare_uses_trigger_timing() {
        let mut rule = ScriptRule {
            id: String::from("script_1"),
            title: String::from("t"),
            filter: RuleFilter {
                identifier: IdentifierType::Host,
                condition: MatchType::Equals,
                value: String::from("a.com"),
                matches: vec![],
            },
            trigger: Trigger {
                kind: TriggerType::Automatic,
                value: TriggerValue::BeforeLoad,
            },
            source: ScriptSource {
                value: String::from("go();"),
            },
            disabled: false,
        };

        let prepared = PreparedScript::from_rule(&rule, vec![String::from("*://a.com/*")]);
        assert_eq!(prepared.run_at, RunAt::DocumentStart);
        assert_eq!(prepared.world, WORLD_MAIN);
        assert_eq!(prepared.code, "go();");

        rule.trigger.value = TriggerValue::PageLoad;
        let prepared = PreparedScript::from_rule(&rule, vec![]);
        assert_eq!(prepared.run_at, RunAt::DocumentEnd);
    }
}
