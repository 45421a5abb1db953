//! Scripty CLI
//!
//! Developer tool for working with Scripty rules: generate match patterns
//! from filter fields, validate patterns, and test URLs against patterns or
//! a stored rule file.

use clap::{Parser, Subcommand};

use scripty_core::{IdentifierType, MatchType, TriggerType};
use scripty_registry::{Config, RuleStore};

#[derive(Parser)]
#[command(name = "scripty-cli")]
#[command(about = "Scripty rule and pattern tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate match patterns from a rule's filter fields
    Generate {
        /// Identifier type: pattern, url, host, or path
        #[arg(short = 't', long, default_value = "pattern")]
        identifier_type: String,

        /// Match condition: equals, contains, or regex
        #[arg(short = 'c', long, default_value = "equals")]
        match_type: String,

        /// The identifier value (comma-separated for pattern/url)
        identifier: String,
    },

    /// Validate a match pattern
    Check {
        /// Pattern to validate
        pattern: String,
    },

    /// Test a URL against a single match pattern
    Match {
        /// URL to test
        #[arg(short, long)]
        url: String,

        /// Match pattern
        pattern: String,
    },

    /// List the rules in a store file available for a URL
    List {
        /// Rule store file (JSON)
        #[arg(short, long)]
        rules: String,

        /// Tab URL to evaluate against
        #[arg(short, long)]
        url: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            identifier_type,
            match_type,
            identifier,
        } => cmd_generate(&identifier_type, &match_type, &identifier),
        Commands::Check { pattern } => cmd_check(&pattern),
        Commands::Match { url, pattern } => cmd_match(&url, &pattern),
        Commands::List { rules, url } => cmd_list(&rules, &url),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_generate(identifier_type: &str, match_type: &str, identifier: &str) -> Result<(), String> {
    let identifier_type = IdentifierType::parse(identifier_type).map_err(|e| e.to_string())?;
    let match_type = MatchType::parse(match_type).map_err(|e| e.to_string())?;

    let patterns = scripty_core::generate(identifier_type, match_type, identifier)
        .map_err(|e| e.to_string())?;

    if patterns.is_empty() {
        return Err(format!("no valid patterns in {identifier:?}"));
    }
    for pattern in patterns {
        println!("{pattern}");
    }
    Ok(())
}

fn cmd_check(pattern: &str) -> Result<(), String> {
    if scripty_core::is_valid_pattern(pattern) {
        println!("{pattern}: valid");
        Ok(())
    } else {
        Err(format!("{pattern}: not a valid match pattern"))
    }
}

fn cmd_match(url: &str, pattern: &str) -> Result<(), String> {
    let matched = scripty_core::match_pattern(url, pattern).map_err(|e| e.to_string())?;
    println!("{url} {} {pattern}", if matched { "matches" } else { "does not match" });
    if !matched {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_list(rules_path: &str, url: &str) -> Result<(), String> {
    let config = Config::default();
    let store =
        RuleStore::open(rules_path, &config.storage_key_prefix).map_err(|e| e.to_string())?;

    let rules: Vec<_> = store.rules().cloned().collect();
    let available = scripty_core::scripts_for_url(&rules, url).map_err(|e| e.to_string())?;

    if available.is_empty() {
        println!("no rules available for {url}");
        return Ok(());
    }

    println!("{} rule(s) available for {url}:", available.len());
    for rule in available {
        let mode = match rule.trigger.kind {
            TriggerType::Manual => "manual",
            TriggerType::Automatic => "auto",
        };
        println!("  {} [{}] {}", rule.id, mode, rule.title);
    }
    Ok(())
}
