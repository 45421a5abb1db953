//! Script manager
//!
//! Owns the rule store, the prepared-script registry, and the injection
//! host. Saving a rule regenerates its match patterns and re-registers the
//! snippet; deleting tears all of it down. The prepared-script map keyed by
//! rule id is the single source of truth for what is currently injectable.

use std::collections::HashMap;
use std::path::Path;

use scripty_core::{generate, matcher, IdentifierType, MatchError, ScriptRule, MATCH_ALL};

use crate::config::Config;
use crate::host::{HostError, InjectionHost};
use crate::prepare::PreparedScript;
use crate::store::{RuleStore, StoreError};

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("rule {0:?} not found")]
    RuleNotFound(String),
    #[error("rule {0:?} is disabled")]
    RuleDisabled(String),
    #[error("rule {0:?} is stored but not registered with the host")]
    RuleNotRegistered(String),
}

/// Registration bookkeeping around the pattern matcher.
pub struct ScriptManager<H: InjectionHost> {
    config: Config,
    store: RuleStore,
    host: H,
    /// Prepared snippets keyed by rule id, inserted on create/update and
    /// removed on delete.
    prepared: HashMap<String, PreparedScript>,
}

impl<H: InjectionHost> ScriptManager<H> {
    /// Open the store at `path` with the configured key prefix and build a
    /// manager over it.
    pub fn open(config: Config, path: impl AsRef<Path>, host: H) -> Result<Self, RegistryError> {
        let store = RuleStore::open(path, &config.storage_key_prefix)?;
        Ok(Self::new(config, store, host))
    }

    /// Build a manager over an already opened store and register every
    /// enabled rule with the host.
    ///
    /// A rule that fails to register is logged and skipped; one broken rule
    /// must not keep the rest from loading.
    pub fn new(config: Config, store: RuleStore, host: H) -> Self {
        let mut manager = Self {
            config,
            store,
            host,
            prepared: HashMap::new(),
        };

        let startup: Vec<ScriptRule> = manager.store.rules().cloned().collect();
        for rule in startup {
            if rule.disabled {
                continue;
            }
            if let Err(e) = manager.register_prepared(&rule, rule.filter.matches.clone()) {
                log::error!("failed to register rule {}: {e}", rule.id);
            }
        }
        manager
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All stored rules, ordered by id.
    pub fn rules(&self) -> Vec<&ScriptRule> {
        self.store.rules().collect()
    }

    /// Create or update a rule.
    ///
    /// Regenerates the match-pattern list from the filter fields, persists
    /// it with the rule, and (re-)registers the snippet with the host.
    /// Saving a disabled rule unregisters it instead.
    pub fn save_rule(&mut self, mut rule: ScriptRule) -> Result<ScriptRule, RegistryError> {
        if rule.disabled {
            self.host.unregister(&rule.id)?;
            self.prepared.remove(&rule.id);
            self.store.save(rule.clone())?;
            log::debug!("rule {} saved disabled", rule.id);
            return Ok(rule);
        }

        // The "all"/empty sentinel matches every page; register it on the
        // catch-all pattern rather than running it through `generate`.
        let matches = if rule.filter.value.is_empty() || rule.filter.value == MATCH_ALL {
            vec![self.config.default_pattern.clone()]
        } else {
            generate(
                rule.filter.identifier,
                rule.filter.condition,
                &rule.filter.value,
            )?
        };

        // Pattern/url rules rely entirely on the generated list; an empty
        // one would silently never fire, so reject it at save time.
        if matches.is_empty()
            && matches!(
                rule.filter.identifier,
                IdentifierType::Pattern | IdentifierType::Url
            )
        {
            return Err(MatchError::NoPatternsGenerated(rule.filter.value.clone()).into());
        }

        rule.filter.matches = matches.clone();
        self.register_prepared(&rule, matches)?;
        self.store.save(rule.clone())?;
        log::debug!("rule {} saved with {} patterns", rule.id, rule.filter.matches.len());
        Ok(rule)
    }

    fn register_prepared(
        &mut self,
        rule: &ScriptRule,
        matches: Vec<String>,
    ) -> Result<(), RegistryError> {
        let prepared = PreparedScript::from_rule(rule, matches);
        if self.prepared.contains_key(&rule.id) {
            self.host.update(&prepared)?;
        } else {
            self.host.register(&prepared)?;
        }
        self.prepared.insert(rule.id.clone(), prepared);
        Ok(())
    }

    /// Delete a rule from the host, the prepared registry, and the store.
    /// Deleting an unknown id is a no-op.
    pub fn delete_rule(&mut self, id: &str) -> Result<(), RegistryError> {
        self.host.unregister(id)?;
        self.prepared.remove(id);
        if self.store.remove(id)?.is_none() {
            log::debug!("delete of unknown rule {id}");
        }
        Ok(())
    }

    /// Rules available for a tab URL, popup-listing semantics: every
    /// enabled manual rule plus matching enabled automatic rules.
    pub fn scripts_for_url(&self, url: &str) -> Result<Vec<&ScriptRule>, RegistryError> {
        if url.is_empty() {
            return Ok(Vec::new());
        }
        let parsed = scripty_core::url::parse_url(url)?;
        if parsed.scheme == "chrome" {
            return Ok(Vec::new());
        }

        let mut available = Vec::new();
        for rule in self.store.rules() {
            match matcher::rule_matches_url(rule, url) {
                Ok(true) => available.push(rule),
                Ok(false) => {}
                Err(e) => log::warn!("skipping rule {}: {e}", rule.id),
            }
        }
        Ok(available)
    }

    /// Enabled automatic rules whose stored patterns match a navigation
    /// URL. Evaluation errors skip the rule.
    pub fn rules_to_run(&self, url: &str) -> Vec<&ScriptRule> {
        self.store
            .rules()
            .filter(|rule| rule.is_automatic() && !rule.disabled)
            .filter(|rule| match matcher::filter_matches_url(&rule.filter, url) {
                Ok(matched) => matched,
                Err(e) => {
                    log::warn!("skipping rule {} on navigation: {e}", rule.id);
                    false
                }
            })
            .collect()
    }

    /// Run every matching automatic rule for a completed navigation.
    ///
    /// Execution failures are isolated per rule: a snippet that throws is
    /// logged and the remaining snippets still run. Returns the number of
    /// snippets that ran.
    pub fn run_for_navigation(&mut self, url: &str) -> usize {
        let ids: Vec<String> = self.rules_to_run(url).iter().map(|r| r.id.clone()).collect();

        let mut ran = 0;
        for id in ids {
            let Some(prepared) = self.prepared.get(&id) else {
                log::warn!("rule {id} matched but is not registered");
                continue;
            };
            match self.host.execute(prepared) {
                Ok(()) => ran += 1,
                Err(e) => log::error!("failed to execute rule {id}: {e}"),
            }
        }
        ran
    }

    /// Run one rule on explicit user request (the popup button).
    pub fn execute_rule(&mut self, id: &str) -> Result<(), RegistryError> {
        let rule = self
            .store
            .get(id)
            .ok_or_else(|| RegistryError::RuleNotFound(id.to_string()))?;
        if rule.disabled {
            return Err(RegistryError::RuleDisabled(id.to_string()));
        }
        // Stored but missing from the prepared map means startup
        // registration failed for this rule.
        let prepared = self
            .prepared
            .get(id)
            .ok_or_else(|| RegistryError::RuleNotRegistered(id.to_string()))?;
        self.host.execute(prepared).map_err(|e| {
            log::error!("failed to execute rule {id}: {e}");
            RegistryError::Host(e)
        })
    }

    /// Host access for callers that need to inspect it (tests, shutdown).
    pub fn host(&self) -> &H {
        &self.host
    }
}
