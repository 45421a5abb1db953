//! JSON-backed rule store
//!
//! Rules persist as a single JSON object keyed by rule id, mirroring the
//! flat key/value layout of the extension's local storage area. The whole
//! map is held in memory and rewritten on every mutation; rule sets are
//! small (tens of entries) so this stays simple.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use scripty_core::ScriptRule;

/// Error type for store I/O.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistent store of rule records.
pub struct RuleStore {
    path: PathBuf,
    records: BTreeMap<String, ScriptRule>,
}

impl RuleStore {
    /// Open a store file, creating an empty store if the file is missing.
    ///
    /// Records whose id does not start with `key_prefix` are dropped on
    /// load; the storage area may hold unrelated entries.
    pub fn open(path: impl AsRef<Path>, key_prefix: &str) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let data = fs::read_to_string(&path)?;
            let raw: BTreeMap<String, ScriptRule> = serde_json::from_str(&data)?;
            let before = raw.len();
            let records: BTreeMap<_, _> = raw
                .into_iter()
                .filter(|(id, _)| id.starts_with(key_prefix))
                .collect();
            if records.len() < before {
                log::debug!("ignored {} non-rule entries in store", before - records.len());
            }
            records
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, records })
    }

    /// All stored rules, ordered by id.
    pub fn rules(&self) -> impl Iterator<Item = &ScriptRule> {
        self.records.values()
    }

    pub fn get(&self, id: &str) -> Option<&ScriptRule> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace a rule and persist.
    pub fn save(&mut self, rule: ScriptRule) -> Result<(), StoreError> {
        self.records.insert(rule.id.clone(), rule);
        self.persist()
    }

    /// Remove a rule and persist. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Result<Option<ScriptRule>, StoreError> {
        let removed = self.records.remove(id);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripty_core::{
        IdentifierType, MatchType, RuleFilter, ScriptSource, Trigger, TriggerType, TriggerValue,
    };

    fn sample_rule(id: &str) -> ScriptRule {
        ScriptRule {
            id: id.to_string(),
            title: String::from("sample"),
            filter: RuleFilter {
                identifier: IdentifierType::Host,
                condition: MatchType::Equals,
                value: String::from("a.com"),
                matches: vec![String::from("*://a.com/*")],
            },
            trigger: Trigger {
                kind: TriggerType::Automatic,
                value: TriggerValue::PageLoad,
            },
            source: ScriptSource {
                value: String::from("console.log(1);"),
            },
            disabled: false,
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::open(dir.path().join("rules.json"), "script_").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut store = RuleStore::open(&path, "script_").unwrap();
        store.save(sample_rule("script_1")).unwrap();
        store.save(sample_rule("script_2")).unwrap();

        let reloaded = RuleStore::open(&path, "script_").unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("script_1").unwrap().filter.value, "a.com");
    }

    #[test]
    fn test_load_filters_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut store = RuleStore::open(&path, "").unwrap();
        store.save(sample_rule("script_1")).unwrap();
        store.save(sample_rule("unrelated_1")).unwrap();

        let reloaded = RuleStore::open(&path, "script_").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get("unrelated_1").is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut store = RuleStore::open(&path, "script_").unwrap();
        store.save(sample_rule("script_1")).unwrap();
        assert!(store.remove("script_1").unwrap().is_some());
        assert!(store.remove("script_1").unwrap().is_none());

        let reloaded = RuleStore::open(&path, "script_").unwrap();
        assert!(reloaded.is_empty());
    }
}
