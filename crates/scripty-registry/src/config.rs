//! Registry configuration.
//!
//! An explicit value handed to [`crate::ScriptManager`] at construction;
//! nothing in this crate reads ambient global state.

/// Configuration for the script manager.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix identifying rule records in the store (ids not carrying it
    /// are ignored on load).
    pub storage_key_prefix: String,
    /// Pattern offered to the editor for new rules.
    pub default_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key_prefix: String::from("script_"),
            default_pattern: String::from("*://*/*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage_key_prefix, "script_");
        assert!(scripty_core::is_valid_pattern(&config.default_pattern));
    }
}
