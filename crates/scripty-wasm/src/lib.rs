//! WebAssembly bindings for the Scripty matching core
//!
//! The extension's popup, options page, and background worker call into
//! these functions; validation errors come back as string `JsValue`s for
//! inline display in the editor UI.

use wasm_bindgen::prelude::*;

use scripty_core::{IdentifierType, MatchType, ScriptRule};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Generate the match-pattern list for a rule's filter fields.
/// Returns a JS array of pattern strings.
#[wasm_bindgen]
pub fn generate_patterns(
    identifier_type: &str,
    match_type: &str,
    identifier: &str,
) -> Result<JsValue, JsValue> {
    let identifier_type = IdentifierType::parse(identifier_type).map_err(js_err)?;
    let match_type = MatchType::parse(match_type).map_err(js_err)?;

    let patterns =
        scripty_core::generate(identifier_type, match_type, identifier).map_err(js_err)?;

    let array = js_sys::Array::new_with_length(patterns.len() as u32);
    for (i, pattern) in patterns.iter().enumerate() {
        array.set(i as u32, JsValue::from_str(pattern));
    }
    Ok(array.into())
}

/// Check whether a raw pattern is in valid `scheme://host/path` form.
#[wasm_bindgen]
pub fn is_valid_pattern(pattern: &str) -> bool {
    scripty_core::is_valid_pattern(pattern)
}

/// Test a URL against a single match pattern.
#[wasm_bindgen]
pub fn match_pattern(url: &str, pattern: &str) -> Result<bool, JsValue> {
    scripty_core::match_pattern(url, pattern).map_err(js_err)
}

/// Popup listing: ids of the rules available for a tab URL.
///
/// `rules_json` is the stored rule array serialized to JSON.
#[wasm_bindgen]
pub fn scripts_for_url(rules_json: &str, url: &str) -> Result<JsValue, JsValue> {
    let rules: Vec<ScriptRule> = serde_json::from_str(rules_json).map_err(js_err)?;
    let available = scripty_core::scripts_for_url(&rules, url).map_err(js_err)?;

    let array = js_sys::Array::new_with_length(available.len() as u32);
    for (i, rule) in available.iter().enumerate() {
        array.set(i as u32, JsValue::from_str(&rule.id));
    }
    Ok(array.into())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn test_generate_patterns_host() {
        let result = super::generate_patterns("host", "equals", "x.com").unwrap();
        let array = js_sys::Array::from(&result);
        assert_eq!(array.length(), 1);
        assert_eq!(array.get(0).as_string().unwrap(), "*://x.com/*");
    }

    #[wasm_bindgen_test]
    fn test_generate_patterns_rejects_bad_type() {
        assert!(super::generate_patterns("hostname", "equals", "x.com").is_err());
        assert!(super::generate_patterns("host", "contains", "x.com").is_err());
    }

    #[wasm_bindgen_test]
    fn test_match_pattern() {
        assert!(super::match_pattern("https://x.com/foo", "*://*.com/*").unwrap());
        assert!(!super::match_pattern("https://x.org/foo", "*://*.com/*").unwrap());
        assert!(super::match_pattern("not a url", "*://*/*").is_err());
    }
}
