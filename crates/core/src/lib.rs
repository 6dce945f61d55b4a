//! medsearch — medicine search and pharmacy price comparison.
//!
//! This crate provides the core library for medsearch: it queries a remote
//! pharmacy search endpoint, decodes the per-result nested price catalog, and
//! resolves the lowest selling price for a chosen form/strength/packing
//! variant.
//!
//! # Modules
//!
//! - [`catalog`] — Nested form → strength → packing price catalog and selectors
//! - [`pricing`] — Lowest-price resolution over a catalog slice
//! - [`types`] — Wire model of the remote search response
//! - [`client`] — Blocking HTTP client for the search endpoint

pub mod catalog;
pub mod client;
pub mod pricing;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Search configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for the search client. Loaded from `.medsearch.toml`
/// or defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Base URL of the search backend.
    pub base_url: String,
    /// Pharmacy ids sent as the `pharmacyIds` query parameter.
    pub pharmacy_ids: Vec<u32>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backend.cappsule.co.in".to_string(),
            pharmacy_ids: vec![1, 2, 3],
            timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    /// Comma-joined pharmacy ids, the format the endpoint expects.
    pub fn pharmacy_ids_param(&self) -> String {
        self.pharmacy_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ---------------------------------------------------------------------------
// .medsearch.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.medsearch.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["base_url", "pharmacy_ids", "timeout_secs"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load search configuration from `.medsearch.toml` in the given directory.
///
/// Returns a [`SearchConfig`] with defaults merged with any overrides from the
/// config file. If the file doesn't exist or can't be parsed, returns defaults
/// with a warning. Unknown keys trigger a warning with a typo suggestion.
pub fn load_medsearch_config(dir: &Path) -> SearchConfig {
    let mut config = SearchConfig::default();
    let config_path = dir.join(".medsearch.toml");

    if config_path.exists() {
        debug!("Loading .medsearch.toml");
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(table) = content.parse::<toml::Table>() {
                // Validate keys — warn on unknown
                for key in table.keys() {
                    if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                        let suggestion =
                            KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k)).unwrap();
                        let dist = edit_distance(key, suggestion);
                        if dist <= 3 {
                            warn!(
                                key = key.as_str(),
                                suggestion = *suggestion,
                                "Unknown key in .medsearch.toml — did you mean '{suggestion}'?"
                            );
                        } else {
                            warn!(
                                key = key.as_str(),
                                "Unknown key in .medsearch.toml (known keys: {})",
                                KNOWN_CONFIG_KEYS.join(", ")
                            );
                        }
                    }
                }

                if let Some(url) = table.get("base_url").and_then(|v| v.as_str()) {
                    config.base_url = url.to_string();
                }

                if let Some(ids) = table.get("pharmacy_ids").and_then(|v| v.as_array()) {
                    let parsed: Vec<u32> = ids
                        .iter()
                        .filter_map(|v| v.as_integer())
                        .filter_map(|i| u32::try_from(i).ok())
                        .collect();
                    if !parsed.is_empty() {
                        config.pharmacy_ids = parsed;
                    }
                }

                if let Some(secs) = table.get("timeout_secs").and_then(|v| v.as_integer()) {
                    if secs > 0 {
                        config.timeout_secs = secs as u64;
                    }
                }
            } else {
                warn!("Failed to parse .medsearch.toml");
            }
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_backend_contract() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, "https://backend.cappsule.co.in");
        assert_eq!(config.pharmacy_ids_param(), "1,2,3");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_medsearch_config(dir.path()), SearchConfig::default());
    }

    #[test]
    fn config_file_overrides_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".medsearch.toml"),
            "base_url = \"http://localhost:9000\"\npharmacy_ids = [4, 7]\n",
        )
        .unwrap();
        let config = load_medsearch_config(dir.path());
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.pharmacy_ids_param(), "4,7");
        // timeout untouched
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".medsearch.toml"), "base_url = [unclosed").unwrap();
        assert_eq!(load_medsearch_config(dir.path()), SearchConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".medsearch.toml"),
            "base_uri = \"http://localhost:9000\"\n",
        )
        .unwrap();
        assert_eq!(load_medsearch_config(dir.path()), SearchConfig::default());
    }

    #[test]
    fn edit_distance_finds_near_misses() {
        assert_eq!(edit_distance("base_uri", "base_url"), 1);
        assert_eq!(edit_distance("timeout", "timeout_secs"), 5);
        assert_eq!(edit_distance("", "abc"), 3);
    }
}
