use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Canonical parameter name for the authentication token.
pub const API_KEY: &str = "api_key";
/// Canonical parameter name for the base URL.
pub const API_BASE: &str = "api_base";
/// Canonical parameter name for the provider type (`open_ai`, `azure`, ...).
pub const API_TYPE: &str = "api_type";
/// Canonical parameter name for the API version.
pub const API_VERSION: &str = "api_version";
/// Canonical parameter name for the organization id.
pub const ORGANIZATION: &str = "organization";

/// The five canonical parameter names, in translation-table order.
pub const CANONICAL_KEYS: [&str; 5] = [API_KEY, API_BASE, API_TYPE, API_VERSION, ORGANIZATION];

/// Key/value pairs read from an export script or the environment.
///
/// Entries keep the order in which a key first appeared; re-exporting a key
/// replaces its value in place. Unset directives are tracked separately and
/// never remove an entry, so a key can be both present and unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    entries: IndexMap<String, String>,
    unset: Vec<String>,
}

impl ParsedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over entries in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys named by `unset` directives, in script order. Duplicates are kept.
    pub fn unset(&self) -> &[String] {
        &self.unset
    }

    pub fn push_unset(&mut self, key: impl Into<String>) {
        self.unset.push(key.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParsedConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = ParsedConfig::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

/// Resolved provider parameters keyed by canonical name.
///
/// Besides the five canonical keys this may hold free-form passthrough keys
/// (e.g. `request_timeout`) carried over unchanged from the script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedParams {
    values: BTreeMap<String, String>,
}

impl NormalizedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries that are not one of the canonical keys.
    pub fn passthrough(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !CANONICAL_KEYS.contains(k))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.get(API_KEY)
    }

    pub fn api_base(&self) -> Option<&str> {
        self.get(API_BASE)
    }

    pub fn api_type(&self) -> Option<&str> {
        self.get(API_TYPE)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.get(API_VERSION)
    }

    pub fn organization(&self) -> Option<&str> {
        self.get(ORGANIZATION)
    }

    /// Builder-style insert, handy when assembling params by hand.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NormalizedParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
