//! Merging of script configuration and call-site overrides into
//! [`NormalizedParams`].
//!
//! Precedence, highest first: overrides, then the parsed script config. The
//! environment is never consulted implicitly; use
//! [`Resolver::scan_environment`] to collect it into a [`ParsedConfig`] and
//! pass that in explicitly.
//!
//! The client-library transport reads credentials once, when its client is
//! built. Overriding a value that is also set in the environment therefore
//! only takes effect after the variable is cleared (see
//! [`Resolver::clear_scanned`]) and a new client is built, or when the REST
//! transport is used instead.

use crate::env::Environment;
use crate::types::{API_BASE, API_KEY, API_TYPE, API_VERSION, ORGANIZATION};
use crate::{NormalizedParams, ParsedConfig};

/// Prefix of the recognised environment/script variables.
pub const DEFAULT_PREFIX: &str = "OPENAI";

/// Call metadata key. Stripped from resolved params and turns on a dump of them.
pub const DEBUG_KEY: &str = "debug";

/// Variable suffixes and the canonical parameter each one maps to.
const TRANSLATIONS: [(&str, &str); 5] = [
    ("API_KEY", API_KEY),
    ("API_BASE", API_BASE),
    ("API_TYPE", API_TYPE),
    ("API_VERSION", API_VERSION),
    ("ORGANIZATION", ORGANIZATION),
];

/// Resolves provider parameters for one variable prefix.
#[derive(Debug, Clone)]
pub struct Resolver {
    prefix: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Resolver for `OPENAI_*` variables.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Resolver for `<prefix>_*` variables.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Canonical parameter name for a script/environment variable, if recognised.
    pub fn translate(&self, key: &str) -> Option<&'static str> {
        let suffix = key.strip_prefix(&self.prefix)?.strip_prefix('_')?;
        TRANSLATIONS
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, canonical)| *canonical)
    }

    /// Merge `parsed` and `overrides` into normalized params.
    ///
    /// Recognised variables are renamed to their canonical names, any other
    /// key is carried over unchanged. The unset list of `parsed` is ignored.
    pub fn resolve(
        &self,
        parsed: Option<&ParsedConfig>,
        overrides: Option<&NormalizedParams>,
    ) -> NormalizedParams {
        let mut params = NormalizedParams::new();

        if let Some(parsed) = parsed {
            for (key, value) in parsed.iter() {
                let name = self.translate(key).unwrap_or(key);
                params.insert(name, value);
            }
        }

        if let Some(overrides) = overrides {
            for (key, value) in overrides.iter() {
                params.insert(key, value);
            }
        }

        if params.remove(DEBUG_KEY).is_some() {
            dump_params(&params);
        }

        params
    }

    /// Collect every `<prefix>_*` variable from `env`.
    pub fn scan_environment(&self, env: &dyn Environment) -> ParsedConfig {
        let marker = format!("{}_", self.prefix);
        let mut vars = env.vars();
        vars.sort();
        vars.into_iter()
            .filter(|(k, _)| k.starts_with(&marker))
            .collect()
    }

    /// Remove exactly the keys of `scanned` from `env`.
    pub fn clear_scanned(&self, env: &dyn Environment, scanned: &ParsedConfig) {
        for key in scanned.keys() {
            env.remove(key);
        }
        tracing::debug!(
            cleared = scanned.len(),
            prefix = %self.prefix,
            "Cleared scanned environment variables"
        );
    }
}

fn dump_params(params: &NormalizedParams) {
    let shown: Vec<String> = params
        .iter()
        .map(|(k, v)| match k {
            API_KEY => format!("{k}={}", redact(v)),
            _ => format!("{k}={v}"),
        })
        .collect();
    tracing::debug!(params = %shown.join(", "), "Resolved endpoint parameters");
}

fn redact(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if secret.chars().count() > 8 {
        format!("***{tail}")
    } else {
        "***".to_string()
    }
}

/// [`Resolver::resolve`] with the default `OPENAI` prefix.
pub fn resolve(
    parsed: Option<&ParsedConfig>,
    overrides: Option<&NormalizedParams>,
) -> NormalizedParams {
    Resolver::new().resolve(parsed, overrides)
}

/// [`Resolver::scan_environment`] with the default `OPENAI` prefix.
pub fn scan_process_environment(env: &dyn Environment) -> ParsedConfig {
    Resolver::new().scan_environment(env)
}

/// [`Resolver::clear_scanned`] with the default `OPENAI` prefix.
pub fn clear_scanned(env: &dyn Environment, scanned: &ParsedConfig) {
    Resolver::new().clear_scanned(env, scanned)
}
