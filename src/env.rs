//! Access to environment variables behind a trait, so the process
//! environment can be swapped for an in-memory one.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Read and delete access to a set of environment variables.
pub trait Environment {
    /// All variables as `(name, value)` pairs.
    fn vars(&self) -> Vec<(String, String)>;

    /// Remove a variable. Removing an absent variable is a no-op.
    fn remove(&self, key: &str);
}

/// The real process environment.
///
/// The process environment is global and unsynchronised. Callers must not
/// scan or clear it from several threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        // Skip entries that are not valid unicode rather than panicking.
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    fn remove(&self, key: &str) {
        std::env::remove_var(key);
    }
}

/// An in-memory environment.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    vars: Mutex<BTreeMap<String, String>>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.vars.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let env = MemoryEnvironment::new();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}

impl Environment for MemoryEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}
