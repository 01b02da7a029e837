use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialError, CredentialStore};

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Remove a value. Returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        self.values
            .write()
            .map(|mut values| values.remove(name).is_some())
            .unwrap_or(false)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        let values = self.values.read().ok()?;
        values.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&self, name: &str, value: &str) -> Result<(), CredentialError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| CredentialError::InvalidEntry {
                key: name.to_string(),
                reason: "store lock poisoned".to_string(),
            })?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
