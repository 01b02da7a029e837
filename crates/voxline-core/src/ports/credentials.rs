//! Credential / persisted-settings store port.
//!
//! A flat key-value store. It holds the API key as well as persisted voice
//! settings, default voice and model (see [`crate::settings`] for key names).

use std::path::PathBuf;

use thiserror::Error;

/// Errors writing to a credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Failed to read or write the backing file.
    #[error("Failed to access credential file {path}: {reason}")]
    FileError { path: PathBuf, reason: String },

    /// Key or value cannot be stored (e.g. contains a newline).
    #[error("Invalid credential entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    /// No data directory could be determined for the default store.
    #[error("Cannot determine data directory; set VOXLINE_DATA_DIR")]
    NoDataDir,
}

/// Key-value store for credentials and persisted settings.
pub trait CredentialStore: Send + Sync {
    /// Look up a value. Empty values are reported as absent.
    fn get(&self, name: &str) -> Option<String>;

    /// Store a value, replacing any previous one.
    fn set(&self, name: &str, value: &str) -> Result<(), CredentialError>;
}
