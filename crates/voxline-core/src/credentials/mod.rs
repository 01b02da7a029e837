//! Credential store adapters.
//!
//! - [`MemoryCredentialStore`]: process-local map, used by tests and embedders
//! - [`EnvFileCredentialStore`]: a `.env` file under the data directory

mod env_file;
mod memory;
#[cfg(test)]
pub(crate) mod test_utils;

use std::env;
use std::path::PathBuf;

pub use crate::ports::credentials::{CredentialError, CredentialStore};
pub use env_file::EnvFileCredentialStore;
pub use memory::MemoryCredentialStore;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "VOXLINE_DATA_DIR";

/// Root directory for persisted voxline state.
///
/// Resolution order:
/// 1. `VOXLINE_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/voxline`)
pub fn data_root() -> Result<PathBuf, CredentialError> {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("voxline"))
        .ok_or(CredentialError::NoDataDir)
}

/// Location of the default `.env` credential file.
pub fn default_store_path() -> Result<PathBuf, CredentialError> {
    Ok(data_root()?.join(".env"))
}
