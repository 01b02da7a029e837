use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CredentialError, CredentialStore, default_store_path};

/// Credential store backed by a `.env` file.
///
/// Reads go through `dotenvy` on every call, so edits made by another
/// process are picked up. Writes update the key in place and keep every
/// other line (comments included) untouched.
#[derive(Debug, Clone)]
pub struct EnvFileCredentialStore {
    path: PathBuf,
    env_override: bool,
}

impl EnvFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_override: false,
        }
    }

    /// Store at [`default_store_path`].
    pub fn open_default() -> Result<Self, CredentialError> {
        Ok(Self::new(default_store_path()?))
    }

    /// Let process environment variables shadow file values on read.
    #[must_use]
    pub const fn with_env_override(mut self) -> Self {
        self.env_override = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file_value(&self, name: &str) -> Option<String> {
        if !self.path.exists() {
            return None;
        }

        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to open credential file");
                return None;
            }
        };

        let mut found = None;
        for item in iter {
            match item {
                Ok((key, value)) if key == name => found = Some(value),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping unparsable credential line");
                }
            }
        }
        found
    }

    fn file_error(&self, e: &std::io::Error) -> CredentialError {
        CredentialError::FileError {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

fn validate_entry(key: &str, value: &str) -> Result<(), CredentialError> {
    let invalid = |reason: &str| CredentialError::InvalidEntry {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.trim().is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.contains(['=', '\n', '\r']) || key.chars().any(char::is_whitespace) {
        return Err(invalid("key contains '=' or whitespace"));
    }
    if value.contains(['\n', '\r']) {
        return Err(invalid("value contains a line break"));
    }
    Ok(())
}

/// Quote `value` so dotenvy reads it back unchanged.
///
/// Single quotes are literal to dotenvy; values containing one fall back to
/// double quotes with `\`, `"` and `$` escaped.
fn quote_value(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

impl CredentialStore for EnvFileCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        if self.env_override {
            if let Ok(value) = env::var(name) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.read_file_value(name).filter(|v| !v.is_empty())
    }

    fn set(&self, name: &str, value: &str) -> Result<(), CredentialError> {
        validate_entry(name, value)?;

        let lines: Vec<String> = if self.path.exists() {
            fs::read_to_string(&self.path)
                .map_err(|e| self.file_error(&e))?
                .lines()
                .map(ToString::to_string)
                .collect()
        } else {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|e| self.file_error(&e))?;
            }
            Vec::new()
        };

        let mut updated = false;
        let mut output: Vec<String> = Vec::with_capacity(lines.len() + 2);

        for line in lines {
            match line.split_once('=') {
                Some((lhs, _)) if lhs.trim() == name => {
                    if !updated {
                        output.push(format!("{name}={}", quote_value(value)));
                        updated = true;
                    }
                }
                _ => output.push(line),
            }
        }

        if !updated {
            if output.last().is_some_and(|last| !last.is_empty()) {
                output.push(String::new());
            }
            output.push(format!("{name}={}", quote_value(value)));
        }

        // Trailing newline
        if output.last().is_some_and(|last| !last.is_empty()) {
            output.push(String::new());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.file_error(&e))?;

        file.write_all(output.join("\n").as_bytes())
            .map_err(|e| self.file_error(&e))?;

        debug!(path = %self.path.display(), key = name, "Persisted credential entry");
        Ok(())
    }
}
