//! Composition root: settings store, HTTP client config and logging.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use voxline_core::{EnvFileCredentialStore, default_store_path};
use voxline_synth::SynthClientConfig;

use crate::parser::Cli;

const STORE_FILE: &str = ".env";

/// Everything a command handler needs.
pub struct CliContext {
    pub store: Arc<EnvFileCredentialStore>,
    pub synth_config: SynthClientConfig,
}

/// Build the CLI context from global arguments.
pub fn bootstrap(cli: &Cli) -> Result<CliContext> {
    let store = open_store(cli.data_dir.as_deref())?;

    let mut synth_config = SynthClientConfig::new()
        .with_user_agent(concat!("voxline/", env!("CARGO_PKG_VERSION")));
    if let Some(base_url) = &cli.base_url {
        synth_config = synth_config.with_base_url(base_url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        synth_config = synth_config.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!(
        store = %store.path().display(),
        base_url = synth_config.base_url(),
        "CLI context ready"
    );

    Ok(CliContext {
        store: Arc::new(store),
        synth_config,
    })
}

/// Open the settings store. Process environment variables shadow file values.
pub fn open_store(data_dir: Option<&Path>) -> Result<EnvFileCredentialStore> {
    let path = match data_dir {
        Some(dir) => dir.join(STORE_FILE),
        None => default_store_path()?,
    };
    Ok(EnvFileCredentialStore::new(path).with_env_override())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_flag_places_store_inside_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(Some(dir.path())).unwrap();
        assert_eq!(store.path(), dir.path().join(".env"));
    }
}
