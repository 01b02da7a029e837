//! Config command handler.
//!
//! Settings are stored under their raw keys (`VOXLINE_STABILITY`, ...) and
//! addressed on the command line by short names.

use anyhow::{Result, bail};
use voxline_core::CredentialStore;
use voxline_core::settings::{
    API_KEY, MODEL_ID_KEY, SETTING_KEYS, SIMILARITY_BOOST_KEY, SPEAKER_BOOST_KEY, STABILITY_KEY,
    STYLE_KEY, VOICE_ID_KEY, validate_setting,
};

use crate::bootstrap::CliContext;
use crate::commands::ConfigCommand;

/// Short names accepted on the command line.
const ALIASES: &[(&str, &str)] = &[
    ("api-key", API_KEY),
    ("voice", VOICE_ID_KEY),
    ("model", MODEL_ID_KEY),
    ("stability", STABILITY_KEY),
    ("similarity-boost", SIMILARITY_BOOST_KEY),
    ("style", STYLE_KEY),
    ("speaker-boost", SPEAKER_BOOST_KEY),
];

/// Execute the config command.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    let store = ctx.store.as_ref();
    match command {
        ConfigCommand::Get { key } => {
            let key = resolve_key(&key)?;
            match store.get(key) {
                Some(value) => println!("{}", display_value(key, &value)),
                None => println!("{key} is not set"),
            }
        }
        ConfigCommand::Set { key, value } => {
            let key = set_value(store, &key, &value)?;
            println!("✓ {key} saved to {}", ctx.store.path().display());
        }
        ConfigCommand::List => {
            for line in list_lines(store) {
                println!("{line}");
            }
        }
        ConfigCommand::Path => println!("{}", ctx.store.path().display()),
    }
    Ok(())
}

/// Map a short name or raw key to the stored key.
fn resolve_key(name: &str) -> Result<&'static str> {
    let name = name.trim();
    ALIASES
        .iter()
        .find(|(alias, key)| alias.eq_ignore_ascii_case(name) || key.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
        .ok_or_else(|| {
            let known: Vec<&str> = ALIASES.iter().map(|(alias, _)| *alias).collect();
            anyhow::anyhow!("Unknown setting '{name}' (known: {})", known.join(", "))
        })
}

/// Validate and persist one setting. Returns the stored key.
fn set_value(store: &dyn CredentialStore, name: &str, value: &str) -> Result<&'static str> {
    let key = resolve_key(name)?;
    let value = value.trim();
    if value.is_empty() {
        bail!("{key} must not be empty");
    }
    validate_setting(key, value)?;
    store.set(key, value)?;
    tracing::info!(key, "Setting updated");
    Ok(key)
}

/// Short name for a stored key, or the key itself when it has none.
fn alias_for(key: &str) -> &str {
    ALIASES
        .iter()
        .find(|(_, k)| *k == key)
        .map_or(key, |(alias, _)| *alias)
}

fn list_lines(store: &dyn CredentialStore) -> Vec<String> {
    SETTING_KEYS
        .iter()
        .map(|key| {
            let alias = alias_for(key);
            let value = store
                .get(key)
                .map_or_else(|| "(default)".to_string(), |v| display_value(key, &v));
            format!("{alias:<18} {key:<26} {value}")
        })
        .collect()
}

fn display_value(key: &str, value: &str) -> String {
    if key == API_KEY {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

/// Show only the first four characters of a secret.
fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "****".to_string();
    }
    let head: String = value.chars().take(4).collect();
    format!("{head}****")
}
