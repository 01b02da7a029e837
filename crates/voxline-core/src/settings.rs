//! Per-field resolution of voice, model and tuning settings.
//!
//! Every field resolves independently: caller value, then persisted value in
//! the [`CredentialStore`], then the hard default. Persisted values that fail
//! to parse or are out of range are logged and skipped.

use tracing::warn;

use crate::domain::voice_settings::{
    DEFAULT_SIMILARITY_BOOST, DEFAULT_SPEAKER_BOOST, DEFAULT_STABILITY, DEFAULT_STYLE,
};
use crate::domain::{SpeakRequest, SynthesisRequest, VoiceSettings, VoiceSettingsOverrides};
use crate::error::{SpeechError, SpeechResult};
use crate::ports::CredentialStore;

// ── Store keys ──────────────────────────────────────────────────────────────

/// API credential for the synthesis backend.
pub const API_KEY: &str = "ELEVENLABS_API_KEY";
pub const VOICE_ID_KEY: &str = "VOXLINE_VOICE_ID";
pub const MODEL_ID_KEY: &str = "VOXLINE_MODEL_ID";
pub const STABILITY_KEY: &str = "VOXLINE_STABILITY";
pub const SIMILARITY_BOOST_KEY: &str = "VOXLINE_SIMILARITY_BOOST";
pub const STYLE_KEY: &str = "VOXLINE_STYLE";
pub const SPEAKER_BOOST_KEY: &str = "VOXLINE_SPEAKER_BOOST";

/// All keys the settings layer reads, for listing in UIs.
pub const SETTING_KEYS: &[&str] = &[
    API_KEY,
    VOICE_ID_KEY,
    MODEL_ID_KEY,
    STABILITY_KEY,
    SIMILARITY_BOOST_KEY,
    STYLE_KEY,
    SPEAKER_BOOST_KEY,
];

// ── Defaults ────────────────────────────────────────────────────────────────

pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

// ── Resolution ──────────────────────────────────────────────────────────────

/// Look up the API credential.
pub fn api_key(store: &dyn CredentialStore) -> SpeechResult<String> {
    store
        .get(API_KEY)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| SpeechError::CredentialMissing {
            name: API_KEY.to_string(),
        })
}

/// Resolve effective voice settings for one request.
///
/// Caller-supplied stability or similarity boost outside `[0, 1]` (or any
/// non-finite caller value) is rejected.
pub fn resolve_voice_settings(
    overrides: &VoiceSettingsOverrides,
    store: &dyn CredentialStore,
) -> SpeechResult<VoiceSettings> {
    if let Some(v) = overrides.stability {
        check_unit("stability", v)?;
    }
    if let Some(v) = overrides.similarity_boost {
        check_unit("similarity_boost", v)?;
    }
    if let Some(v) = overrides.style {
        check_finite("style", v)?;
    }

    Ok(VoiceSettings {
        stability: overrides
            .stability
            .or_else(|| stored_f32(store, STABILITY_KEY, true))
            .unwrap_or(DEFAULT_STABILITY),
        similarity_boost: overrides
            .similarity_boost
            .or_else(|| stored_f32(store, SIMILARITY_BOOST_KEY, true))
            .unwrap_or(DEFAULT_SIMILARITY_BOOST),
        style: overrides
            .style
            .or_else(|| stored_f32(store, STYLE_KEY, false))
            .unwrap_or(DEFAULT_STYLE),
        speaker_boost: overrides
            .speaker_boost
            .or_else(|| stored_bool(store, SPEAKER_BOOST_KEY))
            .unwrap_or(DEFAULT_SPEAKER_BOOST),
    })
}

/// Resolve a caller request into the form sent to the backend.
pub fn resolve_request(
    request: &SpeakRequest,
    store: &dyn CredentialStore,
) -> SpeechResult<SynthesisRequest> {
    if !request.has_text() {
        return Err(SpeechError::EmptyText);
    }

    let settings = resolve_voice_settings(&request.settings, store)?;
    let voice_id = resolve_id(request.voice_id.as_deref(), store, VOICE_ID_KEY, DEFAULT_VOICE_ID);
    let model_id = resolve_id(request.model_id.as_deref(), store, MODEL_ID_KEY, DEFAULT_MODEL_ID);

    Ok(SynthesisRequest {
        text: request.text.clone(),
        voice_id,
        model_id,
        settings,
    })
}

/// Validate a value before it is persisted under `key`.
///
/// Unknown keys are accepted as-is.
pub fn validate_setting(key: &str, value: &str) -> SpeechResult<()> {
    match key {
        STABILITY_KEY | SIMILARITY_BOOST_KEY => {
            let parsed = parse_f32(key, value)?;
            check_unit(key, parsed)
        }
        STYLE_KEY => parse_f32(key, value).map(|_| ()),
        SPEAKER_BOOST_KEY => parse_bool(value).map(|_| ()).ok_or_else(|| {
            SpeechError::InvalidSettings(format!("{key} must be true or false, got '{value}'"))
        }),
        API_KEY | VOICE_ID_KEY | MODEL_ID_KEY if value.trim().is_empty() => Err(
            SpeechError::InvalidSettings(format!("{key} must not be empty")),
        ),
        _ => Ok(()),
    }
}

fn resolve_id(
    caller: Option<&str>,
    store: &dyn CredentialStore,
    key: &str,
    default: &str,
) -> String {
    caller
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .or_else(|| store.get(key).map(|id| id.trim().to_string()))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn check_unit(name: &str, value: f32) -> SpeechResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SpeechError::InvalidSettings(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn check_finite(name: &str, value: f32) -> SpeechResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpeechError::InvalidSettings(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

fn parse_f32(key: &str, value: &str) -> SpeechResult<f32> {
    let parsed: f32 = value.trim().parse().map_err(|_| {
        SpeechError::InvalidSettings(format!("{key} must be a number, got '{value}'"))
    })?;
    check_finite(key, parsed)?;
    Ok(parsed)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn stored_f32(store: &dyn CredentialStore, key: &str, unit_range: bool) -> Option<f32> {
    let raw = store.get(key)?;
    let parsed = parse_f32(key, &raw).and_then(|v| {
        if unit_range {
            check_unit(key, v)?;
        }
        Ok(v)
    });
    match parsed {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring invalid persisted setting");
            None
        }
    }
}

fn stored_bool(store: &dyn CredentialStore, key: &str) -> Option<bool> {
    let raw = store.get(key)?;
    let parsed = parse_bool(&raw);
    if parsed.is_none() {
        warn!(key, value = %raw, "Ignoring invalid persisted setting");
    }
    parsed
}
