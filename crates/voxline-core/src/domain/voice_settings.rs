//! Voice tuning parameters sent with every synthesis request.

use serde::{Deserialize, Serialize};

/// Default stability when neither caller nor store supplies one.
pub const DEFAULT_STABILITY: f32 = 0.5;

/// Default similarity boost.
pub const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

/// Default style exaggeration.
pub const DEFAULT_STYLE: f32 = 0.0;

/// Default speaker boost flag.
pub const DEFAULT_SPEAKER_BOOST: bool = true;

/// Fully resolved voice settings for one session.
///
/// Immutable once a session starts: the session keeps its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    /// Voice stability, `0.0..=1.0`.
    pub stability: f32,
    /// Similarity boost, `0.0..=1.0`.
    pub similarity_boost: f32,
    /// Style exaggeration.
    pub style: f32,
    /// Whether the backend should apply speaker boost.
    pub speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            style: DEFAULT_STYLE,
            speaker_boost: DEFAULT_SPEAKER_BOOST,
        }
    }
}

/// Caller-supplied partial voice settings.
///
/// Each `None` field is filled independently, first from the persisted store
/// and then from the hard defaults. See [`crate::settings::resolve_voice_settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceSettingsOverrides {
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
    pub style: Option<f32>,
    pub speaker_boost: Option<bool>,
}

impl VoiceSettingsOverrides {
    /// Overrides that leave every field to the store/defaults.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            stability: None,
            similarity_boost: None,
            style: None,
            speaker_boost: None,
        }
    }

    #[must_use]
    pub const fn with_stability(mut self, value: f32) -> Self {
        self.stability = Some(value);
        self
    }

    #[must_use]
    pub const fn with_similarity_boost(mut self, value: f32) -> Self {
        self.similarity_boost = Some(value);
        self
    }

    #[must_use]
    pub const fn with_style(mut self, value: f32) -> Self {
        self.style = Some(value);
        self
    }

    #[must_use]
    pub const fn with_speaker_boost(mut self, value: bool) -> Self {
        self.speaker_boost = Some(value);
        self
    }
}

impl From<VoiceSettings> for VoiceSettingsOverrides {
    fn from(settings: VoiceSettings) -> Self {
        Self {
            stability: Some(settings.stability),
            similarity_boost: Some(settings.similarity_boost),
            style: Some(settings.style),
            speaker_boost: Some(settings.speaker_boost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn defaults_match_documented_values() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
        assert_eq!(settings.style, 0.0);
        assert!(settings.speaker_boost);
    }

    #[test]
    fn overrides_builder_sets_only_named_fields() {
        let overrides = VoiceSettingsOverrides::none()
            .with_stability(0.2)
            .with_speaker_boost(false);
        assert_eq!(overrides.stability, Some(0.2));
        assert_eq!(overrides.speaker_boost, Some(false));
        assert!(overrides.similarity_boost.is_none());
        assert!(overrides.style.is_none());
    }

    #[test]
    fn overrides_deserialize_partial_json() {
        let overrides: VoiceSettingsOverrides =
            serde_json::from_str(r#"{"similarityBoost": 0.9}"#).unwrap();
        assert_eq!(overrides.similarity_boost, Some(0.9));
        assert!(overrides.stability.is_none());
    }
}
