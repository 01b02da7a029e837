//! Synthesis request shapes: the partial caller form and the resolved form.

use serde::{Deserialize, Serialize};

use super::voice_settings::{VoiceSettings, VoiceSettingsOverrides};

/// What a caller asks the session manager to speak.
///
/// Voice, model and settings are optional; missing values are resolved from
/// the persisted store and then from defaults when the request starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakRequest {
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub settings: VoiceSettingsOverrides,
}

impl SpeakRequest {
    /// Create a request for `text` with everything else left to resolution.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    #[must_use]
    pub const fn with_settings(mut self, settings: VoiceSettingsOverrides) -> Self {
        self.settings = settings;
        self
    }

    /// Whether the text has anything to speak.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A fully resolved request, as sent to the synthesis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    /// Non-empty text to synthesize.
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub settings: VoiceSettings,
}
