//! Internal wire types for the synthesis API.
//!
//! These types are internal to `voxline-synth`. Consumers see the port DTOs
//! defined in `voxline-core`.

use serde::{Deserialize, Serialize};
use voxline_core::{ExactAlignment, SynthesisRequest, VoiceSettings, VoiceSummary};

// ============================================================================
// Request bodies
// ============================================================================

/// Body shared by the timed and plain text-to-speech endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TtsBody<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: WireVoiceSettings,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WireVoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl From<VoiceSettings> for WireVoiceSettings {
    fn from(settings: VoiceSettings) -> Self {
        Self {
            stability: settings.stability,
            similarity_boost: settings.similarity_boost,
            style: settings.style,
            use_speaker_boost: settings.speaker_boost,
        }
    }
}

impl<'a> From<&'a SynthesisRequest> for TtsBody<'a> {
    fn from(request: &'a SynthesisRequest) -> Self {
        Self {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: request.settings.into(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response of `POST text-to-speech/{voice}/with-timestamps`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimestampedResponse {
    pub audio_base64: String,
    #[serde(default)]
    pub alignment: Option<WireAlignment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAlignment {
    pub characters: Vec<String>,
    pub character_start_times_seconds: Vec<f64>,
    /// Returned by the API but not used for highlighting.
    #[serde(default)]
    #[allow(dead_code)]
    pub character_end_times_seconds: Vec<f64>,
}

impl From<WireAlignment> for ExactAlignment {
    fn from(wire: WireAlignment) -> Self {
        Self {
            characters: wire.characters,
            character_start_times_seconds: wire.character_start_times_seconds,
        }
    }
}

/// Response of `GET voices`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<WireVoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireVoice {
    pub voice_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<WireVoice> for VoiceSummary {
    fn from(voice: WireVoice) -> Self {
        let display_name = voice
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| voice.voice_id.clone());
        Self {
            voice_id: voice.voice_id,
            display_name,
            category: voice.category,
        }
    }
}
