//! Synthesis client: timed synthesis, plain synthesis, voice listing.
//!
//! Generic over an [`HttpBackend`] so tests run against canned responses.
//! Cancellation and error mapping live in the port implementations.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;
use url::Url;
use voxline_core::{SynthesisRequest, TimedSynthesis, VoiceSummary};

use crate::config::SynthClientConfig;
use crate::endpoints;
use crate::error::{SynthError, SynthResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{TimestampedResponse, TtsBody, VoicesResponse};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default synthesis client using the reqwest HTTP backend.
pub type DefaultSynthClient = SynthClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for an ElevenLabs-compatible synthesis API.
///
/// Use [`DefaultSynthClient`] in production code.
pub struct SynthClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: Url,
}

impl DefaultSynthClient {
    /// Create a client from `config`.
    pub fn new(config: &SynthClientConfig) -> Result<Self, SynthError> {
        let base_url = endpoints::parse_base(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self { backend, base_url })
    }

    /// Create a client with default configuration.
    pub fn default_client() -> Result<Self, SynthError> {
        Self::new(&SynthClientConfig::default())
    }
}

impl<B: HttpBackend> SynthClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(base_url: Url, backend: B) -> Self {
        Self { backend, base_url }
    }

    pub(crate) async fn fetch_timed(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
    ) -> SynthResult<TimedSynthesis> {
        let url = endpoints::timed_url(&self.base_url, &request.voice_id)?;
        let response: TimestampedResponse = self
            .backend
            .post_json(&url, api_key, &TtsBody::from(request))
            .await?;

        let audio = BASE64.decode(response.audio_base64.trim())?;
        if audio.is_empty() {
            return Err(SynthError::InvalidResponse {
                message: "timed response carried no audio".to_string(),
            });
        }

        debug!(
            voice_id = %request.voice_id,
            audio_bytes = audio.len(),
            has_alignment = response.alignment.is_some(),
            "Timed synthesis succeeded"
        );

        Ok(TimedSynthesis {
            audio,
            alignment: response.alignment.map(Into::into),
        })
    }

    pub(crate) async fn fetch_plain(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
    ) -> SynthResult<Vec<u8>> {
        let url = endpoints::plain_url(&self.base_url, &request.voice_id)?;
        let audio = self
            .backend
            .post_bytes(&url, api_key, &TtsBody::from(request))
            .await?;

        if audio.is_empty() {
            return Err(SynthError::InvalidResponse {
                message: "plain response carried no audio".to_string(),
            });
        }

        debug!(voice_id = %request.voice_id, audio_bytes = audio.len(), "Plain synthesis succeeded");
        Ok(audio)
    }

    pub(crate) async fn fetch_voices(&self, api_key: &str) -> SynthResult<Vec<VoiceSummary>> {
        let url = endpoints::voices_url(&self.base_url)?;
        let response: VoicesResponse = self.backend.get_json(&url, api_key).await?;
        Ok(response.voices.into_iter().map(Into::into).collect())
    }
}
