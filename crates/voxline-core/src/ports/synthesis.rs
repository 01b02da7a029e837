//! Synthesis backend port.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::BackendError;
use crate::domain::{ExactAlignment, SynthesisRequest};

/// Audio plus optional exact alignment from the timed backend operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSynthesis {
    /// Encoded audio bytes (already base64-decoded).
    pub audio: Vec<u8>,
    /// Per-character timing, when the backend supplied it.
    pub alignment: Option<ExactAlignment>,
}

/// A remote text-to-speech service with a timed and a plain operation.
///
/// Both operations must return [`BackendError::Cancelled`] promptly once
/// `cancel` fires, without leaking the in-flight request.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Synthesize with per-character timestamps (primary path).
    async fn synthesize_timed(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<TimedSynthesis, BackendError>;

    /// Synthesize audio only (fallback path).
    async fn synthesize_plain(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, BackendError>;
}
