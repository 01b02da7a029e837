//! Port trait implementations for `SynthClient`.
//!
//! Maps internal `SynthError` to core `BackendError` and races every request
//! against the caller's cancellation token. Dropping the losing request
//! future aborts the underlying HTTP exchange.

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use voxline_core::{
    BackendError, SynthesisBackend, SynthesisRequest, TimedSynthesis, VoiceCatalog, VoiceSummary,
};

use crate::client::SynthClient;
use crate::error::{SynthError, SynthResult};
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `SynthError` to core `BackendError`.
fn map_error(err: SynthError) -> BackendError {
    match err {
        SynthError::ApiRequestFailed {
            status,
            url,
            detail,
        } => BackendError::Status {
            status,
            message: if detail.is_empty() {
                url
            } else {
                format!("{url}: {detail}")
            },
        },
        SynthError::Network(e) => BackendError::Transport(e.to_string()),
        SynthError::InvalidUrl(e) => BackendError::Transport(e.to_string()),
        SynthError::Configuration { message } => BackendError::Transport(message),
        SynthError::InvalidResponse { message } => BackendError::MalformedBody(message),
        SynthError::JsonParse(e) => BackendError::MalformedBody(e.to_string()),
        SynthError::AudioDecode(e) => BackendError::MalformedBody(e.to_string()),
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: &'static str,
    fut: impl Future<Output = SynthResult<T>> + Send,
) -> Result<T, BackendError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!(operation, "Synthesis request cancelled");
            Err(BackendError::Cancelled)
        }
        result = fut => result.map_err(map_error),
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> SynthesisBackend for SynthClient<B> {
    async fn synthesize_timed(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<TimedSynthesis, BackendError> {
        cancellable(cancel, "timed", self.fetch_timed(request, api_key)).await
    }

    async fn synthesize_plain(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, BackendError> {
        cancellable(cancel, "plain", self.fetch_plain(request, api_key)).await
    }
}

#[async_trait]
impl<B: HttpBackend> VoiceCatalog for SynthClient<B> {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceSummary>, BackendError> {
        self.fetch_voices(api_key).await.map_err(map_error)
    }
}
