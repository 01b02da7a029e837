//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the speech core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest`/`rodio` types in any signature
//! - Adapter-internal errors are mapped to [`BackendError`] or
//!   [`PlaybackError`] at the boundary
//! - Cancellation travels as a [`CancellationToken`](tokio_util::sync::CancellationToken)

pub mod catalog;
pub mod credentials;
pub mod playback;
pub mod synthesis;

use thiserror::Error;

pub use catalog::{VoiceCatalog, VoiceSummary};
pub use credentials::{CredentialError, CredentialStore};
pub use playback::{AudioSource, PlaybackEngine, PlaybackError, PlaybackHandle, PlaybackStatus};
pub use synthesis::{SynthesisBackend, TimedSynthesis};

/// Errors returned by synthesis backends and the voice catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,
}

impl BackendError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
