//! Speech core error types.
//!
//! Cancellation is not an error here: a superseded or stopped request
//! resolves to `SpeakOutcome::Cancelled` (see `voxline-voice`).

use thiserror::Error;

use crate::ports::BackendError;

/// Result type alias for speech core operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors surfaced by the speech playback core.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No API credential is configured. Fatal to the request, never retried.
    #[error("No API credential configured (expected '{name}')")]
    CredentialMissing {
        /// The credential key that was looked up.
        name: String,
    },

    /// Both the timed and the plain synthesis attempts failed.
    #[error("Speech synthesis failed: primary: {primary}; fallback: {secondary}")]
    Network {
        /// Why the timed-alignment request failed.
        primary: Box<Self>,
        /// Why the plain synthesis request failed.
        secondary: BackendError,
    },

    /// A backend call failed (only seen nested inside [`SpeechError::Network`]).
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Server-supplied alignment was structurally invalid.
    #[error("Malformed alignment payload: {0}")]
    MalformedAlignment(String),

    /// The playback engine could not load or play the synthesized audio.
    #[error("Playback failed: {0}")]
    Playback(String),

    /// The request text was empty or whitespace-only.
    #[error("Cannot speak empty text")]
    EmptyText,

    /// A caller-supplied voice setting is out of range.
    #[error("Invalid voice settings: {0}")]
    InvalidSettings(String),

    /// The credential store could not be read or written.
    #[error("Credential store error: {0}")]
    Credentials(#[from] crate::credentials::CredentialError),
}

impl SpeechError {
    /// Whether this error means no credential was configured.
    #[must_use]
    pub const fn is_credential_missing(&self) -> bool {
        matches!(self, Self::CredentialMissing { .. })
    }
}
