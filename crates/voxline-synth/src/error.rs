//! Internal error types for synthesis backend operations.
//!
//! These errors are internal to `voxline-synth` and are mapped to
//! [`BackendError`](voxline_core::BackendError) at the port boundary.

use thiserror::Error;

/// Result type alias for synthesis backend operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors related to synthesis API operations.
#[derive(Debug, Error)]
pub enum SynthError {
    /// API request failed with an HTTP error status.
    #[error("Synthesis API request failed with status {status}: {url}")]
    ApiRequestFailed {
        status: u16,
        url: String,
        /// Response body, truncated, for diagnostics
        detail: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from synthesis API: {message}")]
    InvalidResponse { message: String },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot have path segments appended.
    #[error("Invalid client configuration: {message}")]
    Configuration { message: String },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The timed response carried audio that is not valid base64.
    #[error("Audio payload is not valid base64: {0}")]
    AudioDecode(#[from] base64::DecodeError),
}
