//! Playback engine port.
//!
//! The engine owns decoding and output. The core only loads a sound, starts
//! it, asks where it is, and tears it down. Completion is observed through a
//! `watch` channel rather than a callback so that observers can compare
//! session identity before acting.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Audio handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Encoded audio held in memory (mp3, wav, ...).
    Bytes(Vec<u8>),
    /// A file path or URI the engine can open itself.
    Uri(String),
}

/// Lifecycle of one loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Loaded and paused.
    Loaded,
    Playing,
    /// Reached natural end of stream.
    Finished,
    /// Halted by `stop()`.
    Stopped,
    /// Released by `unload()`.
    Unloaded,
    /// The engine failed while playing.
    Failed,
}

impl PlaybackStatus {
    /// Whether the sound will produce no more audio.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Stopped | Self::Unloaded | Self::Failed
        )
    }
}

/// Errors from the playback engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The audio could not be decoded.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// No output device or the output stream failed.
    #[error("Audio output error: {0}")]
    Output(String),

    /// The source kind is not supported by this engine.
    #[error("Unsupported audio source: {0}")]
    Unsupported(String),

    /// The engine's worker thread is gone.
    #[error("Playback engine is no longer running")]
    EngineGone,
}

/// One loaded sound.
///
/// `stop` and `unload` are idempotent and never fail: teardown must always
/// succeed from the caller's point of view.
pub trait PlaybackHandle: Send + Sync {
    /// Start (or resume) playback.
    fn play(&self) -> Result<(), PlaybackError>;

    /// Current playback position in seconds.
    fn position_seconds(&self) -> f64;

    /// Subscribe to status changes.
    fn status(&self) -> watch::Receiver<PlaybackStatus>;

    /// Halt playback.
    fn stop(&self);

    /// Release the underlying sound.
    fn unload(&self);
}

/// Audio output engine.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load `source` without starting it.
    async fn load(&self, source: AudioSource) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}
