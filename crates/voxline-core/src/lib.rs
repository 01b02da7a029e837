//! Core domain types, alignment math and port definitions for voxline.
//!
//! This crate has no HTTP or audio dependencies. Adapters live in
//! `voxline-synth` (synthesis backend) and `voxline-voice` (session manager,
//! synchronizer, rodio playback).
#![deny(unused_crate_dependencies)]

pub mod alignment;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod ports;
pub mod settings;
pub mod sync;

// Re-export commonly used types for convenience
pub use alignment::{AlignmentProvider, SECONDS_PER_CHARACTER};
pub use credentials::{EnvFileCredentialStore, MemoryCredentialStore, data_root, default_store_path};
pub use domain::{
    AlignmentMode, AlignmentTrack, CharacterTiming, ExactAlignment, SessionId, SessionState,
    SpeakRequest, SynthesisRequest, VoiceSettings, VoiceSettingsOverrides,
};
pub use error::{SpeechError, SpeechResult};
pub use ports::{
    AudioSource, BackendError, CredentialError, CredentialStore, PlaybackEngine, PlaybackError,
    PlaybackHandle, PlaybackStatus, SynthesisBackend, TimedSynthesis, VoiceCatalog, VoiceSummary,
};
pub use settings::{DEFAULT_MODEL_ID, DEFAULT_VOICE_ID, resolve_request, resolve_voice_settings};
pub use sync::{SCROLL_STRIDE, SyncCursor, SyncTick, TICK_PERIOD};
