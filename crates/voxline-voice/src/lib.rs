//! Speech sessions for voxline.
//!
//! - [`SessionManager`]: single-flight speak/stop with timed → plain fallback
//! - [`PlaybackSynchronizer`]: playback position → highlighted text entry
//! - [`RodioPlaybackEngine`]: the default output device via `rodio`
#![deny(unused_crate_dependencies)]

mod audio_thread;
pub mod events;
pub mod manager;
pub mod playback;
pub mod session;
pub mod synchronizer;

// Re-export key types for convenience
pub use events::SpeechEvent;
pub use manager::{SessionManager, SpeakOutcome};
pub use playback::{RodioPlaybackEngine, RodioPlaybackHandle};
pub use session::SessionHandle;
pub use synchronizer::PlaybackSynchronizer;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
