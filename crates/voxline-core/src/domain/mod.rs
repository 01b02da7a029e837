//! Pure domain types with no infrastructure dependencies.

pub mod alignment;
pub mod request;
pub mod session;
pub mod voice_settings;

pub use alignment::{AlignmentMode, AlignmentTrack, CharacterTiming, ExactAlignment};
pub use request::{SpeakRequest, SynthesisRequest};
pub use session::{SessionId, SessionState};
pub use voice_settings::{VoiceSettings, VoiceSettingsOverrides};
