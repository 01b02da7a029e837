//! Session identity and the session state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, process-unique session token.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle state of a speech session.
///
/// ```text
///   Idle → Requesting → Playing → Completed
///              │           │
///              │           ├──→ Stopped
///              ├──→ Stopped└──→ Failed
///              └──→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// No session has been started.
    Idle,
    /// Synthesis request in flight.
    Requesting,
    /// Audio is playing.
    Playing,
    /// Playback reached its natural end.
    Completed,
    /// Cancelled by `stop()` or a superseding request.
    Stopped,
    /// Synthesis or playback failed.
    Failed,
}

impl SessionState {
    /// Whether a session in this state owns the single-flight slot.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Requesting | Self::Playing)
    }

    /// Whether this is a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle | Self::Completed | Self::Stopped | Self::Failed, Self::Requesting)
            | (Self::Requesting, Self::Playing | Self::Stopped | Self::Failed)
            | (Self::Playing, Self::Completed | Self::Stopped | Self::Failed) => true,
            _ => false,
        }
    }

    /// Lowercase label for logs and CLI output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Playing => "playing",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}
