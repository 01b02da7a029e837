//! Events emitted by the session manager.

use voxline_core::{SessionId, SessionState};

/// Events emitted by [`SessionManager`](crate::SessionManager) to the
/// UI / application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A session moved to a new state.
    StateChanged {
        session: SessionId,
        state: SessionState,
    },

    /// The timed request failed and the plain request is being tried.
    Fallback {
        session: SessionId,
        /// Why the timed request failed.
        reason: String,
    },
}

impl SpeechEvent {
    /// The session this event belongs to.
    pub const fn session(&self) -> SessionId {
        match self {
            Self::StateChanged { session, .. } | Self::Fallback { session, .. } => *session,
        }
    }
}
