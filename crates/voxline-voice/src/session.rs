//! Live session handle shared between the manager, watchers and callers.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use voxline_core::{
    AlignmentTrack, PlaybackError, PlaybackHandle, PlaybackStatus, SessionId, SessionState,
    SynthesisRequest,
};

struct SessionInner {
    id: SessionId,
    request: SynthesisRequest,
    alignment: AlignmentTrack,
    playback: Box<dyn PlaybackHandle>,
    state: watch::Sender<SessionState>,
}

/// Handle to one playing (or finished) speech session.
///
/// Cheap to clone. A handle outlives its session: once the session is
/// `Stopped`, `Completed` or `Failed`, [`position_seconds`](Self::position_seconds)
/// returns `None` and the audio has been released.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("entries", &self.inner.alignment.len())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        request: SynthesisRequest,
        alignment: AlignmentTrack,
        playback: Box<dyn PlaybackHandle>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Requesting);
        Self {
            inner: Arc::new(SessionInner {
                id,
                request,
                alignment,
                playback,
                state,
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    /// The resolved request this session was synthesized from.
    pub fn request(&self) -> &SynthesisRequest {
        &self.inner.request
    }

    pub fn alignment(&self) -> &AlignmentTrack {
        &self.inner.alignment
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn is_live(&self) -> bool {
        self.state().is_live()
    }

    /// Current playback position, or `None` once the session is dead.
    pub fn position_seconds(&self) -> Option<f64> {
        if self.is_live() {
            Some(self.inner.playback.position_seconds())
        } else {
            None
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the session reaches a terminal state and return it.
    pub async fn finished(&self) -> SessionState {
        let mut rx = self.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        rx.wait_for(|state| state.is_terminal())
            .await
            .map_or(SessionState::Stopped, |state| *state)
    }

    // ── Manager-side operations ────────────────────────────────────

    /// Start audio and mark the session `Playing`.
    pub(crate) fn start(&self) -> Result<(), PlaybackError> {
        self.inner.playback.play()?;
        self.inner.state.send_replace(SessionState::Playing);
        Ok(())
    }

    pub(crate) fn playback_status(&self) -> watch::Receiver<PlaybackStatus> {
        self.inner.playback.status()
    }

    /// Move a live session to `state` and release its audio.
    ///
    /// Returns `false` (and does nothing) if the session was already dead.
    pub(crate) fn terminate(&self, state: SessionState) -> bool {
        debug_assert!(state.is_terminal());
        let changed = self.inner.state.send_if_modified(|current| {
            if current.is_live() {
                *current = state;
                true
            } else {
                false
            }
        });

        if changed {
            if state != SessionState::Completed {
                self.inner.playback.stop();
            }
            self.inner.playback.unload();
        }
        changed
    }
}
