//! Session manager: single-flight speech synthesis and playback.
//!
//! At most one session is live at any time. The manager is a small state
//! machine over a single slot:
//!
//! ```text
//!   Idle ──speak──▶ Requesting ──audio loaded──▶ Playing ──end──▶ Finished(Completed)
//!                      │   ▲                        │
//!                      │   └──────speak (supersede)─┤
//!                      ├──stop──▶ Finished(Stopped) ◀┘ stop
//!                      └──error─▶ Finished(Failed)
//! ```
//!
//! Every continuation that resumes after an `.await` compares its
//! [`SessionId`] with the slot before touching shared state, so a
//! superseded request can never install audio or overwrite the state of
//! its successor.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use voxline_core::settings::{api_key, resolve_request};
use voxline_core::{
    AlignmentProvider, AlignmentTrack, AudioSource, BackendError, CredentialStore, PlaybackEngine,
    PlaybackStatus, SessionId, SessionState, SpeakRequest, SpeechError, SpeechResult,
    SynthesisBackend, SynthesisRequest,
};

use crate::events::SpeechEvent;
use crate::session::SessionHandle;

// ── Outcome ────────────────────────────────────────────────────────

/// Result of a successful [`SessionManager::speak`] call.
#[derive(Debug, Clone)]
pub enum SpeakOutcome {
    /// Audio is playing.
    Started(SessionHandle),
    /// The request was superseded or stopped before audio started.
    Cancelled,
}

impl SpeakOutcome {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub const fn session(&self) -> Option<&SessionHandle> {
        match self {
            Self::Started(session) => Some(session),
            Self::Cancelled => None,
        }
    }

    pub fn into_session(self) -> Option<SessionHandle> {
        match self {
            Self::Started(session) => Some(session),
            Self::Cancelled => None,
        }
    }
}

// ── Slot ───────────────────────────────────────────────────────────

enum Slot {
    Idle,
    Requesting {
        id: SessionId,
        cancel: CancellationToken,
    },
    Playing {
        session: SessionHandle,
        cancel: CancellationToken,
    },
    Finished {
        id: SessionId,
        state: SessionState,
    },
}

impl Slot {
    const fn state(&self) -> SessionState {
        match self {
            Self::Idle => SessionState::Idle,
            Self::Requesting { .. } => SessionState::Requesting,
            Self::Playing { .. } => SessionState::Playing,
            Self::Finished { state, .. } => *state,
        }
    }

    fn id(&self) -> Option<SessionId> {
        match self {
            Self::Idle => None,
            Self::Requesting { id, .. } | Self::Finished { id, .. } => Some(*id),
            Self::Playing { session, .. } => Some(session.id()),
        }
    }

    fn is_live(&self) -> bool {
        self.state().is_live()
    }
}

/// A live slot taken out for teardown.
enum Evicted {
    Requesting {
        id: SessionId,
        cancel: CancellationToken,
    },
    Playing {
        session: SessionHandle,
        cancel: CancellationToken,
    },
}

impl Evicted {
    fn from_slot(slot: Slot) -> Option<Self> {
        match slot {
            Slot::Requesting { id, cancel } => Some(Self::Requesting { id, cancel }),
            Slot::Playing { session, cancel } => Some(Self::Playing { session, cancel }),
            Slot::Idle | Slot::Finished { .. } => None,
        }
    }

    fn id(&self) -> SessionId {
        match self {
            Self::Requesting { id, .. } => *id,
            Self::Playing { session, .. } => session.id(),
        }
    }
}

// ── Shared state ───────────────────────────────────────────────────

struct Shared {
    /// Uses a std Mutex, never held across an `.await` point.
    slot: Mutex<Slot>,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        // Every write is a single assignment, so a poisoned slot is still valid.
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, event: SpeechEvent) {
        let _ = self.event_tx.send(event);
    }

    fn emit_state(&self, session: SessionId, state: SessionState) {
        debug!(%session, state = state.label(), "Session state changed");
        self.emit(SpeechEvent::StateChanged { session, state });
    }

    fn is_current(&self, id: SessionId) -> bool {
        let slot = self.slot();
        slot.is_live() && slot.id() == Some(id)
    }

    /// Cancel and release an evicted session.
    fn tear_down(&self, evicted: Evicted) {
        let id = evicted.id();
        match evicted {
            Evicted::Requesting { cancel, .. } => cancel.cancel(),
            Evicted::Playing { session, cancel } => {
                cancel.cancel();
                session.terminate(SessionState::Stopped);
            }
        }
        self.emit_state(id, SessionState::Stopped);
    }

    /// Resolve session `id` to a terminal `state` if it still owns the slot.
    fn finish_if_current(&self, id: SessionId, state: SessionState) -> bool {
        let evicted = {
            let mut slot = self.slot();
            if !(slot.is_live() && slot.id() == Some(id)) {
                return false;
            }
            debug_assert!(slot.state().can_transition_to(state));
            Evicted::from_slot(std::mem::replace(&mut *slot, Slot::Finished { id, state }))
        };

        match evicted {
            Some(Evicted::Requesting { cancel, .. }) => cancel.cancel(),
            Some(Evicted::Playing { session, cancel }) => {
                cancel.cancel();
                session.terminate(state);
            }
            None => {}
        }
        self.emit_state(id, state);
        true
    }
}

// ── Session manager ────────────────────────────────────────────────

/// Owns the single active speech session.
///
/// Construct with [`SessionManager::new`], which also returns the receiver
/// for [`SpeechEvent`]s.
pub struct SessionManager {
    shared: Arc<Shared>,
    backend: Arc<dyn SynthesisBackend>,
    engine: Arc<dyn PlaybackEngine>,
    credentials: Arc<dyn CredentialStore>,
    /// Serialises load → verify → install so a stale handle is always
    /// unloaded before a newer session is installed.
    install_lock: tokio::sync::Mutex<()>,
    next_id: AtomicU64,
}

impl SessionManager {
    /// Create a new session manager.
    ///
    /// Returns the manager and a receiver for [`SpeechEvent`]s.
    #[must_use]
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        engine: Arc<dyn PlaybackEngine>,
        credentials: Arc<dyn CredentialStore>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let manager = Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Idle),
                event_tx,
            }),
            backend,
            engine,
            credentials,
            install_lock: tokio::sync::Mutex::new(()),
            next_id: AtomicU64::new(1),
        };

        (manager, event_rx)
    }

    /// State of the current session, or of the most recent one.
    pub fn state(&self) -> SessionState {
        self.shared.slot().state()
    }

    /// The playing session, if any.
    pub fn current(&self) -> Option<SessionHandle> {
        match &*self.shared.slot() {
            Slot::Playing { session, .. } => Some(session.clone()),
            _ => None,
        }
    }

    /// Whether a request is in flight or audio is playing.
    pub fn is_busy(&self) -> bool {
        self.shared.slot().is_live()
    }

    // ── Speak ──────────────────────────────────────────────────────

    /// Synthesize `request` and start playing it.
    ///
    /// Any live session is stopped first. Resolves
    /// [`SpeakOutcome::Cancelled`] if this request is itself superseded or
    /// stopped before audio starts.
    pub async fn speak(&self, request: SpeakRequest) -> SpeechResult<SpeakOutcome> {
        if !request.has_text() {
            return Err(SpeechError::EmptyText);
        }

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        self.begin(id, cancel.clone());

        // Releases the slot if this future is dropped mid-request.
        let guard = RequestGuard {
            shared: self.shared.as_ref(),
            id,
            armed: true,
        };
        let result = self.run(id, &cancel, &request).await;
        guard.disarm();

        match result {
            Ok(SpeakOutcome::Cancelled) => {
                // No-op when a newer request owns the slot.
                self.shared.finish_if_current(id, SessionState::Stopped);
                debug!(session = %id, "Speak request cancelled");
                Ok(SpeakOutcome::Cancelled)
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if self.shared.finish_if_current(id, SessionState::Failed) {
                    warn!(session = %id, error = %e, "Speak request failed");
                    Err(e)
                } else {
                    // Superseded while failing: the newer request owns the slot.
                    Ok(SpeakOutcome::Cancelled)
                }
            }
        }
    }

    /// Stop the current session, if any.
    ///
    /// Idempotent. Cancels in-flight network requests, halts and unloads
    /// audio, and moves the session to `Stopped`.
    pub fn stop(&self) {
        let evicted = {
            let mut slot = self.shared.slot();
            let Some(id) = slot.id().filter(|_| slot.is_live()) else {
                return;
            };
            Evicted::from_slot(std::mem::replace(
                &mut *slot,
                Slot::Finished {
                    id,
                    state: SessionState::Stopped,
                },
            ))
        };

        if let Some(evicted) = evicted {
            info!(session = %evicted.id(), "Stopping speech session");
            self.shared.tear_down(evicted);
        }
    }

    /// Install `id` as the requesting session, evicting any live one.
    fn begin(&self, id: SessionId, cancel: CancellationToken) {
        let evicted = {
            let mut slot = self.shared.slot();
            debug_assert!(
                slot.is_live() || slot.state().can_transition_to(SessionState::Requesting)
            );
            Evicted::from_slot(std::mem::replace(
                &mut *slot,
                Slot::Requesting { id, cancel },
            ))
        };

        if let Some(evicted) = evicted {
            info!(previous = %evicted.id(), session = %id, "Superseding live speech session");
            self.shared.tear_down(evicted);
        }
        self.shared.emit_state(id, SessionState::Requesting);
    }

    async fn run(
        &self,
        id: SessionId,
        cancel: &CancellationToken,
        request: &SpeakRequest,
    ) -> SpeechResult<SpeakOutcome> {
        let credential = api_key(self.credentials.as_ref())?;
        let resolved = resolve_request(request, self.credentials.as_ref())?;

        info!(
            session = %id,
            voice_id = %resolved.voice_id,
            model_id = %resolved.model_id,
            chars = resolved.text.chars().count(),
            "Starting speech synthesis"
        );

        let Some((audio, alignment)) = self.synthesize(id, &resolved, &credential, cancel).await?
        else {
            return Ok(SpeakOutcome::Cancelled);
        };

        self.install(id, cancel, resolved, audio, alignment).await
    }

    // ── Synthesis with fallback ────────────────────────────────────

    /// Timed synthesis, falling back to plain synthesis plus estimation.
    ///
    /// Returns `None` if cancelled.
    async fn synthesize(
        &self,
        id: SessionId,
        request: &SynthesisRequest,
        credential: &str,
        cancel: &CancellationToken,
    ) -> SpeechResult<Option<(Vec<u8>, AlignmentTrack)>> {
        let primary = race(
            cancel,
            self.backend.synthesize_timed(request, credential, cancel),
        )
        .await;

        let primary_error = match primary {
            None => return Ok(None),
            Some(Ok(timed)) => match timed.alignment {
                Some(payload) => match AlignmentProvider::from_exact(&payload) {
                    Ok(track) => return Ok(Some((timed.audio, track))),
                    Err(e) => e,
                },
                None => {
                    debug!(session = %id, "Timed response had no alignment, estimating");
                    let track = AlignmentProvider::estimate_from_text(&request.text);
                    return Ok(Some((timed.audio, track)));
                }
            },
            Some(Err(e)) => SpeechError::Backend(e),
        };

        warn!(
            session = %id,
            error = %primary_error,
            "Timed synthesis failed, falling back to plain synthesis"
        );
        self.shared.emit(SpeechEvent::Fallback {
            session: id,
            reason: primary_error.to_string(),
        });

        match race(cancel, self.backend.synthesize_plain(request, credential, cancel)).await {
            None => Ok(None),
            Some(Ok(audio)) => {
                let track = AlignmentProvider::estimate_from_text(&request.text);
                Ok(Some((audio, track)))
            }
            Some(Err(secondary)) => Err(SpeechError::Network {
                primary: Box::new(primary_error),
                secondary,
            }),
        }
    }

    // ── Install ────────────────────────────────────────────────────

    async fn install(
        &self,
        id: SessionId,
        cancel: &CancellationToken,
        request: SynthesisRequest,
        audio: Vec<u8>,
        alignment: AlignmentTrack,
    ) -> SpeechResult<SpeakOutcome> {
        let _install = self.install_lock.lock().await;

        if !self.shared.is_current(id) {
            return Ok(SpeakOutcome::Cancelled);
        }

        let loaded = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(SpeakOutcome::Cancelled),
            loaded = self.engine.load(AudioSource::Bytes(audio)) => loaded,
        };
        let playback = loaded.map_err(|e| SpeechError::Playback(e.to_string()))?;

        let session = SessionHandle::new(id, request, alignment, playback);

        {
            let mut slot = self.shared.slot();
            let still_current = matches!(&*slot, Slot::Requesting { id: current, .. } if *current == id);
            if !still_current {
                drop(slot);
                session.terminate(SessionState::Stopped);
                return Ok(SpeakOutcome::Cancelled);
            }

            if let Err(e) = session.start() {
                drop(slot);
                session.terminate(SessionState::Failed);
                return Err(SpeechError::Playback(e.to_string()));
            }

            debug_assert!(slot.state().can_transition_to(SessionState::Playing));
            *slot = Slot::Playing {
                session: session.clone(),
                cancel: cancel.clone(),
            };
        }

        info!(
            session = %id,
            entries = session.alignment().len(),
            estimated = session.alignment().is_estimated(),
            "Speech playback started"
        );
        self.shared.emit_state(id, SessionState::Playing);
        self.spawn_completion_watcher(&session);

        Ok(SpeakOutcome::Started(session))
    }

    /// Watch the engine status and resolve the session when audio ends.
    fn spawn_completion_watcher(&self, session: &SessionHandle) {
        let shared = Arc::clone(&self.shared);
        let id = session.id();
        let mut status = session.playback_status();

        tokio::spawn(async move {
            let ended = status.wait_for(|s| s.is_done()).await.map(|s| *s);
            let state = match ended {
                Ok(PlaybackStatus::Finished) => SessionState::Completed,
                Ok(PlaybackStatus::Failed) | Err(_) => SessionState::Failed,
                // Stopped/unloaded by teardown; the manager already resolved it.
                Ok(_) => return,
            };

            if shared.finish_if_current(id, state) {
                info!(session = %id, state = state.label(), "Speech playback ended");
            }
        });
    }
}

/// Resolves an abandoned request to `Stopped` when dropped while armed.
struct RequestGuard<'a> {
    shared: &'a Shared,
    id: SessionId,
    armed: bool,
}

impl RequestGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.shared.finish_if_current(self.id, SessionState::Stopped) {
            debug!(session = %self.id, "Speak future dropped, request abandoned");
        }
    }
}

/// Run `fut` unless `cancel` fires first; a backend-reported cancellation
/// counts as cancelled too.
async fn race<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, BackendError>>,
) -> Option<Result<T, BackendError>> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = fut => match result {
            Err(BackendError::Cancelled) => None,
            other => Some(other),
        },
    }
}
