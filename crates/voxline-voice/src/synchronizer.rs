//! Playback synchroniser: audio position → highlighted text entry.
//!
//! [`PlaybackSynchronizer::tick`] is a single-shot query a UI can call from
//! its own frame loop. [`PlaybackSynchronizer::watch`] drives the same query
//! from a [`TICK_PERIOD`] interval and yields only when the highlighted
//! entry changes.

use std::time::Duration;

use async_stream::stream;
use futures_util::Stream;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use voxline_core::{SessionId, SyncCursor, SyncTick, TICK_PERIOD};

use crate::session::SessionHandle;

/// Tracks the cursor across ticks for one session at a time.
#[derive(Debug, Default)]
pub struct PlaybackSynchronizer {
    cursor: SyncCursor,
    session: Option<SessionId>,
}

impl PlaybackSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the session's current playback position onto its alignment track.
    ///
    /// A dead session yields [`SyncTick::NONE`]; switching to a different
    /// session resets the scroll memory.
    pub fn tick(&mut self, session: &SessionHandle) -> SyncTick {
        if self.session != Some(session.id()) {
            self.cursor.reset();
            self.session = Some(session.id());
        }

        let Some(position) = session.position_seconds() else {
            self.cursor.reset();
            return SyncTick::NONE;
        };
        self.cursor.advance(session.alignment(), position)
    }

    /// Stream ticks for `session` every [`TICK_PERIOD`].
    pub fn watch(
        session: SessionHandle,
        cancel: CancellationToken,
    ) -> impl Stream<Item = SyncTick> {
        Self::watch_every(session, TICK_PERIOD, cancel)
    }

    /// Stream ticks for `session` every `period`.
    ///
    /// Yields only when the highlighted index changes. When the session
    /// dies a final [`SyncTick::NONE`] is yielded (if something was
    /// highlighted) and the stream ends. Also ends when `cancel` fires.
    pub fn watch_every(
        session: SessionHandle,
        period: Duration,
        cancel: CancellationToken,
    ) -> impl Stream<Item = SyncTick> {
        stream! {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut sync = Self::new();
            let mut last_index: Option<usize> = None;

            debug!(session = %session.id(), entries = session.alignment().len(), "Starting playback sync");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !session.is_live() {
                            if last_index.is_some() {
                                yield SyncTick::NONE;
                            }
                            debug!(session = %session.id(), "Session ended, stopping playback sync");
                            break;
                        }

                        let tick = sync.tick(&session);
                        if tick.index != last_index {
                            last_index = tick.index;
                            yield tick;
                        }
                    }
                    () = cancel.cancelled() => {
                        debug!(session = %session.id(), "Playback sync cancelled");
                        break;
                    }
                }
            }
        }
    }
}
