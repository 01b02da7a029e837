//! Pure playback-position → text-cursor mapping.
//!
//! Nothing here touches a timer or an audio engine: the live driver in
//! `voxline-voice` queries the engine position and feeds it to
//! [`SyncCursor::advance`].

use std::time::Duration;

use crate::domain::AlignmentTrack;

/// Scroll hints fire when the cursor lands on a multiple of this many entries.
pub const SCROLL_STRIDE: usize = 20;

/// Period of the live synchronisation tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(50);

/// Result of one synchronisation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncTick {
    /// Highlighted entry, or `None` when nothing should be highlighted.
    pub index: Option<usize>,
    /// Whether the presentation layer should recompute its scroll position.
    pub should_scroll: bool,
}

impl SyncTick {
    /// No highlight, no scroll.
    pub const NONE: Self = Self {
        index: None,
        should_scroll: false,
    };

    /// The index as a signed integer, `-1` meaning "no highlight".
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn signed_index(&self) -> i64 {
        self.index.map_or(-1, |i| i as i64)
    }
}

/// Find the entry being spoken at `position_seconds`.
///
/// Returns the greatest index whose start is at or before the position, the
/// last index once the position passes the final start, and `None` at
/// position zero, before the first start, or for an empty track.
#[must_use]
pub fn cursor_index(track: &AlignmentTrack, position_seconds: f64) -> Option<usize> {
    // `!(x > 0.0)` also rejects NaN
    if track.is_empty() || !(position_seconds > 0.0) {
        return None;
    }
    let started = track
        .entries()
        .partition_point(|e| e.start_seconds <= position_seconds);
    started.checked_sub(1)
}

/// Whether `index` is a scroll point.
#[must_use]
pub const fn is_scroll_point(index: usize) -> bool {
    index > 0 && index % SCROLL_STRIDE == 0
}

/// Cursor state carried between ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncCursor {
    previous: Option<usize>,
}

impl SyncCursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Index returned by the previous tick.
    #[must_use]
    pub const fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Compute the tick for `position_seconds` and remember its index.
    pub fn advance(&mut self, track: &AlignmentTrack, position_seconds: f64) -> SyncTick {
        let index = cursor_index(track, position_seconds);
        let should_scroll = index != self.previous && index.is_some_and(is_scroll_point);
        self.previous = index;
        SyncTick {
            index,
            should_scroll,
        }
    }

    /// Forget the previous index (new session or dead session).
    pub const fn reset(&mut self) {
        self.previous = None;
    }
}
