//! Alignment track types: playback time → text position.

use serde::{Deserialize, Serialize};

/// How an alignment track was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignmentMode {
    /// Server-supplied per-character timestamps.
    Exact,
    /// Word-proportional approximation from text structure.
    Estimated,
}

/// One entry of an alignment track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTiming {
    /// The character (exact mode) or the first character of a word (estimated mode).
    pub character: String,
    /// When this entry starts, in seconds from the beginning of the audio.
    pub start_seconds: f64,
}

/// Exact per-character timing as delivered by the backend, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExactAlignment {
    pub characters: Vec<String>,
    pub character_start_times_seconds: Vec<f64>,
}

/// Ordered, non-decreasing timing track owned by a single session.
///
/// Built only by [`AlignmentProvider`](crate::alignment::AlignmentProvider),
/// which guarantees the ordering invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentTrack {
    mode: AlignmentMode,
    entries: Vec<CharacterTiming>,
}

impl AlignmentTrack {
    pub(crate) const fn new(mode: AlignmentMode, entries: Vec<CharacterTiming>) -> Self {
        Self { mode, entries }
    }

    #[must_use]
    pub const fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Whether the timings are lower-fidelity estimates.
    #[must_use]
    pub fn is_estimated(&self) -> bool {
        self.mode == AlignmentMode::Estimated
    }

    #[must_use]
    pub fn entries(&self) -> &[CharacterTiming] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CharacterTiming> {
        self.entries.last()
    }

    /// Iterate over entry start times.
    pub fn starts(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.start_seconds)
    }
}
