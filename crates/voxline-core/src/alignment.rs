//! Alignment provider: builds [`AlignmentTrack`]s from backend payloads.
//!
//! Two paths:
//!
//! - **Exact**: the timed backend returned per-character start times; they are
//!   validated and copied verbatim.
//! - **Estimated**: only audio came back; a word-proportional track is derived
//!   from the text. This is an approximation biased toward readability, not a
//!   phoneme model, and the formula is reproduced exactly:
//!
//! ```text
//!   slice(word) = (len(word) / len(text)) × (2 × total / word_count)
//!   start(word_0) = 0, start(word_n) = start(word_{n-1}) + slice(word_{n-1})
//! ```

use crate::domain::{AlignmentMode, AlignmentTrack, CharacterTiming, ExactAlignment};
use crate::error::SpeechError;

/// Seconds of audio assumed per character when no authoritative duration exists.
pub const SECONDS_PER_CHARACTER: f64 = 0.05;

/// Builds alignment tracks. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentProvider;

impl AlignmentProvider {
    /// Map a server-supplied alignment onto a track.
    ///
    /// Fails with [`SpeechError::MalformedAlignment`] when the character and
    /// timing lists disagree in length, or when a start time is negative,
    /// non-finite, or earlier than its predecessor.
    pub fn from_exact(payload: &ExactAlignment) -> Result<AlignmentTrack, SpeechError> {
        let chars = payload.characters.len();
        let times = payload.character_start_times_seconds.len();
        if chars != times {
            return Err(SpeechError::MalformedAlignment(format!(
                "{chars} characters but {times} start times"
            )));
        }

        let mut previous = 0.0_f64;
        let mut entries = Vec::with_capacity(chars);
        for (i, (character, &start)) in payload
            .characters
            .iter()
            .zip(&payload.character_start_times_seconds)
            .enumerate()
        {
            if !start.is_finite() || start < 0.0 {
                return Err(SpeechError::MalformedAlignment(format!(
                    "invalid start time {start} at index {i}"
                )));
            }
            if start < previous {
                return Err(SpeechError::MalformedAlignment(format!(
                    "start time {start} at index {i} precedes {previous}"
                )));
            }
            previous = start;
            entries.push(CharacterTiming {
                character: character.clone(),
                start_seconds: start,
            });
        }

        Ok(AlignmentTrack::new(AlignmentMode::Exact, entries))
    }

    /// Estimate a per-word track for `text` spanning `total_duration_seconds`.
    ///
    /// Returns an empty estimated track for text without words. Starts never
    /// exceed `total_duration_seconds`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate(text: &str, total_duration_seconds: f64) -> AlignmentTrack {
        let text_len = text.chars().count();
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() || text_len == 0 {
            return AlignmentTrack::new(AlignmentMode::Estimated, Vec::new());
        }

        let total = total_duration_seconds.max(0.0);
        let per_word_scale = 2.0 * total / words.len() as f64;

        let mut start = 0.0_f64;
        let entries = words
            .iter()
            .map(|word| {
                let word_len = word.chars().count();
                let entry = CharacterTiming {
                    character: word.chars().next().map(String::from).unwrap_or_default(),
                    start_seconds: start.min(total),
                };
                start += (word_len as f64 / text_len as f64) * per_word_scale;
                entry
            })
            .collect();

        AlignmentTrack::new(AlignmentMode::Estimated, entries)
    }

    /// Canonical duration for estimation: 50 ms per character.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimated_duration(text: &str) -> f64 {
        text.chars().count() as f64 * SECONDS_PER_CHARACTER
    }

    /// Estimate using [`Self::estimated_duration`] as the total.
    #[must_use]
    pub fn estimate_from_text(text: &str) -> AlignmentTrack {
        Self::estimate(text, Self::estimated_duration(text))
    }
}
