//! Word count and reading time estimation.

use serde::Serialize;

/// Default reading speed (words per minute).
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Count whitespace-delimited tokens.
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated time to read a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingTime {
    /// Display text, e.g. `3 min read`.
    pub text: String,
    /// Exact minutes (`words / wpm`).
    pub minutes: f64,
    /// Milliseconds.
    pub time: u64,
    pub words: usize,
}

impl ReadingTime {
    /// Estimate from a word count. `words_per_minute` must be non-zero.
    pub fn estimate(words: usize, words_per_minute: u32) -> Self {
        let wpm = words_per_minute.max(1);
        let minutes = words as f64 / f64::from(wpm);
        // Integer ceiling, free of float noise
        let displayed = words.div_ceil(wpm as usize);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time = (minutes * 60_000.0).round() as u64;

        Self {
            text: format!("{displayed} min read"),
            minutes,
            time,
            words,
        }
    }
}
