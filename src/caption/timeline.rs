//! Per-frame read-state derivation for caption tokens.
//!
//! Everything here is a pure function of `(current_ms, page)`: nothing is cached
//! between frames, so frames can be evaluated in any order and on any thread.

use crate::{
    caption::model::{Page, Token},
    foundation::core::Fps,
};

/// Where a token sits relative to the playhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    NotYetRead,
    CurrentlyReading,
    HasBeenRead,
}

/// Page-local playback time for `frame`: `frame / fps * 1000`.
pub fn time_ms_for_frame(frame: u64, fps: Fps) -> f64 {
    fps.frame_to_ms(frame)
}

/// Classify `token` at page-local time `current_ms`.
///
/// Token times are global; they are made page-relative by subtracting
/// `page_start_ms`. The active interval is half-open `[start, end)`.
/// NaN time and malformed spans (negative start, `to_ms <= from_ms`) fall
/// back to [`ReadState::NotYetRead`].
pub fn classify(current_ms: f64, token: &Token, page_start_ms: i64) -> ReadState {
    if current_ms.is_nan() || !token.is_well_formed() {
        return ReadState::NotYetRead;
    }
    let page_start = page_start_ms as f64;
    let start_rel = token.from_ms as f64 - page_start;
    let end_rel = token.to_ms as f64 - page_start;
    if current_ms < start_rel {
        ReadState::NotYetRead
    } else if current_ms < end_rel {
        ReadState::CurrentlyReading
    } else {
        ReadState::HasBeenRead
    }
}

/// Classify every token of `page`, in token order.
pub fn classify_page(current_ms: f64, page: &Page) -> Vec<ReadState> {
    page.tokens
        .iter()
        .map(|t| classify(current_ms, t, page.start_ms))
        .collect()
}

/// Index of the first token being read at `current_ms`, if any.
pub fn active_token_index(current_ms: f64, page: &Page) -> Option<usize> {
    page.tokens
        .iter()
        .position(|t| classify(current_ms, t, page.start_ms) == ReadState::CurrentlyReading)
}

/// Clamp an externally supplied progress value into `[0, 1]`. NaN maps to 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Progressive reveal: token `index` of `count` is shown once
/// `index / count <= progress` (progress clamped first).
pub fn revealed_by_progress(index: usize, count: usize, progress: f64) -> bool {
    if count == 0 {
        return false;
    }
    (index as f64) / (count as f64) <= clamp_progress(progress)
}

/// Linear entry progress after `elapsed_ms` of an entry lasting `entry_duration_ms`.
pub fn enter_progress(elapsed_ms: f64, entry_duration_ms: f64) -> f64 {
    if elapsed_ms.is_nan() {
        return 0.0;
    }
    if entry_duration_ms.is_nan() || entry_duration_ms <= 0.0 {
        return if elapsed_ms >= 0.0 { 1.0 } else { 0.0 };
    }
    clamp_progress(elapsed_ms / entry_duration_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/caption/timeline.rs"]
mod tests;
