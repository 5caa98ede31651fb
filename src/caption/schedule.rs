use crate::{
    caption::model::CaptionTrack,
    foundation::core::{Fps, FrameIndex, FrameRange},
};

/// On-screen frame window of one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PageWindow {
    pub page_index: usize,
    /// The page's own start time; page-local time is measured from here.
    pub start_ms: i64,
    pub frames: FrameRange,
}

/// Resolved position of a global frame inside the page that is on screen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScheduledFrame {
    pub page_index: usize,
    /// Frames since the page appeared.
    pub frame_in_page: u64,
    /// Page-local playback time fed to the timeline: the frame's time minus the
    /// page's `start_ms`. Slightly negative on a first frame that precedes
    /// `start_ms`.
    pub current_ms: f64,
}

/// Maps global frames to pages.
///
/// Each page starts at its own `start_ms` and stays until the next page starts,
/// or until `max_page_ms` has elapsed, whichever comes first. Without a cap the
/// last page stays until its last token ends.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSchedule {
    fps: Fps,
    windows: Vec<PageWindow>,
}

impl PageSchedule {
    pub fn new(track: &CaptionTrack, fps: Fps, max_page_ms: Option<f64>) -> Self {
        let cap = max_page_ms.filter(|m| m.is_finite() && *m > 0.0);
        let starts: Vec<u64> = track
            .pages
            .iter()
            .map(|p| fps.ms_to_frames_floor(p.start_ms as f64))
            .collect();

        let mut windows = Vec::with_capacity(track.pages.len());
        for (i, page) in track.pages.iter().enumerate() {
            let start_ms = page.start_ms as f64;
            let end_ms = match (track.pages.get(i + 1), cap) {
                (Some(next), Some(c)) => (next.start_ms as f64).min(start_ms + c),
                (Some(next), None) => next.start_ms as f64,
                (None, Some(c)) => start_ms + c,
                (None, None) => page
                    .tokens
                    .iter()
                    .map(|t| t.to_ms as f64)
                    .fold(start_ms, f64::max),
            };

            let start = starts[i];
            let mut end = fps.ms_to_frames_floor(end_ms).max(start + 1);
            if let Some(&next_start) = starts.get(i + 1) {
                end = end.min(next_start).max(start);
            }
            if end == start {
                tracing::debug!(page = i, "page is shadowed by the next page and never shown");
            }
            windows.push(PageWindow {
                page_index: i,
                start_ms: page.start_ms,
                frames: FrameRange {
                    start: FrameIndex(start),
                    end: FrameIndex(end),
                },
            });
        }

        Self { fps, windows }
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn windows(&self) -> &[PageWindow] {
        &self.windows
    }

    /// First frame after the last page window.
    pub fn end_frame(&self) -> FrameIndex {
        self.windows
            .iter()
            .map(|w| w.frames.end)
            .max()
            .unwrap_or(FrameIndex(0))
    }

    /// Page on screen at global `frame`, if any.
    pub fn locate(&self, frame: FrameIndex) -> Option<ScheduledFrame> {
        let after = self
            .windows
            .partition_point(|w| w.frames.start.0 <= frame.0);
        let window = self.windows[..after]
            .iter()
            .rev()
            .find(|w| !w.frames.is_empty())?;
        if !window.frames.contains(frame) {
            return None;
        }
        let frame_in_page = frame.0 - window.frames.start.0;
        Some(ScheduledFrame {
            page_index: window.page_index,
            frame_in_page,
            current_ms: self.fps.frame_to_ms(frame.0) - window.start_ms as f64,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/schedule.rs"]
mod tests;
