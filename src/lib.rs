//! captionfx derives animated, word-by-word caption state for video frames.
//!
//! Given time-stamped word tokens grouped into pages, captionfx decides for
//! every output frame which page is on screen, which words are upcoming,
//! active or already read, how far the page entrance has progressed, what font
//! size fits the line, and how a caption style dresses each word.
//!
//! # Pipeline overview
//!
//! 1. **Schedule**: `CaptionTrack + FrameIndex -> ScheduledFrame` (which page, page-local time)
//! 2. **Classify**: `current_ms + Page -> [ReadState]` (pure, per token, half-open spans)
//! 3. **Fit**: `Page text + max width -> font size` (once per page, behind [`TextMeasure`])
//! 4. **Present**: `StyleDescriptor + states -> PresentedPage` (per-word visual attributes)
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a frame evaluates identically in any order, on any
//!   thread; decorative randomness is keyed on token and frame.
//! - **Resolution independent**: every length is a fraction of the canvas.
//! - **Fonts up front**: fonts load once at startup and missing fonts are fatal.
#![forbid(unsafe_code)]

mod animation;
mod caption;
mod eval;
mod foundation;
mod style;
mod text;

pub use animation::ease::Ease;
pub use animation::enter::EnterCurve;
pub use animation::spring::Spring;
pub use caption::model::{CaptionTrack, Page, Token};
pub use caption::schedule::{PageSchedule, PageWindow, ScheduledFrame};
pub use caption::timeline::{
    ReadState, active_token_index, clamp_progress, classify, classify_page, enter_progress,
    revealed_by_progress, time_ms_for_frame,
};
pub use eval::fingerprint::{FrameFingerprint, fingerprint_inputs, fingerprint_page};
pub use eval::job::{CaptionJob, DEFAULT_MAX_PAGE_MS, PreparedJob, StyleRef};
pub use eval::pipeline::{
    CaptionFrame, EvalStats, EvalThreading, evaluate_frame, evaluate_frames,
    evaluate_frames_with_measurer, evaluate_frames_with_stats,
};
pub use foundation::core::{Affine, Canvas, Fps, FrameIndex, FrameRange, Vec2};
pub use foundation::error::{CaptionFxError, CaptionFxResult};
pub use foundation::math::{interpolate, lerp, random, random_at};
pub use style::color::ColorDef;
pub use style::layout::{ContainerBox, LayoutFractions, ResponsiveLayout};
pub use style::preset::{
    BUILTIN_STYLE_NAMES, Bounce, Decorations, EnterAnimation, Glitch, Glow, MAX_PARTICLES, Orbit,
    Palette, Particles, Pulse, RevealMode, StyleDescriptor, WordLook, WordLooks, builtin_style,
    builtin_styles,
};
pub use style::presenter::{
    FrameContext, Particle, PresentInputs, PresentedOrbit, PresentedPage, PresentedWord,
    StylePresenter,
};
pub use text::fit::{
    FitResult, MIN_FONT_SIZE, MonospaceMetrics, REFERENCE_FONT_SIZE, TextFitter, TextMeasure,
    TextTransform, UNCONSTRAINED_FONT_SIZE, final_font_size,
};
pub use text::fonts::{FontBook, FontFace, ParleyMeasurer};
