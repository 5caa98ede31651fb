use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    caption::{model::CaptionTrack, schedule::PageSchedule},
    foundation::{
        core::{Canvas, Fps, FrameIndex, FrameRange},
        error::{CaptionFxError, CaptionFxResult},
    },
    style::preset::{StyleDescriptor, builtin_style},
    text::{fit::TextTransform, fonts::FontBook},
};

/// Pages switch after at most this long.
pub const DEFAULT_MAX_PAGE_MS: f64 = 1200.0;

fn default_max_page_ms() -> Option<f64> {
    Some(DEFAULT_MAX_PAGE_MS)
}

/// A built-in style by name, or a full inline descriptor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StyleRef {
    Named(String),
    Inline(Box<StyleDescriptor>),
}

impl Default for StyleRef {
    fn default() -> Self {
        Self::Named("classic".to_owned())
    }
}

impl StyleRef {
    pub fn resolve(&self) -> CaptionFxResult<StyleDescriptor> {
        match self {
            Self::Named(name) => builtin_style(name),
            Self::Inline(style) => Ok(style.as_ref().clone()),
        }
    }
}

/// Caption evaluation job, usually loaded from JSON.
///
/// ```json
/// {
///   "canvas": { "width": 1080, "height": 1920 },
///   "fps": { "num": 30, "den": 1 },
///   "fonts": ["fonts/TheBoldFont.ttf"],
///   "font_family": "The Bold Font",
///   "style": "neon-glow",
///   "captions_path": "captions.json"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptionJob {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Frames to evaluate; defaults to the end of the last page window.
    #[serde(default)]
    pub duration_frames: Option<u64>,
    /// Longest time a page stays on screen; `null` keeps pages until the next one.
    #[serde(default = "default_max_page_ms")]
    pub max_page_ms: Option<f64>,
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
    pub font_family: String,
    /// Overrides the style's own text transform.
    #[serde(default)]
    pub text_transform: Option<TextTransform>,
    #[serde(default)]
    pub style: StyleRef,
    #[serde(default)]
    pub pages: Option<CaptionTrack>,
    #[serde(default)]
    pub captions_path: Option<PathBuf>,
}

impl CaptionJob {
    pub fn from_json_str(s: &str) -> CaptionFxResult<Self> {
        serde_json::from_str(s).map_err(|e| CaptionFxError::serde(e.to_string()))
    }

    /// Load a job file. Relative font and caption paths resolve against the
    /// job file's directory.
    pub fn from_path(path: &Path) -> CaptionFxResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read caption job '{}'", path.display()))?;
        let mut job = Self::from_json_str(&text)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        job.resolve_paths(root);
        Ok(job)
    }

    pub fn resolve_paths(&mut self, root: &Path) {
        for font in &mut self.fonts {
            if font.is_relative() {
                *font = root.join(&*font);
            }
        }
        if let Some(p) = &mut self.captions_path
            && p.is_relative()
        {
            *p = root.join(&*p);
        }
    }

    /// Configuration checks that need no file access.
    pub fn validate(&self) -> CaptionFxResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.font_family.trim().is_empty() {
            return Err(CaptionFxError::validation("font_family must be non-empty"));
        }
        if let Some(ms) = self.max_page_ms
            && !(ms.is_finite() && ms > 0.0)
        {
            return Err(CaptionFxError::validation(format!(
                "max_page_ms must be finite and > 0 when set (got {ms})"
            )));
        }
        match (&self.pages, &self.captions_path) {
            (Some(_), Some(_)) => {
                return Err(CaptionFxError::validation(
                    "set either 'pages' or 'captions_path', not both",
                ));
            }
            (None, None) => {
                return Err(CaptionFxError::validation(
                    "one of 'pages' or 'captions_path' is required",
                ));
            }
            (Some(track), None) => track.validate()?,
            (None, Some(_)) => {}
        }
        self.resolve_style()?.validate()
    }

    pub fn resolve_style(&self) -> CaptionFxResult<StyleDescriptor> {
        let mut style = self.style.resolve()?;
        if let Some(t) = self.text_transform {
            style.text_transform = t;
        }
        Ok(style)
    }

    pub fn load_track(&self) -> CaptionFxResult<CaptionTrack> {
        let track = match (&self.pages, &self.captions_path) {
            (Some(track), _) => track.clone(),
            (None, Some(path)) => CaptionTrack::from_path(path)?,
            (None, None) => {
                return Err(CaptionFxError::validation(
                    "one of 'pages' or 'captions_path' is required",
                ));
            }
        };
        track.validate()?;
        Ok(track)
    }

    /// Load every listed font. Missing files and an unknown `font_family` are fatal.
    pub fn load_fonts(&self) -> CaptionFxResult<FontBook> {
        let mut book = FontBook::new();
        for path in &self.fonts {
            if path.is_dir() {
                book.load_dir(path)?;
            } else {
                book.load_file(path)?;
            }
        }
        book.require(&self.font_family)?;
        Ok(book)
    }

    /// Validate, load captions, and resolve the style and page schedule.
    #[tracing::instrument(skip_all)]
    pub fn prepare(&self) -> CaptionFxResult<PreparedJob> {
        self.validate()?;
        let track = self.load_track()?;
        let style = self.resolve_style()?;
        let schedule = PageSchedule::new(&track, self.fps, self.max_page_ms);
        let duration = self
            .duration_frames
            .unwrap_or_else(|| schedule.end_frame().0);
        tracing::debug!(
            pages = track.pages.len(),
            style = %style.name,
            duration,
            "prepared caption job"
        );
        Ok(PreparedJob {
            canvas: self.canvas,
            fps: self.fps,
            duration: FrameIndex(duration),
            font_family: self.font_family.trim().to_owned(),
            style,
            track,
            schedule,
        })
    }
}

/// A validated job with captions loaded; the input to evaluation.
#[derive(Clone, Debug)]
pub struct PreparedJob {
    pub canvas: Canvas,
    pub fps: Fps,
    pub duration: FrameIndex,
    pub font_family: String,
    pub style: StyleDescriptor,
    pub track: CaptionTrack,
    pub schedule: PageSchedule,
}

impl PreparedJob {
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: self.duration,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/job.rs"]
mod tests;
