use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CaptionFxError, CaptionFxResult};

/// A single transcribed word with its time span on the global timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub from_ms: i64,
    pub to_ms: i64, // exclusive
}

impl Token {
    pub fn new(text: impl Into<String>, from_ms: i64, to_ms: i64) -> Self {
        Self {
            text: text.into(),
            from_ms,
            to_ms,
        }
    }

    /// `true` when the span is usable: non-negative start and `to_ms > from_ms`.
    pub fn is_well_formed(&self) -> bool {
        self.from_ms >= 0 && self.to_ms > self.from_ms
    }
}

/// A block of tokens shown on screen together.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub text: String,
    pub start_ms: i64,
    pub tokens: Vec<Token>,
}

impl Page {
    /// Build a page whose sizing text is the concatenation of its tokens.
    pub fn from_tokens(start_ms: i64, tokens: Vec<Token>) -> Self {
        let text = tokens.iter().map(|t| t.text.as_str()).collect();
        Self {
            text,
            start_ms,
            tokens,
        }
    }

    /// Text used for fitting. Falls back to the token concatenation when the
    /// page carries no explicit text.
    pub fn sizing_text(&self) -> std::borrow::Cow<'_, str> {
        if self.text.is_empty() {
            std::borrow::Cow::Owned(self.tokens.iter().map(|t| t.text.as_str()).collect())
        } else {
            std::borrow::Cow::Borrowed(self.text.as_str())
        }
    }

    /// Describe timing problems without rejecting the page.
    ///
    /// Malformed tokens still render (they evaluate as not-yet-read), so these
    /// are reported for logging only.
    pub fn timing_issues(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (i, t) in self.tokens.iter().enumerate() {
            if !t.is_well_formed() {
                out.push(format!(
                    "token {i} ({:?}) has invalid span {}..{}",
                    t.text, t.from_ms, t.to_ms
                ));
            }
        }
        for (i, pair) in self.tokens.windows(2).enumerate() {
            if pair[1].from_ms < pair[0].from_ms {
                out.push(format!("token {} starts before token {i}", i + 1));
            } else if pair[1].from_ms < pair[0].to_ms {
                out.push(format!("token {} overlaps token {i}", i + 1));
            }
        }
        out
    }
}

/// Ordered pages for one video.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CaptionTrack {
    pub pages: Vec<Page>,
}

impl CaptionTrack {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn from_json_str(s: &str) -> CaptionFxResult<Self> {
        serde_json::from_str(s).map_err(|e| CaptionFxError::serde(format!("captions: {e}")))
    }

    pub fn from_path(path: &Path) -> CaptionFxResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read captions '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Structural checks; timing oddities are logged, not rejected.
    pub fn validate(&self) -> CaptionFxResult<()> {
        for (i, page) in self.pages.iter().enumerate() {
            if page.start_ms < 0 {
                return Err(CaptionFxError::validation(format!(
                    "page {i} startMs must be >= 0"
                )));
            }
            for issue in page.timing_issues() {
                tracing::warn!(page = i, "{issue}");
            }
        }
        for (i, pair) in self.pages.windows(2).enumerate() {
            if pair[1].start_ms < pair[0].start_ms {
                return Err(CaptionFxError::validation(format!(
                    "page {} starts before page {i}; pages must be ordered by startMs",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    pub fn end_ms(&self) -> i64 {
        self.pages
            .iter()
            .flat_map(|p| p.tokens.iter().map(|t| t.to_ms))
            .chain(self.pages.iter().map(|p| p.start_ms))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/model.rs"]
mod tests;
