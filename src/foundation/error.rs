/// Convenience result type used across captionfx.
pub type CaptionFxResult<T> = Result<T, CaptionFxError>;

/// Top-level error taxonomy.
///
/// Per-frame input variance (odd timings, degenerate widths) never surfaces here;
/// these variants cover configuration-time problems that should stop a render.
#[derive(thiserror::Error, Debug)]
pub enum CaptionFxError {
    /// Invalid user-provided job, caption or style data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A font could not be loaded or a family was requested that was never loaded.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while evaluating caption state for a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionFxError {
    /// Build a [`CaptionFxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptionFxError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`CaptionFxError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CaptionFxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
