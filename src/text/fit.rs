use std::borrow::Cow;

use crate::foundation::error::CaptionFxResult;

/// Size at which text is first measured before extrapolating.
pub const REFERENCE_FONT_SIZE: f64 = 100.0;
/// Smallest size ever returned for constrained text.
pub const MIN_FONT_SIZE: f64 = 1.0;
/// Returned when the text imposes no width constraint (empty or zero-width text).
pub const UNCONSTRAINED_FONT_SIZE: f64 = f64::MAX;

const SIZE_TOLERANCE: f64 = 0.01;
const MAX_REFINE_STEPS: usize = 64;

/// Case transform applied before measuring; case changes glyph widths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::None => Cow::Borrowed(text),
            Self::Uppercase => Cow::Owned(text.to_uppercase()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FitResult {
    pub font_size: f64,
}

impl FitResult {
    pub fn unconstrained() -> Self {
        Self {
            font_size: UNCONSTRAINED_FONT_SIZE,
        }
    }

    pub fn is_constrained(self) -> bool {
        self.font_size < UNCONSTRAINED_FONT_SIZE
    }
}

/// Single-line advance width of shaped text.
pub trait TextMeasure {
    /// Width in pixels of `text` set on one line in `family` at `size_px`.
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> CaptionFxResult<f64>;
}

impl<M: TextMeasure + ?Sized> TextMeasure for &mut M {
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> CaptionFxResult<f64> {
        (**self).measure(text, family, size_px)
    }
}

/// Finds the largest single-line font size that fits a width.
#[derive(Debug)]
pub struct TextFitter<M> {
    measurer: M,
}

impl<M: TextMeasure> TextFitter<M> {
    pub fn new(measurer: M) -> Self {
        Self { measurer }
    }

    pub fn measurer_mut(&mut self) -> &mut M {
        &mut self.measurer
    }

    pub fn into_inner(self) -> M {
        self.measurer
    }

    /// Largest size whose measured width is `<= max_width_px`, such that one
    /// pixel more would overflow.
    ///
    /// Empty text is unconstrained; a non-positive width yields [`MIN_FONT_SIZE`].
    /// Only font lookup failures are reported as errors.
    pub fn fit(
        &mut self,
        text: &str,
        font_family: &str,
        max_width_px: f64,
        transform: TextTransform,
    ) -> CaptionFxResult<FitResult> {
        let text = transform.apply(text);
        if text.trim().is_empty() {
            return Ok(FitResult::unconstrained());
        }
        if max_width_px.is_nan() || max_width_px <= 0.0 {
            return Ok(FitResult {
                font_size: MIN_FONT_SIZE,
            });
        }

        let reference_width = self
            .measurer
            .measure(&text, font_family, REFERENCE_FONT_SIZE)?;
        if !reference_width.is_finite() || reference_width <= 0.0 {
            return Ok(FitResult::unconstrained());
        }
        let estimate = REFERENCE_FONT_SIZE * max_width_px / reference_width;
        if !estimate.is_finite() {
            return Ok(FitResult::unconstrained());
        }

        let fits = |m: &mut M, size: f64| -> CaptionFxResult<bool> {
            Ok(m.measure(&text, font_family, size)? <= max_width_px)
        };

        // Bracket the answer: `lo` fits, `hi` does not.
        let (mut lo, mut hi) = if fits(&mut self.measurer, estimate)? {
            let mut hi = estimate + 1.0;
            let mut steps = 0;
            while fits(&mut self.measurer, hi)? {
                steps += 1;
                if steps > MAX_REFINE_STEPS {
                    return Ok(FitResult { font_size: hi });
                }
                hi = hi * 2.0 + 1.0;
            }
            (estimate, hi)
        } else {
            let mut lo = (estimate - 1.0).max(MIN_FONT_SIZE);
            let mut steps = 0;
            while !fits(&mut self.measurer, lo)? {
                if lo <= MIN_FONT_SIZE || steps > MAX_REFINE_STEPS {
                    tracing::debug!(max_width_px, "text overflows even at the minimum size");
                    return Ok(FitResult {
                        font_size: MIN_FONT_SIZE,
                    });
                }
                steps += 1;
                lo = (lo * 0.5).max(MIN_FONT_SIZE);
            }
            (lo, estimate)
        };

        let mut steps = 0;
        while hi - lo > SIZE_TOLERANCE && steps < MAX_REFINE_STEPS {
            let mid = 0.5 * (lo + hi);
            if fits(&mut self.measurer, mid)? {
                lo = mid;
            } else {
                hi = mid;
            }
            steps += 1;
        }

        Ok(FitResult {
            font_size: lo.max(MIN_FONT_SIZE),
        })
    }
}

/// `min(desired, fitted)`: fitting only ever shrinks text, never grows it.
///
/// The result is finite and at least [`MIN_FONT_SIZE`] for any input.
pub fn final_font_size(desired_font_size: f64, fitted: FitResult) -> f64 {
    let desired = if desired_font_size.is_finite() && desired_font_size > 0.0 {
        desired_font_size
    } else {
        MIN_FONT_SIZE
    };
    desired.min(fitted.font_size).max(MIN_FONT_SIZE)
}

/// Fixed-advance metrics: every glyph is `advance_em` wide, uppercase letters
/// `upper_advance_em`, whitespace `space_advance_em`.
///
/// Used where exact glyph shapes do not matter (tests, dry runs).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonospaceMetrics {
    pub advance_em: f64,
    pub upper_advance_em: f64,
    pub space_advance_em: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.55,
            upper_advance_em: 0.68,
            space_advance_em: 0.28,
        }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&mut self, text: &str, _family: &str, size_px: f64) -> CaptionFxResult<f64> {
        let em: f64 = text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    self.space_advance_em
                } else if c.is_uppercase() {
                    self.upper_advance_em
                } else {
                    self.advance_em
                }
            })
            .sum();
        Ok(em * size_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
