use super::*;
use crate::foundation::error::CaptionFxError;

fn fitter() -> TextFitter<MonospaceMetrics> {
    TextFitter::new(MonospaceMetrics::default())
}

fn width_at(text: &str, size: f64, transform: TextTransform) -> f64 {
    MonospaceMetrics::default()
        .measure(&transform.apply(text), "any", size)
        .unwrap()
}

#[test]
fn fitted_size_is_a_tight_bound() {
    let mut f = fitter();
    for max_w in [90.0, 500.0, 972.0, 1700.5] {
        let r = f
            .fit("hello world", "Bold", max_w, TextTransform::Uppercase)
            .unwrap();
        assert!(r.is_constrained());
        assert!(width_at("hello world", r.font_size, TextTransform::Uppercase) <= max_w);
        assert!(width_at("hello world", r.font_size + 1.0, TextTransform::Uppercase) > max_w);
    }
}

#[test]
fn uppercase_is_applied_before_measuring() {
    let mut f = fitter();
    let lower = f.fit("hello", "Bold", 600.0, TextTransform::None).unwrap();
    let upper = f.fit("hello", "Bold", 600.0, TextTransform::Uppercase).unwrap();
    assert!(upper.font_size < lower.font_size);
}

#[test]
fn monotonic_in_max_width() {
    let mut f = fitter();
    let mut prev = 0.0;
    for w in (1..40).map(|i| f64::from(i) * 37.0) {
        let size = f
            .fit("Caption text", "Bold", w, TextTransform::Uppercase)
            .unwrap()
            .font_size;
        assert!(size >= prev, "width {w}: {size} < {prev}");
        prev = size;
    }
}

#[test]
fn empty_text_is_unconstrained() {
    let mut f = fitter();
    for text in ["", "   "] {
        let r = f.fit(text, "Bold", 500.0, TextTransform::Uppercase).unwrap();
        assert!(!r.is_constrained());
        assert_eq!(final_font_size(120.0, r), 120.0);
    }
}

#[test]
fn degenerate_width_floors_at_minimum() {
    let mut f = fitter();
    for w in [0.0, -20.0, f64::NAN] {
        let r = f.fit("hello", "Bold", w, TextTransform::None).unwrap();
        assert_eq!(r.font_size, MIN_FONT_SIZE);
    }
    let tiny = f.fit("a very long caption", "Bold", 0.5, TextTransform::None).unwrap();
    assert_eq!(tiny.font_size, MIN_FONT_SIZE);
}

#[test]
fn final_size_never_exceeds_desired() {
    let mut f = fitter();
    let roomy = f.fit("hi", "Bold", 10_000.0, TextTransform::None).unwrap();
    assert_eq!(final_font_size(120.0, roomy), 120.0);

    let tight = f.fit("a much longer caption line", "Bold", 300.0, TextTransform::None).unwrap();
    let size = final_font_size(120.0, tight);
    assert!(size < 120.0);
    assert_eq!(size, tight.font_size);
}

#[test]
fn halving_width_halves_size_without_going_degenerate() {
    let mut f = fitter();
    let text = "THIS CAPTION IS DEFINITELY TOO LONG";
    let full = final_font_size(120.0, f.fit(text, "Bold", 972.0, TextTransform::None).unwrap());
    let half = final_font_size(120.0, f.fit(text, "Bold", 486.0, TextTransform::None).unwrap());
    assert!(full < 120.0);
    assert!((half / full - 0.5).abs() < 0.01);
    assert!(half.is_finite() && half >= MIN_FONT_SIZE);
}

#[test]
fn final_size_is_nan_safe() {
    let r = FitResult { font_size: 40.0 };
    assert_eq!(final_font_size(f64::NAN, r), MIN_FONT_SIZE);
    assert_eq!(final_font_size(f64::INFINITY, r), MIN_FONT_SIZE);
    assert_eq!(final_font_size(-3.0, r), MIN_FONT_SIZE);
}

struct MissingFont;

impl TextMeasure for MissingFont {
    fn measure(&mut self, _text: &str, family: &str, _size_px: f64) -> CaptionFxResult<f64> {
        Err(CaptionFxError::font(format!("family '{family}' not loaded")))
    }
}

#[test]
fn font_errors_propagate() {
    let mut f = TextFitter::new(MissingFont);
    let err = f.fit("hello", "Nope", 500.0, TextTransform::None).unwrap_err();
    assert!(matches!(err, CaptionFxError::Font(_)));
}
