use super::*;
use crate::text::fit::{TextFitter, TextTransform};

/// A real font for shaping tests: `CAPTIONFX_TEST_FONT`, or a common system font.
fn test_font() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("CAPTIONFX_TEST_FONT") {
        return Some(PathBuf::from(p));
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn garbage_bytes_are_a_font_error() {
    let mut book = FontBook::new();
    let err = book
        .register_bytes(b"definitely not a font".to_vec(), "junk")
        .unwrap_err();
    assert!(matches!(err, CaptionFxError::Font(_)));
    assert!(book.is_empty());
}

#[test]
fn missing_file_and_empty_dir_are_font_errors() {
    let mut book = FontBook::new();
    assert!(matches!(
        book.load_file(Path::new("does/not/exist.ttf")),
        Err(CaptionFxError::Font(_))
    ));

    let dir = PathBuf::from("target").join("fonts_empty_dir");
    std::fs::create_dir_all(&dir).unwrap();
    assert!(matches!(book.load_dir(&dir), Err(CaptionFxError::Font(_))));
}

#[test]
fn require_reports_loaded_families() {
    let book = FontBook::new();
    let err = book.require("TheBoldFont").unwrap_err().to_string();
    assert!(err.contains("TheBoldFont"));
    assert!(err.contains("none"));
}

#[test]
fn font_extension_filter() {
    assert!(is_font_path(Path::new("a/B.TTF")));
    assert!(is_font_path(Path::new("x.otf")));
    assert!(!is_font_path(Path::new("x.txt")));
    assert!(!is_font_path(Path::new("ttf")));
}

#[test]
fn parley_measurement_scales_with_size_and_fits_tightly() {
    let Some(path) = test_font() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let mut book = FontBook::new();
    let families = book.load_file(&path).unwrap();
    let family = families[0].clone();
    assert_eq!(book.require(&family.to_uppercase()).unwrap(), family);

    let mut m = ParleyMeasurer::new(&book);
    let w50 = m.measure("HELLO WORLD", &family, 50.0).unwrap();
    let w100 = m.measure("HELLO WORLD", &family, 100.0).unwrap();
    assert!(w50 > 0.0);
    assert!(w100 > w50 * 1.8 && w100 < w50 * 2.2);

    let mut fitter = TextFitter::new(m);
    let r = fitter
        .fit("hello world", &family, 600.0, TextTransform::Uppercase)
        .unwrap();
    let m = fitter.measurer_mut();
    assert!(m.measure("HELLO WORLD", &family, r.font_size).unwrap() <= 600.0);
    assert!(m.measure("HELLO WORLD", &family, r.font_size + 1.0).unwrap() > 600.0);
}

#[test]
fn measuring_unknown_family_fails() {
    let mut m = ParleyMeasurer::new(&FontBook::new());
    assert!(matches!(
        m.measure("x", "Nope", 10.0),
        Err(CaptionFxError::Font(_))
    ));
}
