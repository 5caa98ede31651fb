use super::*;

#[test]
fn portrait_hd_defaults() {
    let canvas = Canvas::new(1080, 1920).unwrap();
    let l = ResponsiveLayout::resolve(canvas, &LayoutFractions::default());
    assert_eq!(l.base_px, 1080.0);
    assert!((l.desired_font_size - 118.8).abs() < 1e-9);
    assert!((l.stroke_width - 19.44).abs() < 1e-9);
    assert!((l.max_text_width - 972.0).abs() < 1e-9);
    assert!((l.container.bottom - 345.6).abs() < 1e-9);
    assert!((l.container.height - 153.6).abs() < 1e-9);
}

#[test]
fn halving_resolution_halves_every_size() {
    let f = LayoutFractions::default();
    let full = ResponsiveLayout::resolve(Canvas::new(1080, 1920).unwrap(), &f);
    let half = ResponsiveLayout::resolve(Canvas::new(540, 960).unwrap(), &f);

    assert_eq!(half.desired_font_size, full.desired_font_size / 2.0);
    assert_eq!(half.stroke_width, full.stroke_width / 2.0);
    assert_eq!(half.max_text_width, full.max_text_width / 2.0);
    assert_eq!(half.container.bottom, full.container.bottom / 2.0);
    assert_eq!(half.word_padding, full.word_padding / 2.0);
    assert_eq!(half.glow_radius, full.glow_radius / 2.0);
}

#[test]
fn landscape_uses_height_as_base() {
    let l = ResponsiveLayout::resolve(
        Canvas::new(1920, 1080).unwrap(),
        &LayoutFractions::default(),
    );
    assert_eq!(l.base_px, 1080.0);
    assert!((l.max_text_width - 1728.0).abs() < 1e-9);
}

#[test]
fn container_center_is_measured_from_the_bottom() {
    let canvas = Canvas::new(100, 1000).unwrap();
    let l = ResponsiveLayout::resolve(canvas, &LayoutFractions::default());
    let c = l.container.center(canvas);
    assert_eq!(c.x, 50.0);
    assert!((c.y - (1000.0 - 180.0 - 40.0)).abs() < 1e-9);
}

#[test]
fn validation_rejects_negative_or_zero_text_width() {
    let mut f = LayoutFractions::default();
    f.stroke_base = -0.1;
    assert!(f.validate().is_err());

    let mut f = LayoutFractions::default();
    f.text_width = 0.0;
    assert!(f.validate().is_err());

    assert!(LayoutFractions::default().validate().is_ok());
}
