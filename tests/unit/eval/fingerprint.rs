use super::*;
use crate::{
    caption::model::{Page, Token},
    foundation::core::{Canvas, Fps},
    style::{
        preset::builtin_style,
        presenter::{FrameContext, StylePresenter},
    },
};

fn page() -> Page {
    Page::from_tokens(
        0,
        vec![Token::new("one", 0, 300), Token::new(" two", 300, 600)],
    )
}

fn ctx(frame_in_page: u64) -> FrameContext {
    FrameContext::frame_aligned(
        Canvas::new(1080, 1920).unwrap(),
        Fps::new(30, 1).unwrap(),
        0,
        frame_in_page,
    )
}

#[test]
fn fingerprint_is_deterministic_for_same_frame() {
    let style = builtin_style("neon-glow").unwrap();
    let presenter = StylePresenter::new(&style, ctx(0).canvas);
    let out = presenter.present(&ctx(7), &page(), 90.0);
    assert_eq!(fingerprint_page(Some(&out)), fingerprint_page(Some(&out)));

    let inputs = presenter.inputs(&ctx(7), &page());
    assert_eq!(
        fingerprint_inputs(Some(&inputs)),
        fingerprint_inputs(Some(&inputs.clone()))
    );
}

#[test]
fn fingerprint_changes_when_frame_changes() {
    let style = builtin_style("classic").unwrap();
    let presenter = StylePresenter::new(&style, ctx(0).canvas);
    let reading_one = presenter.present(&ctx(6), &page(), 90.0);
    let reading_two = presenter.present(&ctx(12), &page(), 90.0);
    assert_ne!(
        fingerprint_page(Some(&reading_one)),
        fingerprint_page(Some(&reading_two))
    );
    assert_ne!(
        fingerprint_page(Some(&reading_one)),
        fingerprint_page(None)
    );

    let mut moved = reading_one.clone();
    moved.words[0].offset.y += 0.5;
    assert_ne!(
        fingerprint_page(Some(&reading_one)),
        fingerprint_page(Some(&moved))
    );
}

#[test]
fn empty_frames_share_a_fingerprint() {
    assert_eq!(fingerprint_inputs(None), fingerprint_inputs(None));
    assert_eq!(fingerprint_page(None), fingerprint_page(None));
}

#[test]
fn display_is_32_hex_digits() {
    let s = fingerprint_inputs(None).to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}
