use super::*;

#[test]
fn loads_tiktok_style_page_json() {
    let track = CaptionTrack::from_json_str(
        r#"[
            {
                "text": " HELLO WORLD",
                "startMs": 2000,
                "durationMs": 900,
                "tokens": [
                    {"text": " HELLO", "fromMs": 2000, "toMs": 2400},
                    {"text": " WORLD", "fromMs": 2400, "toMs": 2900}
                ]
            }
        ]"#,
    )
    .unwrap();
    assert_eq!(track.pages.len(), 1);
    let page = &track.pages[0];
    assert_eq!(page.start_ms, 2000);
    assert_eq!(page.tokens[1], Token::new(" WORLD", 2400, 2900));
    assert!(track.validate().is_ok());
    assert_eq!(track.end_ms(), 2900);
}

#[test]
fn sizing_text_falls_back_to_tokens() {
    let page = Page {
        text: String::new(),
        start_ms: 0,
        tokens: vec![Token::new("a", 0, 10), Token::new(" b", 10, 20)],
    };
    assert_eq!(page.sizing_text(), "a b");
    assert_eq!(Page::from_tokens(0, page.tokens.clone()).text, "a b");
}

#[test]
fn timing_issues_are_reported_not_rejected() {
    let page = Page::from_tokens(
        0,
        vec![
            Token::new("ok", 0, 100),
            Token::new("overlap", 50, 150),
            Token::new("empty", 200, 200),
        ],
    );
    let issues = page.timing_issues();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| i.contains("overlaps")));
    assert!(issues.iter().any(|i| i.contains("invalid span")));
    assert!(CaptionTrack::new(vec![page]).validate().is_ok());
}

#[test]
fn unordered_pages_are_rejected() {
    let track = CaptionTrack::new(vec![
        Page::from_tokens(1000, vec![]),
        Page::from_tokens(500, vec![]),
    ]);
    assert!(matches!(track.validate(), Err(CaptionFxError::Validation(_))));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        CaptionTrack::from_json_str("{"),
        Err(CaptionFxError::Serde(_))
    ));
}
