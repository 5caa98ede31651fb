use super::*;
use crate::caption::model::{Page, Token};

fn inline_job() -> CaptionJob {
    CaptionJob::from_json_str(
        r#"{
            "canvas": { "width": 1080, "height": 1920 },
            "fps": { "num": 30, "den": 1 },
            "font_family": "Mono",
            "pages": [
                { "text": "hello world", "startMs": 0, "tokens": [
                    { "text": "hello", "fromMs": 0, "toMs": 400 },
                    { "text": " world", "fromMs": 400, "toMs": 900 }
                ] },
                { "text": "again", "startMs": 2000, "tokens": [
                    { "text": "again", "fromMs": 2000, "toMs": 2600 }
                ] }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn defaults_follow_the_reference_template() {
    let job = inline_job();
    assert_eq!(job.max_page_ms, Some(DEFAULT_MAX_PAGE_MS));
    assert_eq!(job.style, StyleRef::Named("classic".to_owned()));
    assert_eq!(job.duration_frames, None);
    job.validate().unwrap();
}

#[test]
fn null_max_page_ms_disables_the_cap() {
    let mut v: serde_json::Value = serde_json::to_value(inline_job()).unwrap();
    v["max_page_ms"] = serde_json::Value::Null;
    let job: CaptionJob = serde_json::from_value(v).unwrap();
    assert_eq!(job.max_page_ms, None);
}

#[test]
fn prepare_derives_duration_from_the_schedule() {
    let prepared = inline_job().prepare().unwrap();
    // Second page starts at frame 60 and is capped at 1200ms = 36 frames.
    assert_eq!(prepared.duration, FrameIndex(96));
    assert_eq!(prepared.full_range().len_frames(), 96);
    assert_eq!(prepared.style.name, "classic");
    assert_eq!(prepared.font_family, "Mono");

    let mut job = inline_job();
    job.duration_frames = Some(10);
    assert_eq!(job.prepare().unwrap().duration, FrameIndex(10));
}

#[test]
fn style_may_be_named_or_inline() {
    let mut v: serde_json::Value = serde_json::to_value(inline_job()).unwrap();
    v["style"] = serde_json::json!("glitch");
    let job: CaptionJob = serde_json::from_value(v.clone()).unwrap();
    assert_eq!(job.resolve_style().unwrap().name, "glitch");

    v["style"] = serde_json::json!({ "name": "house", "reveal": "progressive" });
    let job: CaptionJob = serde_json::from_value(v).unwrap();
    let style = job.resolve_style().unwrap();
    assert_eq!(style.name, "house");
    assert_eq!(style.reveal, crate::style::preset::RevealMode::Progressive);
}

#[test]
fn text_transform_overrides_style() {
    let mut job = inline_job();
    job.text_transform = Some(TextTransform::None);
    assert_eq!(
        job.resolve_style().unwrap().text_transform,
        TextTransform::None
    );
}

#[test]
fn validation_rejects_bad_configuration() {
    let mut job = inline_job();
    job.fps = Fps { num: 30, den: 0 };
    assert!(job.validate().is_err());

    let mut job = inline_job();
    job.canvas = Canvas {
        width: 0,
        height: 100,
    };
    assert!(job.validate().is_err());

    let mut job = inline_job();
    job.style = StyleRef::Named("nope".to_owned());
    let msg = job.validate().unwrap_err().to_string();
    assert!(msg.contains("classic"), "{msg}");

    let mut job = inline_job();
    job.captions_path = Some(PathBuf::from("captions.json"));
    assert!(job.validate().is_err());

    let mut job = inline_job();
    job.pages = None;
    assert!(job.validate().is_err());

    let mut job = inline_job();
    job.max_page_ms = Some(0.0);
    assert!(job.validate().is_err());

    let mut job = inline_job();
    job.pages = Some(CaptionTrack::new(vec![
        Page::from_tokens(500, vec![Token::new("b", 500, 600)]),
        Page::from_tokens(100, vec![Token::new("a", 100, 200)]),
    ]));
    assert!(job.validate().is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let mut v: serde_json::Value = serde_json::to_value(inline_job()).unwrap();
    v["colour"] = serde_json::json!("red");
    let err = CaptionJob::from_json_str(&v.to_string()).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn from_path_resolves_relative_paths_against_the_job_file() {
    let dir = PathBuf::from("target").join("job_paths");
    std::fs::create_dir_all(&dir).unwrap();

    let track = inline_job().pages.unwrap();
    std::fs::write(
        dir.join("captions.json"),
        serde_json::to_string(&track).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("job.json"),
        r#"{
            "canvas": { "width": 720, "height": 1280 },
            "fps": { "num": 25, "den": 1 },
            "fonts": ["fonts/Bold.ttf"],
            "font_family": "Bold",
            "captions_path": "captions.json"
        }"#,
    )
    .unwrap();

    let job = CaptionJob::from_path(&dir.join("job.json")).unwrap();
    assert_eq!(job.fonts, vec![dir.join("fonts").join("Bold.ttf")]);
    assert_eq!(job.captions_path, Some(dir.join("captions.json")));
    assert_eq!(job.load_track().unwrap(), track);

    // The font file does not exist: loading fails with a font error.
    let err = job.load_fonts().unwrap_err();
    assert!(err.to_string().starts_with("font error:"), "{err}");
}

#[test]
fn missing_job_file_is_an_error() {
    assert!(CaptionJob::from_path(Path::new("target/does/not/exist.json")).is_err());
}
