use super::*;

#[test]
fn every_builtin_validates_and_is_registered_by_name() {
    let styles = builtin_styles();
    assert_eq!(styles.len(), BUILTIN_STYLE_NAMES.len());
    for (style, name) in styles.iter().zip(BUILTIN_STYLE_NAMES) {
        assert_eq!(style.name, name);
        style.validate().unwrap();
        assert_eq!(builtin_style(name).unwrap(), *style);
    }
}

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(builtin_style(" Neon-Glow ").unwrap().name, "neon-glow");
}

#[test]
fn unknown_style_lists_known_names() {
    let err = builtin_style("vaporwave").unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("validation error:"), "{msg}");
    assert!(msg.contains("vaporwave"), "{msg}");
    for name in BUILTIN_STYLE_NAMES {
        assert!(msg.contains(name), "{msg}");
    }
}

#[test]
fn classic_matches_reference_look() {
    let s = builtin_style("classic").unwrap();
    assert_eq!(s.palette.active.to_rgba8(), [0x39, 0xE5, 0x08, 0xFF]);
    assert_eq!(s.words.currently_reading.scale, 1.15);
    assert_eq!(s.words.not_yet_read.opacity, 0.0);
    assert_eq!(s.enter.scale_from, 0.8);
    assert_eq!(s.text_transform, TextTransform::Uppercase);
    assert_eq!(s.layout, LayoutFractions::default());
}

#[test]
fn inline_descriptor_fills_missing_fields_from_classic() {
    let s: StyleDescriptor = serde_json::from_str(
        r##"{
            "name": "house",
            "palette": { "active": "#ff0000" },
            "decorations": { "glitch": { "word_chance": 1.0 } }
        }"##,
    )
    .unwrap();
    s.validate().unwrap();
    assert_eq!(s.name, "house");
    assert_eq!(s.palette.active, ColorDef::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(s.palette.stroke, ColorDef::BLACK);
    assert_eq!(s.words, classic().words);
    let g = s.decorations.glitch.unwrap();
    assert_eq!(g.word_chance, 1.0);
    assert_eq!(g.period_frames, 20);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = serde_json::from_str::<StyleDescriptor>(r#"{"name":"x","colour":"red"}"#);
    assert!(err.is_err());
}

#[test]
fn validation_catches_bad_values() {
    let mut s = classic();
    s.words.currently_reading.scale = 0.0;
    assert!(s.validate().is_err());

    let mut s = classic();
    s.decorations.glitch = Some(Glitch {
        period_frames: 0,
        ..Glitch::default()
    });
    assert!(s.validate().is_err());

    let mut s = classic();
    s.decorations.particles = Some(Particles {
        count: MAX_PARTICLES + 1,
        ..Particles::default()
    });
    assert!(s.validate().is_err());

    let mut s = classic();
    s.name = "  ".to_owned();
    assert!(s.validate().is_err());
}

#[test]
fn looks_are_selected_by_state() {
    let w = classic().words;
    assert_eq!(w.for_state(ReadState::CurrentlyReading).scale, 1.15);
    assert_eq!(w.for_state(ReadState::HasBeenRead).scale, 1.0);
    assert_eq!(w.for_state(ReadState::NotYetRead).scale, 0.8);
}
