use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn default_curve_is_a_five_frame_spring() {
    let c = EnterCurve::default();
    assert_eq!(c.duration_frames(), 5);
    assert_eq!(c.progress(0, fps30()), 0.0);
    assert_eq!(c.progress(5, fps30()), 1.0);
    assert_eq!(c.progress(500, fps30()), 1.0);
    let mid = c.progress(2, fps30());
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn overshooting_ease_is_clamped() {
    let c = EnterCurve::Eased {
        ease: Ease::OutBack,
        duration_frames: 10,
    };
    for f in 0..20 {
        let p = c.progress(f, fps30());
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn zero_duration_is_immediately_complete() {
    let c = EnterCurve::Eased {
        ease: Ease::Linear,
        duration_frames: 0,
    };
    assert_eq!(c.progress(0, fps30()), 1.0);
}

#[test]
fn serde_shape_is_tagged() {
    let c: EnterCurve = serde_json::from_value(serde_json::json!({
        "kind": "spring",
        "stiffness": 100.0,
        "damping": 200.0,
        "mass": 1.0,
        "duration_frames": 8
    }))
    .unwrap();
    assert_eq!(c.duration_frames(), 8);

    let c: EnterCurve = serde_json::from_value(serde_json::json!({
        "kind": "eased",
        "ease": "OutCubic",
        "duration_frames": 6
    }))
    .unwrap();
    assert_eq!(
        c,
        EnterCurve::Eased {
            ease: Ease::OutCubic,
            duration_frames: 6
        }
    );
}
