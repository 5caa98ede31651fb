use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn starts_at_rest_and_settles_at_one() {
    for spring in [Spring::default(), Spring::smooth()] {
        assert_eq!(spring.value_at(0.0), 0.0);
        assert!((spring.value_at(120.0) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn smooth_spring_never_overshoots() {
    let s = Spring::smooth();
    let mut prev = 0.0;
    for f in 0..400 {
        let v = s.value_at(fps30().frames_to_secs(f));
        assert!(v <= 1.0 + 1e-9);
        assert!(v + 1e-12 >= prev);
        prev = v;
    }
}

#[test]
fn underdamped_spring_overshoots() {
    let s = Spring::default();
    let peak = (0..60)
        .map(|f| s.value_at(fps30().frames_to_secs(f)))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn critically_damped_branch_is_continuous() {
    let critical = Spring {
        stiffness: 100.0,
        damping: 20.0,
        mass: 1.0,
    };
    let near = Spring {
        damping: 20.0001,
        ..critical
    };
    assert!((critical.value_at(0.2) - near.value_at(0.2)).abs() < 1e-4);
}

#[test]
fn duration_stretch_settles_within_duration() {
    let s = Spring::smooth();
    let fps = fps30();
    assert_eq!(s.sample(0, fps, Some(5)), 0.0);
    assert!(s.sample(5, fps, Some(5)) >= 1.0 - REST_THRESHOLD);
    assert!(s.sample(2, fps, Some(5)) < s.sample(3, fps, Some(5)));
    assert_eq!(s.sample(0, fps, Some(0)), 1.0);
}
