use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"captionfx");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'c');
    b.write_bytes(b"aptionfx");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn keyed_random_is_repeatable_and_bounded() {
    for key in ["glitch-0", "glitch-1", "word-1000-3", ""] {
        let v = random(key);
        assert_eq!(v, random(key));
        assert!((0.0..1.0).contains(&v));
    }
    assert_ne!(random("spark-x-1000-12"), random("spark-x-1000-13"));
}

#[test]
fn random_at_separates_its_inputs() {
    let a = random_at("offset", 1000, 12);
    assert_eq!(a, random_at("offset", 1000, 12));
    assert_ne!(a, random_at("offset", 12, 1000));
    assert_ne!(a, random_at("hue", 1000, 12));
    assert!((0.0..1.0).contains(&a));
}

#[test]
fn interpolate_clamps_outside_input_range() {
    assert_eq!(interpolate(0.0, [0.0, 1.0], [0.8, 1.0]), 0.8);
    assert_eq!(interpolate(1.0, [0.0, 1.0], [50.0, 0.0]), 0.0);
    assert_eq!(interpolate(-3.0, [0.0, 1.0], [0.8, 1.0]), 0.8);
    assert_eq!(interpolate(7.0, [0.0, 1.0], [0.8, 1.0]), 1.0);
    assert!((interpolate(0.5, [0.0, 1.0], [0.8, 1.0]) - 0.9).abs() < 1e-12);
    assert_eq!(interpolate(f64::NAN, [0.0, 1.0], [0.8, 1.0]), 0.8);
    assert_eq!(interpolate(2.0, [2.0, 2.0], [0.0, 5.0]), 5.0);
}
