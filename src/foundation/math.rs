#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Deterministic pseudo-random value in `[0, 1)` for a string key.
///
/// The same key always yields the same value, on every thread and in every run.
pub fn random(key: &str) -> f64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(key.as_bytes());
    Rng64::new(h.finish()).next_f64_01()
}

/// Allocation-free variant of [`random`] keyed on a tag plus two integers,
/// typically `(token_from_ms, frame)` or `(particle_index, frame_bucket)`.
pub fn random_at(tag: &str, a: u64, b: u64) -> f64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(tag.as_bytes());
    h.write_u8(0xff);
    h.write_u64(a);
    h.write_u64(b);
    Rng64::new(h.finish()).next_f64_01()
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Map `value` from `[in_start, in_end]` to `[out_start, out_end]`, clamping at both ends.
///
/// A degenerate input range yields `out_end` once `value` reaches `in_start`.
pub fn interpolate(value: f64, input: [f64; 2], output: [f64; 2]) -> f64 {
    let [in_start, in_end] = input;
    let [out_start, out_end] = output;
    if value.is_nan() {
        return out_start;
    }
    let span = in_end - in_start;
    if span == 0.0 || !span.is_finite() {
        return if value >= in_start { out_end } else { out_start };
    }
    let t = ((value - in_start) / span).clamp(0.0, 1.0);
    lerp(out_start, out_end, t)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
