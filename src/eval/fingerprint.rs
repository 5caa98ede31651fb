use crate::{
    caption::timeline::ReadState,
    foundation::{core::Vec2, math::Fnv1a64},
    style::{
        color::ColorDef,
        presenter::{PresentInputs, PresentedPage},
    },
};

/// 128-bit content hash of a caption frame; equal frames hash equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint the presentation inputs of a frame. `None` is a frame with no
/// page on screen.
pub fn fingerprint_inputs(inputs: Option<&PresentInputs>) -> FrameFingerprint {
    let mut h = PairHasher::new();
    match inputs {
        None => h.u8(0),
        Some(i) => {
            h.u8(1);
            h.u64(i.page_index as u64);
            h.f64(i.enter_progress);
            h.u64(i.states.len() as u64);
            for s in &i.states {
                h.state(*s);
            }
            h.opt_u64(i.animation_frame);
        }
    }
    h.finish()
}

/// Fingerprint a fully presented frame.
pub fn fingerprint_page(page: Option<&PresentedPage>) -> FrameFingerprint {
    let mut h = PairHasher::new();
    let Some(p) = page else {
        h.u8(0);
        return h.finish();
    };
    h.u8(1);
    h.u64(p.page_index as u64);
    h.f64(p.enter_progress);
    h.f64(p.font_size);
    h.f64(p.stroke_width);
    h.color(p.stroke_color);
    h.f64(p.container.bottom);
    h.f64(p.container.height);
    h.f64(p.container.width);
    h.f64(p.word_gap);
    h.vec2(p.anchor);
    h.f64(p.scale);
    h.vec2(p.offset);
    h.f64(p.opacity);

    h.u64(p.words.len() as u64);
    for w in &p.words {
        h.u64(w.index as u64);
        h.str(&w.text);
        h.state(w.state);
        h.f64(w.opacity);
        h.color(w.color);
        h.color(w.background);
        h.vec2(w.scale);
        h.vec2(w.offset);
        h.f64(w.glow_radius);
        h.color(w.glow_color);
        h.vec2(w.padding);
        h.f64(w.corner_radius);
        h.u8(u8::from(w.glitched));
        h.f64(w.hue_rotate_deg);
        match w.orbit {
            Some(o) => {
                h.u8(1);
                h.f64(o.radius);
                h.f64(o.rotation_deg);
                h.u64(u64::from(o.satellites));
            }
            None => h.u8(0),
        }
    }

    h.u64(p.particles.len() as u64);
    for particle in &p.particles {
        h.vec2(particle.position);
        h.f64(particle.size);
        h.f64(particle.opacity);
        h.color(particle.color);
    }
    h.finish()
}

/// Two FNV-1a streams over the same bytes with different seeds.
struct PairHasher {
    a: Fnv1a64,
    b: Fnv1a64,
}

impl PairHasher {
    fn new() -> Self {
        Self {
            a: Fnv1a64::new(Fnv1a64::OFFSET_BASIS),
            b: Fnv1a64::new(0x9ae1_6a3b_2f90_404f),
        }
    }

    fn u8(&mut self, v: u8) {
        self.a.write_u8(v);
        self.b.write_u8(v);
    }

    fn u64(&mut self, v: u64) {
        self.a.write_u64(v);
        self.b.write_u64(v);
    }

    fn opt_u64(&mut self, v: Option<u64>) {
        match v {
            Some(v) => {
                self.u8(1);
                self.u64(v);
            }
            None => self.u8(0),
        }
    }

    fn f64(&mut self, v: f64) {
        self.u64(v.to_bits());
    }

    fn vec2(&mut self, v: Vec2) {
        self.f64(v.x);
        self.f64(v.y);
    }

    fn color(&mut self, c: ColorDef) {
        for v in [c.r, c.g, c.b, c.a] {
            self.f64(v);
        }
    }

    fn state(&mut self, s: ReadState) {
        self.u8(match s {
            ReadState::NotYetRead => 0,
            ReadState::CurrentlyReading => 1,
            ReadState::HasBeenRead => 2,
        });
    }

    fn str(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.a.write_bytes(s.as_bytes());
        self.b.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        FrameFingerprint {
            hi: self.a.finish(),
            lo: self.b.finish(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
