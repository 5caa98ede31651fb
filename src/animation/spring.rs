use crate::foundation::core::Fps;

/// Settling threshold used to measure a spring's natural duration.
const REST_THRESHOLD: f64 = 0.005;
/// Longest natural duration considered when measuring a spring.
const MAX_MEASURE_SECS: f64 = 60.0;

/// Damped harmonic spring driven from 0 towards 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spring {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
        }
    }
}

impl Spring {
    /// Heavily damped spring that glides into place without overshoot.
    pub fn smooth() -> Self {
        Self {
            damping: 200.0,
            ..Self::default()
        }
    }

    fn params(self) -> (f64, f64) {
        let mass = if self.mass.is_finite() && self.mass > 0.0 {
            self.mass
        } else {
            1.0
        };
        let stiffness = self.stiffness.max(1e-6);
        let damping = self.damping.max(0.0);
        let omega0 = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());
        (omega0, zeta)
    }

    /// Displacement at `secs` seconds after release (unclamped; may overshoot 1).
    pub fn value_at(self, secs: f64) -> f64 {
        if !secs.is_finite() {
            return if secs > 0.0 { 1.0 } else { 0.0 };
        }
        if secs <= 0.0 {
            return 0.0;
        }
        let (omega0, zeta) = self.params();
        let t = secs;
        if (zeta - 1.0).abs() < 1e-9 {
            1.0 - (-omega0 * t).exp() * (1.0 + omega0 * t)
        } else if zeta < 1.0 {
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega0 * t).exp();
            1.0 - decay * ((omega_d * t).cos() + (zeta * omega0 / omega_d) * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega0 * (zeta - root);
            let r2 = -omega0 * (zeta + root);
            1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        }
    }

    /// Number of frames until the spring stays within the rest threshold.
    pub fn natural_frames(self, fps: Fps) -> u64 {
        let max_frames = (MAX_MEASURE_SECS * fps.as_f64()).ceil() as u64;
        let mut last_moving = 0u64;
        for f in 0..=max_frames {
            if (1.0 - self.value_at(fps.frames_to_secs(f))).abs() >= REST_THRESHOLD {
                last_moving = f;
            }
        }
        last_moving + 1
    }

    /// Spring value at `frame`, with time stretched so the spring settles after
    /// `duration_frames` frames. `None` keeps the natural duration.
    pub fn sample(self, frame: u64, fps: Fps, duration_frames: Option<u64>) -> f64 {
        let local = match duration_frames {
            None => frame as f64,
            Some(0) => return 1.0,
            Some(d) => {
                let natural = self.natural_frames(fps) as f64;
                (frame as f64) * natural / (d as f64)
            }
        };
        self.value_at(local * fps.frame_duration_secs())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
