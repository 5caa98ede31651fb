use crate::{
    animation::{ease::Ease, spring::Spring},
    caption::timeline::clamp_progress,
    foundation::core::Fps,
};

/// Curve that turns "frames since the page appeared" into the page's entry progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnterCurve {
    Eased {
        ease: Ease,
        duration_frames: u64,
    },
    Spring {
        stiffness: f64,
        damping: f64,
        #[serde(default = "unit_mass")]
        mass: f64,
        duration_frames: u64,
    },
}

fn unit_mass() -> f64 {
    1.0
}

impl Default for EnterCurve {
    fn default() -> Self {
        let spring = Spring::smooth();
        Self::Spring {
            stiffness: spring.stiffness,
            damping: spring.damping,
            mass: spring.mass,
            duration_frames: 5,
        }
    }
}

impl EnterCurve {
    pub fn duration_frames(self) -> u64 {
        match self {
            Self::Eased {
                duration_frames, ..
            }
            | Self::Spring {
                duration_frames, ..
            } => duration_frames,
        }
    }

    /// Entry progress in `[0, 1]` at `frame_in_page`.
    pub fn progress(self, frame_in_page: u64, fps: Fps) -> f64 {
        let raw = match self {
            Self::Eased {
                ease,
                duration_frames,
            } => {
                if duration_frames == 0 {
                    1.0
                } else {
                    ease.apply(frame_in_page as f64 / duration_frames as f64)
                }
            }
            Self::Spring {
                stiffness,
                damping,
                mass,
                duration_frames,
            } => {
                if frame_in_page >= duration_frames {
                    1.0
                } else {
                    let spring = Spring {
                        stiffness,
                        damping,
                        mass,
                    };
                    spring.sample(frame_in_page, fps, Some(duration_frames))
                }
            }
        };
        clamp_progress(raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/enter.rs"]
mod tests;
