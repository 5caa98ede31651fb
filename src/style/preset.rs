//! Caption styles as data.
//!
//! A [`StyleDescriptor`] is everything that distinguishes one caption look from
//! another. Lengths are fractions of `min(width, height)` (suffix `_base`) so a
//! descriptor renders identically at every output resolution.

use crate::{
    animation::enter::EnterCurve,
    caption::timeline::ReadState,
    foundation::error::{CaptionFxError, CaptionFxResult},
    style::{color::ColorDef, layout::LayoutFractions},
    text::fit::TextTransform,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleDescriptor {
    pub name: String,
    pub palette: Palette,
    pub enter: EnterAnimation,
    pub words: WordLooks,
    pub reveal: RevealMode,
    pub layout: LayoutFractions,
    pub text_transform: TextTransform,
    pub decorations: Decorations,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub active: ColorDef,
    pub read: ColorDef,
    pub unread: ColorDef,
    pub active_background: ColorDef,
    /// Per-word background cycle for the active word; overrides
    /// `active_background` when non-empty.
    pub active_background_cycle: Vec<ColorDef>,
    pub stroke: ColorDef,
    pub glow: ColorDef,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            active: ColorDef::WHITE,
            read: ColorDef::WHITE,
            unread: ColorDef::WHITE,
            active_background: ColorDef::TRANSPARENT,
            active_background_cycle: Vec::new(),
            stroke: ColorDef::BLACK,
            glow: ColorDef::WHITE,
        }
    }
}

/// Page entrance: the whole line scales and slides in as entry progress goes 0 → 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnterAnimation {
    pub curve: EnterCurve,
    pub scale_from: f64,
    /// Initial downward offset (y-down), fraction of the base size.
    pub translate_y_from_base: f64,
    pub opacity_from: f64,
}

impl Default for EnterAnimation {
    fn default() -> Self {
        Self {
            curve: EnterCurve::default(),
            scale_from: 1.0,
            translate_y_from_base: 0.0,
            opacity_from: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordLook {
    pub scale: f64,
    /// Vertical offset (y-down), fraction of the base size.
    pub translate_y_base: f64,
    pub opacity: f64,
}

impl Default for WordLook {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_y_base: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordLooks {
    pub not_yet_read: WordLook,
    pub currently_reading: WordLook,
    pub has_been_read: WordLook,
}

impl Default for WordLooks {
    fn default() -> Self {
        Self {
            not_yet_read: WordLook {
                opacity: 0.0,
                ..WordLook::default()
            },
            currently_reading: WordLook::default(),
            has_been_read: WordLook::default(),
        }
    }
}

impl WordLooks {
    pub fn for_state(&self, state: ReadState) -> WordLook {
        match state {
            ReadState::NotYetRead => self.not_yet_read,
            ReadState::CurrentlyReading => self.currently_reading,
            ReadState::HasBeenRead => self.has_been_read,
        }
    }
}

/// How a word's read state is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// From token timestamps and the playhead.
    #[default]
    Timed,
    /// From the page entry progress: revealed words read as active, the rest
    /// as upcoming. Token timestamps are ignored.
    Progressive,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Decorations {
    pub glow: Option<Glow>,
    pub pulse: Option<Pulse>,
    pub glitch: Option<Glitch>,
    pub bounce: Option<Bounce>,
    pub orbit: Option<Orbit>,
    pub particles: Option<Particles>,
}

impl Decorations {
    /// Whether any decoration changes from frame to frame.
    pub fn is_animated(&self) -> bool {
        self.pulse.is_some()
            || self.glitch.is_some()
            || self.bounce.is_some()
            || self.orbit.is_some()
            || self.particles.is_some()
    }
}

/// Glow radius multipliers applied to the layout glow radius.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Glow {
    pub active: f64,
    pub read: f64,
}

/// Periodic breathing of the active word.
///
/// The unit wave is `sin(frame * rate + index * word_phase) * 0.5 + 0.5`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pulse {
    pub rate: f64,
    pub word_phase: f64,
    pub scale_amount: f64,
    pub glow_amount: f64,
    pub background_alpha_amount: f64,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            rate: 0.3,
            word_phase: 0.0,
            scale_amount: 0.0,
            glow_amount: 0.0,
            background_alpha_amount: 0.0,
        }
    }
}

/// Burst glitches: the first `active_frames` of every `period_frames`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Glitch {
    pub period_frames: u64,
    pub active_frames: u64,
    /// Probability that a word takes part in a burst.
    pub word_chance: f64,
    /// Words re-roll their participation every `reroll_frames`.
    pub reroll_frames: u64,
    pub word_offset_base: f64,
    pub page_jitter_base: f64,
    pub intensity_rate: f64,
    pub scale_amount: f64,
    pub active_color: ColorDef,
    pub read_color: ColorDef,
}

impl Default for Glitch {
    fn default() -> Self {
        Self {
            period_frames: 20,
            active_frames: 3,
            word_chance: 0.3,
            reroll_frames: 5,
            word_offset_base: 0.0028,
            page_jitter_base: 0.0037,
            intensity_rate: 0.5,
            scale_amount: 0.3,
            active_color: ColorDef::rgb8(0xFF, 0x00, 0x40),
            read_color: ColorDef::rgb8(0x00, 0xFF, 0xFF),
        }
    }
}

/// Active word hops: `|sin(frame * rate + index * word_phase)| * height`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bounce {
    pub rate: f64,
    pub word_phase: f64,
    pub height_base: f64,
    /// Horizontal stretch amplitude; vertical scale compensates.
    pub squish: f64,
}

impl Default for Bounce {
    fn default() -> Self {
        Self {
            rate: 0.4,
            word_phase: 0.3,
            height_base: 0.0139,
            squish: 0.1,
        }
    }
}

/// Satellites circling the active word.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Orbit {
    pub radius_base: f64,
    pub satellites: u32,
    /// Degrees per frame.
    pub speed_deg: f64,
    /// Per-word head start, in frames.
    pub word_lead_frames: f64,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            radius_base: 0.0835,
            satellites: 6,
            speed_deg: 0.3,
            word_lead_frames: 40.0,
        }
    }
}

/// Twinkling star field spread over the caption container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Particles {
    pub count: u32,
    pub size_base: f64,
    pub twinkle_rate: f64,
    pub twinkle_phase: f64,
    pub hue_start_deg: f64,
    pub hue_spread: u32,
}

impl Default for Particles {
    fn default() -> Self {
        Self {
            count: 150,
            size_base: 0.0037,
            twinkle_rate: 0.05,
            twinkle_phase: 0.1,
            hue_start_deg: 200.0,
            hue_spread: 60,
        }
    }
}

/// Upper bound on generated particles per frame.
pub const MAX_PARTICLES: u32 = 4096;

impl Default for StyleDescriptor {
    fn default() -> Self {
        classic()
    }
}

impl StyleDescriptor {
    pub fn validate(&self) -> CaptionFxResult<()> {
        let fail = |msg: String| {
            Err(CaptionFxError::validation(format!(
                "style \"{}\": {msg}",
                self.name
            )))
        };

        if self.name.trim().is_empty() {
            return Err(CaptionFxError::validation("style name must be non-empty"));
        }
        if let Err(msg) = self.layout.validate() {
            return fail(msg);
        }
        let e = &self.enter;
        if !(e.scale_from.is_finite() && e.scale_from > 0.0) {
            return fail("enter.scale_from must be finite and > 0".to_owned());
        }
        if !e.translate_y_from_base.is_finite() || !(0.0..=1.0).contains(&e.opacity_from) {
            return fail(
                "enter.translate_y_from_base must be finite, enter.opacity_from in [0,1]"
                    .to_owned(),
            );
        }
        for (state, look) in [
            ("not_yet_read", self.words.not_yet_read),
            ("currently_reading", self.words.currently_reading),
            ("has_been_read", self.words.has_been_read),
        ] {
            if !(look.scale.is_finite() && look.scale > 0.0) {
                return fail(format!("words.{state}.scale must be finite and > 0"));
            }
            if !look.translate_y_base.is_finite() || !(0.0..=1.0).contains(&look.opacity) {
                return fail(format!(
                    "words.{state}: translate_y_base must be finite, opacity in [0,1]"
                ));
            }
        }

        let d = &self.decorations;
        if let Some(g) = d.glitch {
            if g.period_frames == 0 || g.reroll_frames == 0 {
                return fail(
                    "decorations.glitch period_frames/reroll_frames must be > 0".to_owned(),
                );
            }
            if !(0.0..=1.0).contains(&g.word_chance) {
                return fail("decorations.glitch.word_chance must be in [0,1]".to_owned());
            }
        }
        if let Some(b) = d.bounce
            && !(b.squish.is_finite() && (0.0..1.0).contains(&b.squish))
        {
            return fail("decorations.bounce.squish must be in [0,1)".to_owned());
        }
        if let Some(p) = d.particles
            && p.count > MAX_PARTICLES
        {
            return fail(format!(
                "decorations.particles.count must be <= {MAX_PARTICLES} (got {})",
                p.count
            ));
        }
        Ok(())
    }
}

/// Names of the built-in styles, in registry order.
pub const BUILTIN_STYLE_NAMES: [&str; 6] = [
    "classic",
    "neon-glow",
    "glitch",
    "minimal",
    "bouncy-ball",
    "cosmic-galaxy",
];

pub fn builtin_styles() -> Vec<StyleDescriptor> {
    vec![
        classic(),
        neon_glow(),
        glitch(),
        minimal(),
        bouncy_ball(),
        cosmic_galaxy(),
    ]
}

/// Look up a built-in style by name (case-insensitive).
pub fn builtin_style(name: &str) -> CaptionFxResult<StyleDescriptor> {
    builtin_styles()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| {
            CaptionFxError::validation(format!(
                "unknown style \"{name}\" (known: {})",
                BUILTIN_STYLE_NAMES.join(", ")
            ))
        })
}

fn looks(active: WordLook, read: WordLook, unread: WordLook) -> WordLooks {
    WordLooks {
        not_yet_read: unread,
        currently_reading: active,
        has_been_read: read,
    }
}

fn look(scale: f64, translate_y_base: f64, opacity: f64) -> WordLook {
    WordLook {
        scale,
        translate_y_base,
        opacity,
    }
}

fn enter(scale_from: f64, translate_y_from_base: f64) -> EnterAnimation {
    EnterAnimation {
        scale_from,
        translate_y_from_base,
        ..EnterAnimation::default()
    }
}

fn classic() -> StyleDescriptor {
    StyleDescriptor {
        name: "classic".to_owned(),
        palette: Palette {
            active: ColorDef::rgb8(0x39, 0xE5, 0x08),
            read: ColorDef::WHITE.with_alpha(0.8),
            active_background: ColorDef::rgb8(57, 229, 8).with_alpha(0.3),
            ..Palette::default()
        },
        enter: enter(0.8, 0.0463),
        words: looks(
            look(1.15, -0.0028, 1.0),
            look(1.0, 0.0, 1.0),
            look(0.8, 0.0093, 0.0),
        ),
        reveal: RevealMode::Timed,
        layout: LayoutFractions::default(),
        text_transform: TextTransform::Uppercase,
        decorations: Decorations::default(),
    }
}

fn neon_glow() -> StyleDescriptor {
    let neon = ColorDef::rgb8(0x00, 0xFF, 0xFF);
    StyleDescriptor {
        name: "neon-glow".to_owned(),
        palette: Palette {
            active: neon,
            read: ColorDef::WHITE.with_alpha(0.7),
            active_background: ColorDef::rgb8(0xFF, 0x00, 0x80).with_alpha(0.2),
            glow: neon,
            ..Palette::default()
        },
        enter: enter(0.9, 0.0278),
        words: looks(
            look(1.2, -0.0046, 1.0),
            look(1.0, 0.0, 1.0),
            look(0.7, 0.0139, 0.0),
        ),
        decorations: Decorations {
            glow: Some(Glow {
                active: 1.0,
                read: 0.25,
            }),
            pulse: Some(Pulse {
                rate: 0.3,
                word_phase: 0.0,
                scale_amount: 0.1,
                glow_amount: 0.5,
                background_alpha_amount: 0.3,
            }),
            ..Decorations::default()
        },
        ..classic()
    }
}

fn glitch() -> StyleDescriptor {
    StyleDescriptor {
        name: "glitch".to_owned(),
        palette: Palette {
            active: ColorDef::rgb8(0x40, 0xFF, 0x00),
            read: ColorDef::WHITE.with_alpha(0.8),
            active_background: ColorDef::rgb8(64, 255, 0).with_alpha(0.2),
            glow: ColorDef::rgb8(0x40, 0xFF, 0x00),
            ..Palette::default()
        },
        enter: enter(0.9, 0.0231),
        words: looks(
            look(1.15, -0.0046, 1.0),
            look(1.0, 0.0, 1.0),
            look(0.85, 0.0111, 0.0),
        ),
        decorations: Decorations {
            glow: Some(Glow {
                active: 0.75,
                read: 0.0,
            }),
            glitch: Some(Glitch::default()),
            ..Decorations::default()
        },
        ..classic()
    }
}

fn minimal() -> StyleDescriptor {
    StyleDescriptor {
        name: "minimal".to_owned(),
        palette: Palette {
            active: ColorDef::rgb8(0x6C, 0x5C, 0xE7),
            read: ColorDef::rgb8(0x74, 0xB9, 0xFF),
            active_background: ColorDef::WHITE.with_alpha(0.95),
            ..Palette::default()
        },
        enter: enter(0.95, 0.0185),
        words: looks(
            look(1.026, -0.0074, 1.0),
            look(1.0, 0.0, 1.0),
            look(0.92, 0.0074, 0.0),
        ),
        decorations: Decorations {
            pulse: Some(Pulse {
                rate: 0.08,
                scale_amount: 0.108,
                ..Pulse::default()
            }),
            ..Decorations::default()
        },
        ..classic()
    }
}

fn bouncy_ball() -> StyleDescriptor {
    StyleDescriptor {
        name: "bouncy-ball".to_owned(),
        palette: Palette {
            active: ColorDef::WHITE,
            read: ColorDef::WHITE.with_alpha(0.9),
            active_background_cycle: vec![
                ColorDef::rgb8(0xFF, 0x47, 0x57),
                ColorDef::rgb8(0x2E, 0xD5, 0x73),
                ColorDef::rgb8(0x37, 0x42, 0xFA),
                ColorDef::rgb8(0xFF, 0x63, 0x48),
                ColorDef::rgb8(0xA4, 0xB0, 0xBE),
                ColorDef::rgb8(0xFF, 0xA5, 0x02),
            ],
            ..Palette::default()
        },
        enter: enter(0.8, 0.037),
        words: looks(
            look(1.2, -0.0056, 1.0),
            look(1.0, 0.0, 1.0),
            look(0.7, 0.0185, 0.0),
        ),
        decorations: Decorations {
            bounce: Some(Bounce::default()),
            ..Decorations::default()
        },
        ..classic()
    }
}

fn cosmic_galaxy() -> StyleDescriptor {
    StyleDescriptor {
        name: "cosmic-galaxy".to_owned(),
        palette: Palette {
            active: ColorDef::rgb8(0xE6, 0xF0, 0xFF),
            read: ColorDef::rgb8(0xE6, 0xF0, 0xFF),
            unread: ColorDef::rgb8(0xA0, 0xB4, 0xDC),
            glow: ColorDef::rgb8(0x64, 0xB4, 0xFF),
            ..Palette::default()
        },
        enter: EnterAnimation::default(),
        words: looks(
            look(0.8, 0.0, 1.0),
            look(1.0, 0.0, 1.0),
            look(1.0, 0.0, 0.7),
        ),
        reveal: RevealMode::Progressive,
        layout: LayoutFractions {
            font_size_base: 0.042,
            word_gap_base: 0.022,
            word_padding_x_base: 0.019,
            word_padding_y_base: 0.019,
            ..LayoutFractions::default()
        },
        text_transform: TextTransform::None,
        decorations: Decorations {
            glow: Some(Glow {
                active: 1.0,
                read: 0.5,
            }),
            pulse: Some(Pulse {
                rate: 0.06,
                word_phase: 1.5,
                scale_amount: 0.4,
                ..Pulse::default()
            }),
            orbit: Some(Orbit::default()),
            particles: Some(Particles::default()),
            ..Decorations::default()
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/preset.rs"]
mod tests;
