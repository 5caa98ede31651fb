//! Turns caption timing plus a [`StyleDescriptor`] into concrete per-word visuals.
//!
//! The presenter is a pure function of its inputs. Decorative randomness is
//! drawn from [`random_at`] keyed on the token and the frame, so a
//! frame evaluates identically no matter when or on which thread it runs.

use crate::{
    caption::{
        model::{Page, Token},
        timeline::{ReadState, classify_page, revealed_by_progress, time_ms_for_frame},
    },
    foundation::{
        core::{Affine, Canvas, Fps, Vec2},
        error::CaptionFxResult,
        math::{Fnv1a64, interpolate, random_at},
    },
    style::{
        color::ColorDef,
        layout::{ContainerBox, ResponsiveLayout},
        preset::{Glitch, RevealMode, StyleDescriptor},
    },
    text::fit::{TextFitter, TextMeasure, final_font_size},
};

/// Where in the timeline a page is being presented.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub canvas: Canvas,
    pub fps: Fps,
    pub page_index: usize,
    /// Frames since the page appeared.
    pub frame_in_page: u64,
    /// Page-local playback time, relative to the page's `start_ms`.
    pub current_ms: f64,
}

impl FrameContext {
    /// Context for a page whose start falls exactly on a frame boundary.
    pub fn frame_aligned(
        canvas: Canvas,
        fps: Fps,
        page_index: usize,
        frame_in_page: u64,
    ) -> Self {
        Self {
            canvas,
            fps,
            page_index,
            frame_in_page,
            current_ms: time_ms_for_frame(frame_in_page, fps),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentInputs {
    pub page_index: usize,
    pub enter_progress: f64,
    /// Read state per token, in token order.
    pub states: Vec<ReadState>,
    /// Frame fed to frame-driven decorations; `None` for styles without any.
    pub animation_frame: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PresentedPage {
    pub page_index: usize,
    pub enter_progress: f64,
    pub font_size: f64,
    pub stroke_width: f64,
    pub stroke_color: ColorDef,
    pub container: ContainerBox,
    /// Horizontal space between adjacent words.
    pub word_gap: f64,
    /// Centre of the caption line before the page transform.
    pub anchor: Vec2,
    pub scale: f64,
    pub offset: Vec2,
    pub opacity: f64,
    pub words: Vec<PresentedWord>,
    pub particles: Vec<Particle>,
}

impl PresentedPage {
    /// Maps caption-local coordinates (origin at the line centre) to canvas pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.anchor + self.offset) * Affine::scale(self.scale)
    }

    pub fn active_word(&self) -> Option<&PresentedWord> {
        self.words
            .iter()
            .find(|w| w.state == ReadState::CurrentlyReading)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PresentedWord {
    pub index: usize,
    pub text: String,
    pub state: ReadState,
    pub opacity: f64,
    pub color: ColorDef,
    pub background: ColorDef,
    /// Horizontal and vertical scale; equal unless the word is squashed.
    pub scale: Vec2,
    /// Pixel offset from the word's resting position (y-down).
    pub offset: Vec2,
    pub glow_radius: f64,
    pub glow_color: ColorDef,
    pub padding: Vec2,
    pub corner_radius: f64,
    pub glitched: bool,
    pub hue_rotate_deg: f64,
    pub orbit: Option<PresentedOrbit>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PresentedOrbit {
    pub radius: f64,
    pub rotation_deg: f64,
    pub satellites: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    /// Canvas pixels.
    pub position: Vec2,
    pub size: f64,
    pub opacity: f64,
    pub color: ColorDef,
}

pub struct StylePresenter<'a> {
    style: &'a StyleDescriptor,
    layout: ResponsiveLayout,
}

impl<'a> StylePresenter<'a> {
    pub fn new(style: &'a StyleDescriptor, canvas: Canvas) -> Self {
        Self {
            style,
            layout: ResponsiveLayout::resolve(canvas, &style.layout),
        }
    }

    pub fn style(&self) -> &StyleDescriptor {
        self.style
    }

    pub fn layout(&self) -> &ResponsiveLayout {
        &self.layout
    }

    /// Final font size for `page`: the fitted size capped at the style's
    /// desired size.
    pub fn font_size_for<M: TextMeasure>(
        &self,
        fitter: &mut TextFitter<M>,
        page: &Page,
        family: &str,
    ) -> CaptionFxResult<f64> {
        let fitted = fitter.fit(
            &page.sizing_text(),
            family,
            self.layout.max_text_width,
            self.style.text_transform,
        )?;
        Ok(final_font_size(self.layout.desired_font_size, fitted))
    }

    /// The part of a frame that determines its presentation.
    ///
    /// Two frames of the same page with equal inputs present identically, so
    /// callers may evaluate one and reuse it for the other.
    pub fn inputs(&self, ctx: &FrameContext, page: &Page) -> PresentInputs {
        let enter_progress = self.style.enter.curve.progress(ctx.frame_in_page, ctx.fps);
        let states = match self.style.reveal {
            RevealMode::Timed => classify_page(ctx.current_ms, page),
            RevealMode::Progressive => {
                let count = page.tokens.len();
                (0..count)
                    .map(|i| {
                        if revealed_by_progress(i, count, enter_progress) {
                            ReadState::CurrentlyReading
                        } else {
                            ReadState::NotYetRead
                        }
                    })
                    .collect()
            }
        };
        PresentInputs {
            page_index: ctx.page_index,
            enter_progress,
            states,
            animation_frame: self
                .style
                .decorations
                .is_animated()
                .then_some(ctx.frame_in_page),
        }
    }

    pub fn present(&self, ctx: &FrameContext, page: &Page, font_size: f64) -> PresentedPage {
        self.present_inputs(&self.inputs(ctx, page), page, font_size)
    }

    /// Present `page` from precomputed [`PresentInputs`].
    pub fn present_inputs(
        &self,
        inputs: &PresentInputs,
        page: &Page,
        font_size: f64,
    ) -> PresentedPage {
        let style = self.style;
        let layout = &self.layout;
        let frame = inputs.animation_frame.unwrap_or(0);
        let progress = inputs.enter_progress;

        let enter = &style.enter;
        let mut offset = Vec2::new(
            0.0,
            interpolate(
                progress,
                [0.0, 1.0],
                [layout.canvas.of_base(enter.translate_y_from_base), 0.0],
            ),
        );
        if let Some(g) = style.decorations.glitch
            && bursting(&g, frame)
        {
            offset.x = signed_unit(random_at("glitch-page", 0, frame))
                * layout.canvas.of_base(g.page_jitter_base);
        }

        let words = page
            .tokens
            .iter()
            .zip(inputs.states.iter().copied())
            .enumerate()
            .map(|(index, (token, state))| self.present_word(frame, index, token, state))
            .collect();

        PresentedPage {
            page_index: inputs.page_index,
            enter_progress: progress,
            font_size,
            stroke_width: layout.stroke_width,
            stroke_color: style.palette.stroke,
            container: layout.container,
            word_gap: layout.word_gap,
            anchor: layout.container.center(layout.canvas),
            scale: interpolate(progress, [0.0, 1.0], [enter.scale_from, 1.0]),
            offset,
            opacity: interpolate(progress, [0.0, 1.0], [enter.opacity_from, 1.0]),
            words,
            particles: self.particles(frame),
        }
    }

    fn present_word(
        &self,
        frame: u64,
        index: usize,
        token: &Token,
        state: ReadState,
    ) -> PresentedWord {
        let style = self.style;
        let palette = &style.palette;
        let deco = &style.decorations;
        let canvas = self.layout.canvas;
        let look = style.words.for_state(state);
        let active = state == ReadState::CurrentlyReading;

        let mut scale = look.scale;
        let mut squish = 1.0;
        let mut offset = Vec2::new(0.0, canvas.of_base(look.translate_y_base));
        let mut color = match state {
            ReadState::NotYetRead => palette.unread,
            ReadState::CurrentlyReading => palette.active,
            ReadState::HasBeenRead => palette.read,
        };
        let mut background = if !active {
            ColorDef::TRANSPARENT
        } else if palette.active_background_cycle.is_empty() {
            palette.active_background
        } else {
            palette.active_background_cycle[index % palette.active_background_cycle.len()]
        };
        let mut glow_radius = match (deco.glow, state) {
            (Some(g), ReadState::CurrentlyReading) => g.active * self.layout.glow_radius,
            (Some(g), ReadState::HasBeenRead) => g.read * self.layout.glow_radius,
            _ => 0.0,
        };
        let mut orbit = None;

        if active {
            if let Some(p) = deco.pulse {
                let w = unit_wave(frame as f64 * p.rate + index as f64 * p.word_phase);
                scale += w * p.scale_amount;
                glow_radius *= 1.0 + w * p.glow_amount;
                background = background.with_alpha(background.a + w * p.background_alpha_amount);
            }
            if let Some(b) = deco.bounce {
                let lead = index as f64 * b.word_phase;
                let t = frame as f64 * b.rate;
                offset.y -= (t + lead).sin().abs() * canvas.of_base(b.height_base);
                squish = 1.0 + (t * 2.0 + lead).sin() * b.squish;
            }
            if let Some(o) = deco.orbit {
                orbit = Some(PresentedOrbit {
                    radius: canvas.of_base(o.radius_base),
                    rotation_deg: (frame as f64 + index as f64 * o.word_lead_frames) * o.speed_deg,
                    satellites: o.satellites,
                });
            }
        }

        let mut glitched = false;
        let mut hue_rotate_deg = 0.0;
        if let Some(g) = deco.glitch
            && bursting(&g, frame)
        {
            let key = token_key(index, token);
            let roll = frame / g.reroll_frames.max(1);
            glitched = random_at("glitch-word", key, roll) < g.word_chance;
            if glitched {
                let intensity = unit_wave(frame as f64 * g.intensity_rate);
                let jolt = signed_unit(random_at("glitch-offset", key, frame))
                    * canvas.of_base(g.word_offset_base);
                hue_rotate_deg = random_at("glitch-hue", key, frame) * 360.0;
                match state {
                    ReadState::CurrentlyReading => {
                        color = g.active_color;
                        background = g.active_color.with_alpha(0.3 * intensity);
                        scale += intensity * g.scale_amount;
                        offset += Vec2::new(jolt, jolt);
                    }
                    ReadState::HasBeenRead => color = g.read_color,
                    ReadState::NotYetRead => {}
                }
            }
        }

        let (padding, corner_radius) = if active {
            (self.layout.word_padding, self.layout.corner_radius)
        } else {
            (Vec2::ZERO, 0.0)
        };

        PresentedWord {
            index,
            text: style.text_transform.apply(&token.text).into_owned(),
            state,
            opacity: look.opacity,
            color,
            background,
            scale: Vec2::new(scale * squish, scale / squish.max(0.8)),
            offset,
            glow_radius,
            glow_color: palette.glow,
            padding,
            corner_radius,
            glitched,
            hue_rotate_deg,
            orbit,
        }
    }

    fn particles(&self, frame: u64) -> Vec<Particle> {
        let Some(p) = self.style.decorations.particles else {
            return Vec::new();
        };
        let canvas = self.layout.canvas;
        let container = self.layout.container;
        let top = f64::from(canvas.height) - container.bottom - container.height;
        let spread = p.hue_spread.max(1);
        let star = canvas.of_base(p.size_base);

        (0..p.count)
            .map(|i| {
                let fi = f64::from(i);
                // Golden-angle style scatter over the container box.
                let x = (fi * 137.5) % 100.0 / 100.0;
                let y = (fi * 23.5) % 100.0 / 100.0;
                let twinkle = unit_wave(frame as f64 * p.twinkle_rate + fi * p.twinkle_phase);
                let hue = p.hue_start_deg + f64::from(i % spread);
                Particle {
                    position: Vec2::new(x * container.width, top + y * container.height),
                    size: (random_at("star-size", u64::from(i), 0) * 3.0 + 1.0) * star / 4.0,
                    opacity: 0.4 + twinkle * 0.6,
                    color: ColorDef::hsla(hue, 0.7, 0.7 + twinkle * 0.3, 1.0),
                }
            })
            .collect()
    }
}

fn bursting(g: &Glitch, frame: u64) -> bool {
    frame % g.period_frames.max(1) < g.active_frames
}

/// `sin(x)` remapped to `[0, 1]`.
fn unit_wave(x: f64) -> f64 {
    x.sin() * 0.5 + 0.5
}

/// `[0, 1)` → `[-1, 1)`.
fn signed_unit(r: f64) -> f64 {
    r * 2.0 - 1.0
}

/// Per-token noise key; tokens sharing a start time still roll independently.
fn token_key(index: usize, token: &Token) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(index as u64);
    h.write_u64(token.from_ms as u64);
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/style/presenter.rs"]
mod tests;
