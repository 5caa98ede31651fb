use crate::foundation::core::{Canvas, Vec2};

/// Resolution-independent sizing, every entry a fraction of a canvas dimension.
///
/// `*_base` fractions scale with `min(width, height)`; the others are tied to
/// the named axis. Rendering the same page at half the resolution halves every
/// resolved pixel size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutFractions {
    pub font_size_base: f64,
    pub stroke_base: f64,
    /// Distance from the bottom edge to the caption container.
    pub bottom_height: f64,
    pub container_height: f64,
    /// Width available to the fitted caption line.
    pub text_width: f64,
    pub word_gap_base: f64,
    pub word_padding_x_base: f64,
    pub word_padding_y_base: f64,
    pub corner_radius_base: f64,
    pub glow_radius_base: f64,
}

impl Default for LayoutFractions {
    fn default() -> Self {
        Self {
            font_size_base: 0.11,
            stroke_base: 0.018,
            bottom_height: 0.18,
            container_height: 0.08,
            text_width: 0.9,
            word_gap_base: 0.008,
            word_padding_x_base: 0.008,
            word_padding_y_base: 0.004,
            corner_radius_base: 0.008,
            glow_radius_base: 0.02,
        }
    }
}

impl LayoutFractions {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let fields = [
            ("font_size_base", self.font_size_base),
            ("stroke_base", self.stroke_base),
            ("bottom_height", self.bottom_height),
            ("container_height", self.container_height),
            ("text_width", self.text_width),
            ("word_gap_base", self.word_gap_base),
            ("word_padding_x_base", self.word_padding_x_base),
            ("word_padding_y_base", self.word_padding_y_base),
            ("corner_radius_base", self.corner_radius_base),
            ("glow_radius_base", self.glow_radius_base),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("layout.{name} must be finite and >= 0 (got {v})"));
            }
        }
        if self.font_size_base <= 0.0 || self.text_width <= 0.0 {
            return Err("layout.font_size_base and layout.text_width must be > 0".to_owned());
        }
        Ok(())
    }
}

/// [`LayoutFractions`] resolved against a concrete canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResponsiveLayout {
    pub canvas: Canvas,
    pub base_px: f64,
    pub desired_font_size: f64,
    pub stroke_width: f64,
    pub max_text_width: f64,
    pub container: ContainerBox,
    pub word_gap: f64,
    pub word_padding: Vec2,
    pub corner_radius: f64,
    pub glow_radius: f64,
}

/// Caption container: full canvas width, anchored `bottom` px above the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ContainerBox {
    pub bottom: f64,
    pub height: f64,
    pub width: f64,
}

impl ContainerBox {
    /// Centre of the container in canvas coordinates (y down).
    pub fn center(&self, canvas: Canvas) -> Vec2 {
        Vec2::new(
            self.width / 2.0,
            f64::from(canvas.height) - self.bottom - self.height / 2.0,
        )
    }
}

impl ResponsiveLayout {
    pub fn resolve(canvas: Canvas, fractions: &LayoutFractions) -> Self {
        Self {
            canvas,
            base_px: canvas.base_px(),
            desired_font_size: canvas.of_base(fractions.font_size_base),
            stroke_width: canvas.of_base(fractions.stroke_base),
            max_text_width: canvas.of_width(fractions.text_width),
            container: ContainerBox {
                bottom: canvas.of_height(fractions.bottom_height),
                height: canvas.of_height(fractions.container_height),
                width: f64::from(canvas.width),
            },
            word_gap: canvas.of_base(fractions.word_gap_base),
            word_padding: Vec2::new(
                canvas.of_base(fractions.word_padding_x_base),
                canvas.of_base(fractions.word_padding_y_base),
            ),
            corner_radius: canvas.of_base(fractions.corner_radius_base),
            glow_radius: canvas.of_base(fractions.glow_radius_base),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/layout.rs"]
mod tests;
