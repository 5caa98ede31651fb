use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    foundation::error::{CaptionFxError, CaptionFxResult},
    text::fit::TextMeasure,
};

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

/// One registered font file and the family it provides.
#[derive(Clone)]
pub struct FontFace {
    /// Family name reported by the font data.
    pub family: String,
    /// Where the bytes came from (file path or caller-supplied label).
    pub origin: String,
    /// Raw font bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("origin", &self.origin)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Fonts loaded once at startup.
///
/// Every load failure is fatal: a silently substituted font would change every
/// fitted size downstream. The book is immutable after loading and can be shared
/// across worker threads; each worker builds its own [`ParleyMeasurer`].
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes and return the family names they provide.
    pub fn register_bytes(
        &mut self,
        bytes: Vec<u8>,
        origin: impl Into<String>,
    ) -> CaptionFxResult<Vec<String>> {
        let origin = origin.into();
        let families = family_names(&bytes);
        if families.is_empty() {
            return Err(CaptionFxError::font(format!(
                "no font families found in '{origin}'"
            )));
        }
        let bytes = Arc::new(bytes);
        for family in &families {
            tracing::debug!(family = %family, origin = %origin, "registered font");
            self.faces.push(FontFace {
                family: family.clone(),
                origin: origin.clone(),
                bytes: Arc::clone(&bytes),
            });
        }
        Ok(families)
    }

    pub fn load_file(&mut self, path: &Path) -> CaptionFxResult<Vec<String>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font '{}'", path.display()))
            .map_err(|e| CaptionFxError::font(format!("{e:#}")))?;
        self.register_bytes(bytes, path.display().to_string())
    }

    /// Load every font file directly inside `dir`, in file-name order.
    pub fn load_dir(&mut self, dir: &Path) -> CaptionFxResult<Vec<String>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))
            .map_err(|e| CaptionFxError::font(format!("{e:#}")))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_font_path(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CaptionFxError::font(format!(
                "no font files in '{}'",
                dir.display()
            )));
        }

        let mut families = Vec::new();
        for path in paths {
            families.extend(self.load_file(&path)?);
        }
        Ok(families)
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Canonical family name for `family` (case-insensitive), or a font error.
    pub fn require(&self, family: &str) -> CaptionFxResult<&str> {
        let wanted = family.trim();
        self.faces
            .iter()
            .find(|f| f.family.eq_ignore_ascii_case(wanted))
            .map(|f| f.family.as_str())
            .ok_or_else(|| {
                let known: Vec<&str> = self.faces.iter().map(|f| f.family.as_str()).collect();
                CaptionFxError::font(format!(
                    "font family '{wanted}' is not loaded (loaded: {})",
                    if known.is_empty() {
                        "none".to_owned()
                    } else {
                        known.join(", ")
                    }
                ))
            })
    }
}

fn is_font_path(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

fn family_names(bytes: &[u8]) -> Vec<String> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let mut names = Vec::new();
    for (id, _) in families {
        if let Some(name) = font_ctx.collection.family_name(id)
            && !names.iter().any(|n: &String| n == name)
        {
            names.push(name.to_owned());
        }
    }
    names
}

/// Parley-backed [`TextMeasure`] over the fonts of a [`FontBook`].
///
/// Holds mutable shaping contexts, so it is not shared between threads.
pub struct ParleyMeasurer {
    book: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl ParleyMeasurer {
    pub fn new(book: &FontBook) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let mut seen: Vec<&Arc<Vec<u8>>> = Vec::new();
        for face in book.faces() {
            if seen.iter().any(|b| Arc::ptr_eq(b, &face.bytes)) {
                continue;
            }
            seen.push(&face.bytes);
            font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(face.bytes.to_vec()), None);
        }
        Self {
            book: book.clone(),
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        }
    }
}

impl TextMeasure for ParleyMeasurer {
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> CaptionFxResult<f64> {
        let family = self.book.require(family)?.to_owned();
        if !size_px.is_finite() || size_px <= 0.0 {
            return Ok(0.0);
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(f64::from(layout.width()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
