//! Parley-backed glyph shaping and measurement.
//!
//! The curved caption is placed glyph by glyph, so the engine shapes one
//! character at a time (mirroring per-character canvas measurement) and
//! caches the result per (character, family, size). Whole-string shaping is
//! used where a single straight measure is enough, such as badge sizing.
//!
//! When no font resolves — headless environments without system fonts, or an
//! unknown family with no fallback — shaping yields empty runs and zero
//! advances. The renderer then simply paints no glyphs, consistent with the
//! engine-wide policy of degrading instead of failing.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::foundation::error::{RingletError, RingletResult};

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Glyphs of one font run, ready for the raster backend.
#[derive(Clone)]
pub struct ShapedRun {
    /// Font data for the run (blob rebuilt from the resolved font bytes so
    /// the raster backend never borrows Parley internals).
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    /// Glyph ids and offsets relative to the layout's top-left origin.
    pub glyphs: Vec<vello_cpu::Glyph>,
}

impl std::fmt::Debug for ShapedRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedRun")
            .field("font_size", &self.font_size)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

/// A shaped piece of text: one or more font runs plus overall metrics.
#[derive(Clone, Debug, Default)]
pub struct ShapedText {
    pub runs: Vec<ShapedRun>,
    /// Advance width including trailing whitespace.
    pub width: f64,
    /// Layout height (ascent + descent + leading of the single line).
    pub height: f64,
}

impl ShapedText {
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.glyphs.is_empty())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CharKey {
    ch: char,
    family: String,
    size_bits: u32,
}

/// Shaping and measuring engine with Parley font/layout contexts and a
/// per-character cache.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    char_cache: HashMap<CharKey, ShapedText>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct an engine backed by the system font collection.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            char_cache: HashMap::new(),
        }
    }

    /// Register explicit font bytes and return the primary family name.
    ///
    /// Useful where no system fonts exist (CI, containers) or a bundled
    /// font must win over system lookup.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> RingletResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RingletError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RingletError::validation("registered font family has no name"))?
            .to_string();
        Ok(family_name)
    }

    /// Shape a whole string on one line and return runs plus metrics.
    pub fn shape(&mut self, text: &str, family: &str, size_px: f32) -> ShapedText {
        if text.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return ShapedText::default();
        }

        let stack = format!("{family}, sans-serif");
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font = run.run().font().clone();
                let font_bytes: Vec<u8> = font.data.as_ref().to_vec();
                let font_data = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font_bytes),
                    font.index,
                );
                let glyphs = run
                    .glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push(ShapedRun {
                    font: font_data,
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        if runs.is_empty() {
            tracing::debug!(family, "no font resolved; caption degrades to empty");
        }

        ShapedText {
            runs,
            width: f64::from(layout.full_width()),
            height: f64::from(layout.height()),
        }
    }

    /// Shape a single character, cached per (character, family, size).
    pub fn shape_char(&mut self, ch: char, family: &str, size_px: f32) -> ShapedText {
        let key = CharKey {
            ch,
            family: family.to_string(),
            size_bits: size_px.to_bits(),
        };
        if let Some(hit) = self.char_cache.get(&key) {
            return hit.clone();
        }
        let shaped = self.shape(&ch.to_string(), family, size_px);
        self.char_cache.insert(key, shaped.clone());
        shaped
    }

    /// Advance width of one character, zero when nothing shapes.
    pub fn char_advance(&mut self, ch: char, family: &str, size_px: f32) -> f64 {
        self.shape_char(ch, family, size_px).width
    }

    /// Width of a whole string with letter spacing inserted between
    /// characters (not after the last one).
    pub fn measure(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        letter_spacing: f64,
    ) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let base = self.shape(text, family, size_px).width;
        let gaps = text.chars().count().saturating_sub(1) as f64;
        base + gaps * letter_spacing
    }
}
