//! Font views
//!
//! The layout engine doesn't care where a font comes from. It only needs the
//! four things [`FontView`] exposes. `FontData` works in font design units,
//! `ScaledFont` in the units of a concrete point size.

use std::collections::HashMap;

use crate::core::errors::{Error, Result};
use crate::data::font::{
    Codepoint, FontData, FontMetrics, FontStyle, GlyphData, GlyphMetrics, KernTable,
};

/// What a font must offer to be laid out
pub trait FontView {
    /// Font-wide metrics
    fn metrics(&self) -> &FontMetrics;

    /// Metrics of one glyph, `MissingGlyph` if the font doesn't have it
    fn glyph_metrics(&self, c: Codepoint) -> Result<&GlyphMetrics>;

    /// Horizontal kerning between two glyphs, 0.0 if there is no pair
    fn kern(&self, left: Codepoint, right: Codepoint) -> f64;

    /// Fill and stroke parameters, if the font has been styled
    fn style(&self) -> Option<&FontStyle>;
}

impl FontView for FontData {
    fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn glyph_metrics(&self, c: Codepoint) -> Result<&GlyphMetrics> {
        self.glyphs
            .get(&c)
            .map(|glyph| &glyph.metrics)
            .ok_or(Error::MissingGlyph(c))
    }

    fn kern(&self, left: Codepoint, right: Codepoint) -> f64 {
        self.horizontal_kern_table.get(left, right)
    }

    fn style(&self) -> Option<&FontStyle> {
        None
    }
}

impl<T: FontView + ?Sized> FontView for &T {
    fn metrics(&self) -> &FontMetrics {
        (**self).metrics()
    }

    fn glyph_metrics(&self, c: Codepoint) -> Result<&GlyphMetrics> {
        (**self).glyph_metrics(c)
    }

    fn kern(&self, left: Codepoint, right: Codepoint) -> f64 {
        (**self).kern(left, right)
    }

    fn style(&self) -> Option<&FontStyle> {
        (**self).style()
    }
}

/// A font scaled to a point size
///
/// Built from a `FontData` without touching it, so one parsed font can be
/// scaled to as many sizes as needed. Glyph outlines are kept in font units
/// together with the scale, since rasterizing them happens elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFont {
    style: FontStyle,
    scale: f64,
    // transformed by size
    metrics: FontMetrics,
    glyph_metrics: HashMap<Codepoint, GlyphMetrics>,
    kern_table: KernTable,
}

impl ScaledFont {
    pub fn new(font: &FontData, style: FontStyle) -> Result<Self> {
        style.validate()?;
        if font.metrics.units_per_em <= 0.0 {
            return Err(Error::InvalidStyle(format!(
                "can't scale a font with {} units per em",
                font.metrics.units_per_em
            )));
        }

        let scale = style.size / font.metrics.units_per_em;
        let glyph_metrics = font
            .glyphs
            .iter()
            .map(|(&c, glyph)| (c, glyph.metrics.scaled(scale)))
            .collect();

        log::debug!(
            "Scaled font to size {} (factor {scale}), {} glyphs",
            style.size,
            font.glyphs.len()
        );

        Ok(Self {
            style,
            scale,
            metrics: font.metrics.scaled(scale),
            glyph_metrics,
            kern_table: font.horizontal_kern_table.scaled(scale),
        })
    }

    /// Factor from font units to this font's units
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn kern_table(&self) -> &KernTable {
        &self.kern_table
    }

    /// Transform from font design units into this font's units, y up
    pub fn outline_transform(&self) -> kurbo::Affine {
        kurbo::Affine::scale(self.scale)
    }

    /// A glyph's outline in this font's units, ready for a rasterizer
    pub fn glyph_outline(&self, glyph: &GlyphData) -> kurbo::BezPath {
        self.outline_transform() * crate::geometry::path::outline_to_bez_path(&glyph.path)
    }
}

impl FontView for ScaledFont {
    fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn glyph_metrics(&self, c: Codepoint) -> Result<&GlyphMetrics> {
        self.glyph_metrics.get(&c).ok_or(Error::MissingGlyph(c))
    }

    fn kern(&self, left: Codepoint, right: Codepoint) -> f64 {
        self.kern_table.get(left, right)
    }

    fn style(&self) -> Option<&FontStyle> {
        Some(&self.style)
    }
}
