//! Font data model
//!
//! This module contains the types a parsed font is made of:
//! - `FontMetrics`: font-wide metrics in font design units
//! - `GlyphData`: metrics and outline of one glyph
//! - `KernTable`: horizontal kerning pairs
//! - `FontData`: all of the above, owned as a single value
//! - `FontStyle`: size and fill/stroke parameters for a rendered font

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::settings;
use crate::geometry::path::PathElement;

/// One decoded character (a Unicode scalar value, not a byte index)
pub type Codepoint = u32;

/// Per-glyph metrics
///
/// The bearing is the offset from the pen position on the baseline to the
/// top-left corner of the glyph box, with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub bearing_x: f64,
    pub bearing_y: f64,
    pub width: f64,
    pub height: f64,
    pub advance_x: f64,
}

impl GlyphMetrics {
    /// Multiply every field by `scale`
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            bearing_x: self.bearing_x * scale,
            bearing_y: self.bearing_y * scale,
            width: self.width * scale,
            height: self.height * scale,
            advance_x: self.advance_x * scale,
        }
    }
}

/// Ink extents of the whole font
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontBoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl FontBoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            left: self.left * scale,
            bottom: self.bottom * scale,
            right: self.right * scale,
            top: self.top * scale,
        }
    }
}

/// Font-wide metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontMetrics {
    pub units_per_em: f64,
    // Together, these two determine the height of one line.
    pub ascent: f64,
    pub descent: f64,
    pub bbox: FontBoundingBox,
}

impl FontMetrics {
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            units_per_em: self.units_per_em * scale,
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            bbox: self.bbox.scaled(scale),
        }
    }
}

/// Metrics and outline of one glyph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphData {
    pub metrics: GlyphMetrics,
    pub path: Vec<PathElement>,
}

/// Horizontal kerning pairs: left codepoint → right codepoint → adjustment
///
/// The adjustment is added to the advance of the left glyph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KernTable {
    pairs: HashMap<Codepoint, HashMap<Codepoint, f64>>,
}

impl KernTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns 0.0 if the combination doesn't exist
    pub fn get(&self, left: Codepoint, right: Codepoint) -> f64 {
        self.pairs
            .get(&left)
            .and_then(|rights| rights.get(&right))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set the adjustment for a pair, returning the value it replaced
    pub fn insert(&mut self, left: Codepoint, right: Codepoint, value: f64) -> Option<f64> {
        self.pairs.entry(left).or_default().insert(right, value)
    }

    /// Number of pairs in the table
    pub fn len(&self) -> usize {
        self.pairs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(left, right, adjustment)` in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Codepoint, Codepoint, f64)> + '_ {
        self.pairs.iter().flat_map(|(&left, rights)| {
            rights.iter().map(move |(&right, &value)| (left, right, value))
        })
    }

    /// A new table with every adjustment multiplied by `scale`
    pub fn scaled(&self, scale: f64) -> Self {
        let pairs = self
            .pairs
            .iter()
            .map(|(&left, rights)| {
                let rights = rights
                    .iter()
                    .map(|(&right, &value)| (right, value * scale))
                    .collect();
                (left, rights)
            })
            .collect();
        Self { pairs }
    }
}

/// A parsed font: metrics, glyphs keyed by codepoint and one kern table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontData {
    pub metrics: FontMetrics,
    pub glyphs: HashMap<Codepoint, GlyphData>,
    pub horizontal_kern_table: KernTable,
}

impl FontData {
    pub fn glyph(&self, c: Codepoint) -> Option<&GlyphData> {
        self.glyphs.get(&c)
    }

    /// Codepoints that have a glyph, sorted in numeric order
    pub fn codepoints(&self) -> Vec<Codepoint> {
        let mut codepoints: Vec<Codepoint> = self.glyphs.keys().copied().collect();
        codepoints.sort_unstable();
        codepoints
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// How a font should be rendered: point size plus fill and stroke
///
/// Layout never looks inside this, it only passes it along to whoever
/// rasterizes the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub size: f64,
    pub stroke_width: f64,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            size: settings::DEFAULT_FONT_SIZE,
            stroke_width: 0.0,
            fill_color: settings::DEFAULT_FILL_COLOR,
            stroke_color: settings::DEFAULT_STROKE_COLOR,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        }
    }
}

impl FontStyle {
    /// Load a style from a JSON file, missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let style: FontStyle =
            serde_json::from_str(json).map_err(|e| Error::InvalidStyle(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(Error::InvalidStyle(format!(
                "size must be a positive number, got {}",
                self.size
            )));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width >= 0.0) {
            return Err(Error::InvalidStyle(format!(
                "stroke width must not be negative, got {}",
                self.stroke_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kern_table_defaults_to_zero() {
        let mut table = KernTable::new();
        table.insert('A' as Codepoint, 'V' as Codepoint, -80.0);

        assert_eq!(table.get('A' as Codepoint, 'V' as Codepoint), -80.0);
        assert_eq!(table.get('V' as Codepoint, 'A' as Codepoint), 0.0);
        assert_eq!(table.get('A' as Codepoint, 'X' as Codepoint), 0.0);
        assert_eq!(table.get('x' as Codepoint, 'y' as Codepoint), 0.0);
        assert_eq!(KernTable::new().get(0, 0), 0.0);
    }

    #[test]
    fn test_kern_table_last_writer_wins() {
        let mut table = KernTable::new();
        assert_eq!(table.insert(1, 2, 10.0), None);
        assert_eq!(table.insert(1, 2, 20.0), Some(10.0));
        assert_eq!(table.insert(1, 3, 5.0), None);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, 2), 20.0);
    }

    #[test]
    fn test_scaling_leaves_source_untouched() {
        let mut table = KernTable::new();
        table.insert(1, 2, -100.0);
        let scaled = table.scaled(0.5);

        assert_eq!(scaled.get(1, 2), -50.0);
        assert_eq!(table.get(1, 2), -100.0);

        let metrics = FontMetrics {
            units_per_em: 1000.0,
            ascent: 800.0,
            descent: -200.0,
            bbox: FontBoundingBox {
                left: -10.0,
                bottom: -200.0,
                right: 990.0,
                top: 800.0,
            },
        };
        let half = metrics.scaled(0.5);
        assert_eq!(half.units_per_em, 500.0);
        assert_eq!(half.descent, -100.0);
        assert_eq!(half.bbox.width(), 500.0);
        assert_eq!(metrics.bbox.width(), 1000.0);
    }

    #[test]
    fn test_style_from_json_uses_defaults() {
        let style = FontStyle::from_json(r#"{ "size": 24.0, "line_cap": "round" }"#)
            .expect("style should parse");

        assert_eq!(style.size, 24.0);
        assert_eq!(style.line_cap, LineCap::Round);
        assert_eq!(style.line_join, LineJoin::Miter);
        assert_eq!(style.fill_color, settings::DEFAULT_FILL_COLOR);
    }

    #[test]
    fn test_style_rejects_zero_size() {
        let err = FontStyle::from_json(r#"{ "size": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidStyle(_)));
    }
}
