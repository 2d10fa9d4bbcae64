//! Text layout
//!
//! This module turns UTF-8 text into positioned glyph quads:
//! - `measure`: word and line widths, line breaking
//! - `iterate`: left to right emission of line and glyph records
//!
//! Coordinates follow the font: y points up, so every new line moves down by
//! decreasing y. Text is a byte buffer that ends at a `0` byte or at the end
//! of the slice.

pub mod iterate;
pub mod measure;

use serde::{Deserialize, Serialize};

use crate::core::settings::DEFAULT_MAX_WIDTH;
use crate::data::font::Codepoint;
use crate::data::view::FontView;

pub use iterate::{count_lines, iterate_text, iterate_text_with, layout_text, TextVisitor};
pub use measure::{line_height, text_width};

/// Where lines are anchored relative to `start_x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// extend right from start_x
    #[default]
    Left,
    /// extend around start_x
    Center,
    /// extend left from start_x
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    pub start_x: f64,
    /// Baseline of the first line
    pub start_y: f64,
    pub max_width: f64,
    /// Distance between two baselines
    pub line_spacing: f64,
    pub align: TextAlign,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            max_width: DEFAULT_MAX_WIDTH,
            line_spacing: 0.0,
            align: TextAlign::Left,
        }
    }
}

impl TextParams {
    /// Parameters with the line spacing set to the font's line height
    pub fn for_font<F: FontView + ?Sized>(font: &F, max_width: f64) -> Self {
        Self {
            max_width,
            line_spacing: line_height(font),
            ..Default::default()
        }
    }
}

/// A stretch of text and where it ended up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSelectionDetails {
    /// Character offsets into the text, end exclusive
    pub start_position: usize,
    pub end_position: usize,

    pub start_x: f64,
    pub end_x: f64,
    pub base_y: f64,
    pub ascent: f64,
    pub descent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphVertex {
    pub x: f64,
    pub y: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Four vertices, counter clockwise starting bottom left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphQuad {
    pub vertices: [GlyphVertex; 4],
}

impl GlyphQuad {
    /// Quad for a glyph box with its top left corner at `(left, top)`
    ///
    /// Texture coordinates put the texture origin at the bottom left.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        let right = left + width;
        let bottom = top - height;
        Self {
            vertices: [
                GlyphVertex {
                    x: left,
                    y: bottom,
                    tx: 0.0,
                    ty: 0.0,
                },
                GlyphVertex {
                    x: right,
                    y: bottom,
                    tx: 1.0,
                    ty: 0.0,
                },
                GlyphVertex {
                    x: right,
                    y: top,
                    tx: 1.0,
                    ty: 1.0,
                },
                GlyphVertex {
                    x: left,
                    y: top,
                    tx: 0.0,
                    ty: 1.0,
                },
            ],
        }
    }

    pub fn left(&self) -> f64 {
        self.vertices[0].x
    }

    pub fn top(&self) -> f64 {
        self.vertices[3].y
    }

    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.vertices[0].x,
            self.vertices[0].y,
            self.vertices[2].x,
            self.vertices[2].y,
        )
    }
}

/// One glyph positioned by the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPlacement {
    pub codepoint: Codepoint,
    pub quad: GlyphQuad,
    pub selection: TextSelectionDetails,
}

/// What a layout pass emits, in order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayoutRecord {
    Line(TextSelectionDetails),
    Glyph(GlyphPlacement),
}
