//! svgtype reads SVG fonts and lays out text with them.
//!
//! Parse a font with [`io::parse_svg_font`] or [`io::load_svg_font`], scale
//! it to a point size with [`data::ScaledFont`], then hand it to
//! [`layout::iterate_text`] or [`layout::layout_text`] to get line and glyph
//! records back.

pub mod core;
pub mod data;
pub mod geometry;
pub mod io;
pub mod layout;
pub mod logger;
pub mod text;

pub use crate::core::errors::{EncodingError, Error, Result};
pub use crate::data::{Codepoint, FontData, FontStyle, FontView, ScaledFont};
pub use crate::io::{load_svg_font, parse_svg_font};
pub use crate::layout::{
    count_lines, iterate_text, iterate_text_with, layout_text, LayoutRecord, TextAlign,
    TextParams, TextVisitor,
};
