//! Input/Output Operations
//!
//! This module handles reading fonts from disk:
//! - SVG font documents
//! - The number syntax used by their attributes

pub mod number;
pub mod svg_font;

pub use svg_font::{load_svg_font, parse_svg_font, parse_svg_font_bytes};
