//! Font data
//!
//! This module holds the in-memory font model:
//! - `font`: metrics, glyphs, kerning and styles of a parsed font
//! - `view`: the `FontView` trait the layout engine works against

pub mod font;
pub mod view;

pub use font::{
    Codepoint, Color, FontBoundingBox, FontData, FontMetrics, FontStyle, GlyphData,
    GlyphMetrics, KernTable, LineCap, LineJoin,
};
pub use view::{FontView, ScaledFont};
