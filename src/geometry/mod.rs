//! Glyph outlines

pub mod path;

// Re-export commonly used items
pub use path::{outline_to_bez_path, parse_path, PathElement};
