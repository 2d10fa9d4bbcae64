// Settings ///////////////////////////////////////////////////////////////////
// Defaults used when the caller doesn't say otherwise.

use crate::data::font::Color;

// Font Style /////////////////////////////////////////////////////////////////

/// Point size a font is scaled to when no style is given
pub const DEFAULT_FONT_SIZE: f64 = 32.0;

/// Opaque black fill
pub const DEFAULT_FILL_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

/// Fully transparent stroke, so nothing is stroked by default
pub const DEFAULT_STROKE_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

// Layout /////////////////////////////////////////////////////////////////////

/// Line width used by the command line tool when none is given
pub const DEFAULT_MAX_WIDTH: f64 = 800.0;

// Unicode attributes /////////////////////////////////////////////////////////

/// The longest UTF-8 encoding of a single codepoint
pub const MAX_UNICODE_ATTRIBUTE_BYTES: usize = 4;
