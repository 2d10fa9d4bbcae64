//! Error handling
//!
//! The library reports failures through one `thiserror` enum so callers can
//! match on the kind of failure. The command line front end wraps these in
//! `anyhow` and adds file context on top, see [`SvgtypeContext`].

use thiserror::Error;

use crate::data::font::Codepoint;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed UTF-8 in a text buffer or attribute
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// A byte inside a multi-byte sequence does not look like `10xxxxxx`
    #[error(
        "utf-8 byte {index} (0x{byte:02x}) of the sequence at offset {offset} doesn't start in 10.."
    )]
    InvalidContinuation { offset: usize, index: usize, byte: u8 },

    /// A sequence can't start with this byte
    #[error("byte 0x{byte:02x} at offset {offset} can't start a utf-8 sequence")]
    InvalidLeadByte { offset: usize, byte: u8 },

    /// The buffer ended in the middle of a sequence
    #[error("utf-8 sequence at offset {offset} needs {expected} bytes, buffer ends first")]
    Truncated { offset: usize, expected: usize },

    /// Backward scan found a lead byte that disagrees with the bytes scanned
    #[error("{bits} successive bits, but {bytes} bytes before offset {offset}")]
    LengthMismatch { offset: usize, bits: usize, bytes: usize },

    /// Backward scan ran into the start of the buffer
    #[error("no utf-8 lead byte before offset {offset}")]
    UnexpectedStart { offset: usize },
}

/// Everything that can go wrong while parsing a font or laying out text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed UTF-8
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Malformed or incomplete font document
    #[error("font parse error: {0}")]
    FontParse(String),

    /// The font view has no glyph for this codepoint
    #[error("no glyph for codepoint U+{0:04X}")]
    MissingGlyph(Codepoint),

    /// A single word doesn't fit in the line width
    #[error("next word of \"{text}\" ({width}) doesn't fit in line width {max_width}")]
    TextFormat {
        text: String,
        width: f64,
        max_width: f64,
    },

    /// Reading a file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A font style is unusable, e.g. a size of zero
    #[error("invalid font style: {0}")]
    InvalidStyle(String),
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::FontParse(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Helper functions for adding context in the command line front end
pub trait SvgtypeContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> anyhow::Result<T>;

    /// Add text layout context to an error
    fn with_layout_context(self, text: &str) -> anyhow::Result<T>;
}

impl<T, E> SvgtypeContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> anyhow::Result<T> {
        use anyhow::Context;
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }

    fn with_layout_context(self, text: &str) -> anyhow::Result<T> {
        use anyhow::Context;
        self.with_context(|| format!("Failed to lay out text \"{text}\""))
    }
}
