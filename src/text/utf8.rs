//! UTF-8 decoding over byte buffers
//!
//! Text handed to the layout engine is a byte buffer that ends either at a
//! `0` byte or at the end of the slice, whichever comes first. Positions are
//! byte offsets into that buffer. Decoding can run in both directions, which
//! is what selection handling needs to step back over one character.

use crate::core::errors::EncodingError;
use crate::data::font::Codepoint;

/// Number of uninterrupted 1 bits at the start of a byte
fn leading_ones(byte: u8) -> usize {
    byte.leading_ones() as usize
}

fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// True if `pos` is at the terminator (a `0` byte or the end of the slice)
pub fn at_end(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos).map_or(true, |&b| b == 0)
}

/// Decode the character starting at `pos`
///
/// Returns the codepoint and the position right after it. At the terminator
/// the codepoint is 0 and the position doesn't move.
pub fn next_char(bytes: &[u8], pos: usize) -> Result<(Codepoint, usize), EncodingError> {
    let Some(&first) = bytes.get(pos) else {
        return Ok((0, pos));
    };

    // The number of leading 1 bits is the length of the sequence:
    //   0???????              : 1 byte (ascii)
    //   110?????  10??????    : 2 bytes
    //   1110????  10?????? .. : 3 bytes
    let n_bytes = leading_ones(first);
    if n_bytes == 0 {
        return Ok((first as Codepoint, pos + 1));
    }
    if n_bytes == 1 || n_bytes > 4 {
        return Err(EncodingError::InvalidLeadByte { offset: pos, byte: first });
    }

    // The remaining bits of the first byte are coding bits.
    let mut c = (first & (0x7f >> n_bytes)) as Codepoint;
    for i in 1..n_bytes {
        let byte = match bytes.get(pos + i) {
            Some(&0) | None => {
                return Err(EncodingError::Truncated {
                    offset: pos,
                    expected: n_bytes,
                })
            }
            Some(&b) => b,
        };
        if !is_continuation(byte) {
            return Err(EncodingError::InvalidContinuation {
                offset: pos,
                index: i + 1,
                byte,
            });
        }
        // Six coding bits per continuation byte.
        c = (c << 6) | (byte & 0b0011_1111) as Codepoint;
    }

    Ok((c, pos + n_bytes))
}

/// Decode the character that ends right before `pos`
///
/// Returns the codepoint and the position where it starts.
pub fn prev_char(bytes: &[u8], pos: usize) -> Result<(Codepoint, usize), EncodingError> {
    let mut n_bytes = 0;
    let lead = loop {
        n_bytes += 1;
        if n_bytes > pos {
            return Err(EncodingError::UnexpectedStart { offset: pos });
        }
        let byte = bytes[pos - n_bytes];
        if !is_continuation(byte) {
            break byte;
        }
    };

    // Only ascii characters are allowed to start with a 0 bit.
    let bits = leading_ones(lead).max(1);
    if bits != n_bytes {
        return Err(EncodingError::LengthMismatch {
            offset: pos,
            bits,
            bytes: n_bytes,
        });
    }

    let start = pos - n_bytes;
    let (c, _) = next_char(bytes, start)?;
    Ok((c, start))
}

/// Count the characters from `start` up to `end`, or up to the terminator
pub fn count_chars(bytes: &[u8], start: usize, end: Option<usize>) -> Result<usize, EncodingError> {
    let mut n = 0;
    let mut pos = start;
    while !at_end(bytes, pos) && end.map_or(true, |end| pos < end) {
        let (_, next) = next_char(bytes, pos)?;
        pos = next;
        n += 1;
    }
    Ok(n)
}

/// Advance `n` characters from `start`, stopping early at the terminator
pub fn seek_to_char(bytes: &[u8], start: usize, n: usize) -> Result<usize, EncodingError> {
    let mut pos = start;
    for _ in 0..n {
        if at_end(bytes, pos) {
            break;
        }
        pos = next_char(bytes, pos)?.1;
    }
    Ok(pos)
}

/// Iterator over the codepoints of a buffer, for callers that don't need
/// positions
pub struct Chars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Chars<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for Chars<'_> {
    type Item = Result<Codepoint, EncodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if at_end(self.bytes, self.pos) {
            return None;
        }
        match next_char(self.bytes, self.pos) {
            Ok((c, next)) => {
                self.pos = next;
                Some(Ok(c))
            }
            Err(e) => {
                // Don't report the same error forever.
                self.pos = self.bytes.len();
                Some(Err(e))
            }
        }
    }
}
