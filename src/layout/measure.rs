//! Measuring words and lines
//!
//! A word is a run of characters up to the next space, tab, line ending or
//! the end of the text. Kerning only applies between characters measured in
//! the same call, so it never crosses a word boundary while lines are being
//! broken.

use crate::core::errors::{Error, Result};
use crate::data::font::Codepoint;
use crate::data::view::FontView;
use crate::text::utf8::{at_end, next_char};

pub fn is_space(c: Codepoint) -> bool {
    c == ' ' as Codepoint || c == '\t' as Codepoint
}

/// First position at or after `pos` that isn't a space
pub fn skip_spaces(text: &[u8], mut pos: usize) -> Result<usize> {
    loop {
        let (c, next) = next_char(text, pos)?;
        if c == 0 || !is_space(c) {
            return Ok(pos);
        }
        pos = next;
    }
}

/// If a line ending (`\n` or `\r\n`) starts at `pos`, the position after it
pub fn line_ending(text: &[u8], pos: usize) -> Result<Option<usize>> {
    let (c, next) = next_char(text, pos)?;
    if c == '\n' as Codepoint {
        return Ok(Some(next));
    }
    if c == '\r' as Codepoint {
        let (c, past) = next_char(text, next)?;
        if c == '\n' as Codepoint {
            return Ok(Some(past));
        }
    }
    Ok(None)
}

/// True at the end of the text or at a line ending
pub fn at_line_break(text: &[u8], pos: usize) -> Result<bool> {
    Ok(at_end(text, pos) || line_ending(text, pos)?.is_some())
}

/// Running width of a sequence of glyphs, kerned against each other
struct Pen<'a, F: FontView + ?Sized> {
    font: &'a F,
    width: f64,
    previous: Option<Codepoint>,
}

impl<'a, F: FontView + ?Sized> Pen<'a, F> {
    fn new(font: &'a F) -> Self {
        Self {
            font,
            width: 0.0,
            previous: None,
        }
    }

    fn advance(&mut self, c: Codepoint) -> Result<()> {
        if let Some(previous) = self.previous {
            self.width += self.font.kern(previous, c);
        }
        self.width += self.font.glyph_metrics(c)?.advance_x;
        self.previous = Some(c);
        Ok(())
    }
}

/// The next word and the spaces in front of it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word {
    /// Width including the leading spaces
    pub width: f64,
    /// Width of the word alone
    pub own_width: f64,
    /// Where the word itself starts, after the spaces
    pub start: usize,
    /// Position right after the word
    pub end: usize,
}

/// Measure the word at `pos`, including the spaces that precede it
///
/// Spaces followed by a line ending or the end of the text don't make a
/// word, their width is 0 and `end` is the line break.
pub fn next_word_width<F: FontView + ?Sized>(font: &F, text: &[u8], pos: usize) -> Result<Word> {
    let mut total = Pen::new(font);
    let mut pos = pos;

    loop {
        if at_line_break(text, pos)? {
            return Ok(Word {
                width: 0.0,
                own_width: 0.0,
                start: pos,
                end: pos,
            });
        }
        let (c, next) = next_char(text, pos)?;
        if !is_space(c) {
            break;
        }
        total.advance(c)?;
        pos = next;
    }

    let start = pos;
    let mut own = Pen::new(font);
    loop {
        if at_line_break(text, pos)? {
            break;
        }
        let (c, next) = next_char(text, pos)?;
        if is_space(c) {
            break;
        }
        total.advance(c)?;
        own.advance(c)?;
        pos = next;
    }

    Ok(Word {
        width: total.width,
        own_width: own.width,
        start,
        end: pos,
    })
}

/// Break off the next line starting at `pos`
///
/// Leading spaces are skipped. Whole words are added while the line stays
/// within `max_width`, a line that is exactly `max_width` wide still fits.
/// Returns the line width and the position where the line ends: a line
/// ending, the end of the text, or the spaces in front of the first word that
/// didn't fit.
pub fn next_line_width<F: FontView + ?Sized>(
    font: &F,
    text: &[u8],
    pos: usize,
    max_width: f64,
) -> Result<(f64, usize)> {
    let mut pos = skip_spaces(text, pos)?;
    let mut line_width = 0.0;

    loop {
        let word = next_word_width(font, text, pos)?;
        if word.own_width > max_width {
            return Err(Error::TextFormat {
                text: String::from_utf8_lossy(&text[word.start..word.end]).into_owned(),
                width: word.own_width,
                max_width,
            });
        }
        if line_width + word.width > max_width {
            return Ok((line_width, pos));
        }

        line_width += word.width;
        pos = word.end;

        if at_line_break(text, pos)? {
            return Ok((line_width, pos));
        }
    }
}

/// Width of the text up to its first line break, without wrapping
pub fn text_width<F: FontView + ?Sized>(font: &F, text: impl AsRef<[u8]>) -> Result<f64> {
    let text = text.as_ref();
    let mut pen = Pen::new(font);
    let mut pos = 0;
    while !at_line_break(text, pos)? {
        let (c, next) = next_char(text, pos)?;
        pen.advance(c)?;
        pos = next;
    }
    Ok(pen.width)
}

/// Distance from the highest ascender to the lowest descender
pub fn line_height<F: FontView + ?Sized>(font: &F) -> f64 {
    let metrics = font.metrics();
    metrics.ascent - metrics.descent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::iterate::tests::test_font;

    #[test]
    fn test_spaces() {
        assert!(is_space(' ' as Codepoint));
        assert!(is_space('\t' as Codepoint));
        assert!(!is_space('\n' as Codepoint));
        assert!(!is_space(0xA0));

        assert_eq!(skip_spaces(b" \t a", 0).unwrap(), 3);
        assert_eq!(skip_spaces(b"   ", 0).unwrap(), 3);
        assert_eq!(skip_spaces(b"a", 0).unwrap(), 0);
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(line_ending(b"\nx", 0).unwrap(), Some(1));
        assert_eq!(line_ending(b"\r\nx", 0).unwrap(), Some(2));
        assert_eq!(line_ending(b"\rx", 0).unwrap(), None);
        assert_eq!(line_ending(b"x", 0).unwrap(), None);
        assert!(at_line_break(b"", 0).unwrap());
        assert!(at_line_break(b"a\0", 1).unwrap());
    }

    #[test]
    fn test_word_includes_leading_spaces() {
        let font = test_font();
        let word = next_word_width(&font, b"one two", 3).unwrap();
        assert_eq!(word.width, 35.0);
        assert_eq!(word.own_width, 30.0);
        assert_eq!((word.start, word.end), (4, 7));
    }

    #[test]
    fn test_trailing_spaces_are_not_a_word() {
        let font = test_font();
        let word = next_word_width(&font, b"ab  \ncd", 2).unwrap();
        assert_eq!(word.width, 0.0);
        assert_eq!(word.end, 4, "ends at the line break");
    }

    #[test]
    fn test_kerning_inside_words_only() {
        let font = test_font();
        assert_eq!(text_width(&font, "av").unwrap(), 16.0);
        // No pairs between a letter and a space.
        assert_eq!(text_width(&font, "a v").unwrap(), 25.0);

        let word = next_word_width(&font, b"av", 0).unwrap();
        assert_eq!(word.width, 16.0);
    }

    #[test]
    fn test_line_width_fits_exactly() {
        let font = test_font();
        let (width, end) = next_line_width(&font, b"one two three", 0, 65.0).unwrap();
        assert_eq!(width, 65.0);
        assert_eq!(end, 7);

        let (width, end) = next_line_width(&font, b"one two three", 0, 64.9).unwrap();
        assert_eq!(width, 30.0);
        assert_eq!(end, 3);
    }

    #[test]
    fn test_oversized_word() {
        let font = test_font();
        let err = next_line_width(&font, b"  extraordinary", 0, 100.0).unwrap_err();
        assert_eq!(
            err,
            Error::TextFormat {
                text: "extraordinary".to_string(),
                width: 130.0,
                max_width: 100.0
            }
        );
    }

    #[test]
    fn test_text_width_stops_at_line_break() {
        let font = test_font();
        assert_eq!(text_width(&font, "ab\ncdef").unwrap(), 20.0);
        assert_eq!(text_width(&font, "").unwrap(), 0.0);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(line_height(&test_font()), 10.0);
    }
}
