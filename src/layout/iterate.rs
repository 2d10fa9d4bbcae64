//! Left to right text iteration
//!
//! One pass over the text breaks it into lines and reports every line, then
//! every glyph on it, to a [`TextVisitor`]. Nothing is kept between calls, run
//! the pass again to get the records again.

use crate::core::errors::Result;
use crate::data::font::FontMetrics;
use crate::data::view::FontView;
use crate::layout::measure::{line_ending, next_line_width, skip_spaces};
use crate::layout::{
    GlyphPlacement, GlyphQuad, LayoutRecord, TextAlign, TextParams, TextSelectionDetails,
};
use crate::text::utf8::{at_end, count_chars, next_char};

/// Receives the records of a layout pass
///
/// A line is always reported before its glyphs.
pub trait TextVisitor {
    fn on_line(&mut self, _line: &TextSelectionDetails) {}

    fn on_glyph(&mut self, _glyph: &GlyphPlacement) {}
}

impl TextVisitor for Vec<LayoutRecord> {
    fn on_line(&mut self, line: &TextSelectionDetails) {
        self.push(LayoutRecord::Line(*line));
    }

    fn on_glyph(&mut self, glyph: &GlyphPlacement) {
        self.push(LayoutRecord::Glyph(*glyph));
    }
}

struct Callbacks<L, G> {
    on_line: L,
    on_glyph: G,
}

impl<L, G> TextVisitor for Callbacks<L, G>
where
    L: FnMut(&TextSelectionDetails),
    G: FnMut(&GlyphPlacement),
{
    fn on_line(&mut self, line: &TextSelectionDetails) {
        (self.on_line)(line)
    }

    fn on_glyph(&mut self, glyph: &GlyphPlacement) {
        (self.on_glyph)(glyph)
    }
}

fn selection(
    metrics: &FontMetrics,
    positions: (usize, usize),
    start_x: f64,
    end_x: f64,
    base_y: f64,
) -> TextSelectionDetails {
    TextSelectionDetails {
        start_position: positions.0,
        end_position: positions.1,
        start_x,
        end_x,
        base_y,
        ascent: metrics.ascent,
        descent: metrics.descent,
    }
}

fn aligned_x(params: &TextParams, line_width: f64) -> f64 {
    match params.align {
        TextAlign::Left => params.start_x,
        TextAlign::Center => params.start_x - line_width / 2.0,
        TextAlign::Right => params.start_x - line_width,
    }
}

/// Lay out `text` and report lines and glyphs to `visitor`
///
/// The first baseline is at `params.start_y`, every following line is
/// `params.line_spacing` lower. An error stops the pass, records already
/// reported for earlier lines stay reported.
pub fn iterate_text<F, V>(
    font: &F,
    text: impl AsRef<[u8]>,
    params: &TextParams,
    visitor: &mut V,
) -> Result<()>
where
    F: FontView + ?Sized,
    V: TextVisitor + ?Sized,
{
    let text = text.as_ref();
    let metrics = font.metrics();

    let mut pos = 0;
    // characters before pos
    let mut index = 0;
    let mut y = params.start_y;

    while !at_end(text, pos) {
        let (line_width, line_end) = next_line_width(font, text, pos, params.max_width)?;
        let mut x = aligned_x(params, line_width);

        let line_start = skip_spaces(text, pos)?;
        index += count_chars(text, pos, Some(line_start))?;
        pos = line_start;

        let line_chars = count_chars(text, pos, Some(line_end))?;
        log::trace!(
            "Line at y {y}: characters {index}..{}, width {line_width}",
            index + line_chars
        );
        visitor.on_line(&selection(
            metrics,
            (index, index + line_chars),
            x,
            x + line_width,
            y,
        ));

        let mut previous = None;
        while pos < line_end {
            let (c, next) = next_char(text, pos)?;
            let x0 = x;

            if let Some(previous) = previous {
                x += font.kern(previous, c);
            }

            let glyph = font.glyph_metrics(c)?;
            let quad = GlyphQuad::new(
                x + glyph.bearing_x,
                y + glyph.bearing_y,
                glyph.width,
                glyph.height,
            );
            x += glyph.advance_x;

            visitor.on_glyph(&GlyphPlacement {
                codepoint: c,
                quad,
                selection: selection(metrics, (index, index + 1), x0, x, y),
            });

            previous = Some(c);
            pos = next;
            index += 1;
        }

        // See what ended the line, if it was a space the next line skips it.
        if at_end(text, pos) {
            break;
        }
        if let Some(past) = line_ending(text, pos)? {
            index += count_chars(text, pos, Some(past))?;
            pos = past;
        }

        y -= params.line_spacing;
    }

    Ok(())
}

/// Like [`iterate_text`], with one closure per kind of record
pub fn iterate_text_with<F, L, G>(
    font: &F,
    text: impl AsRef<[u8]>,
    params: &TextParams,
    on_line: L,
    on_glyph: G,
) -> Result<()>
where
    F: FontView + ?Sized,
    L: FnMut(&TextSelectionDetails),
    G: FnMut(&GlyphPlacement),
{
    let mut callbacks = Callbacks { on_line, on_glyph };
    iterate_text(font, text, params, &mut callbacks)
}

/// Lay out `text` and collect every record in order
///
/// On error nothing is returned, not even the lines that did fit.
pub fn layout_text<F: FontView + ?Sized>(
    font: &F,
    text: impl AsRef<[u8]>,
    params: &TextParams,
) -> Result<Vec<LayoutRecord>> {
    let mut records = Vec::new();
    iterate_text(font, text, params, &mut records)?;
    Ok(records)
}

/// Number of lines [`iterate_text`] would produce
///
/// Useful to know the height of a text block before laying it out.
pub fn count_lines<F: FontView + ?Sized>(
    font: &F,
    text: impl AsRef<[u8]>,
    params: &TextParams,
) -> Result<usize> {
    let text = text.as_ref();
    let mut pos = 0;
    let mut count = 0;

    while !at_end(text, pos) {
        count += 1;

        let (_, line_end) = next_line_width(font, text, pos, params.max_width)?;
        pos = line_end;

        if at_end(text, pos) {
            break;
        }
        if let Some(past) = line_ending(text, pos)? {
            pos = past;
        }
    }

    Ok(count)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::errors::Error;
    use crate::data::font::{Codepoint, FontBoundingBox, FontData, GlyphData, GlyphMetrics};

    /// Letters are 10 wide, spaces 5, and "av" kerns by -4
    pub(crate) fn test_font() -> FontData {
        let mut font = FontData::default();
        font.metrics = FontMetrics {
            units_per_em: 10.0,
            ascent: 8.0,
            descent: -2.0,
            bbox: FontBoundingBox {
                left: 0.0,
                bottom: -2.0,
                right: 10.0,
                top: 8.0,
            },
        };

        for c in 'a'..='z' {
            font.glyphs.insert(
                c as Codepoint,
                GlyphData {
                    metrics: GlyphMetrics {
                        bearing_x: 1.0,
                        bearing_y: 8.0,
                        width: 8.0,
                        height: 10.0,
                        advance_x: 10.0,
                    },
                    path: Vec::new(),
                },
            );
        }
        for c in [' ', '\t'] {
            font.glyphs.insert(
                c as Codepoint,
                GlyphData {
                    metrics: GlyphMetrics {
                        advance_x: 5.0,
                        ..Default::default()
                    },
                    path: Vec::new(),
                },
            );
        }

        font.horizontal_kern_table.insert('a' as Codepoint, 'v' as Codepoint, -4.0);
        font
    }

    fn params(max_width: f64) -> TextParams {
        TextParams {
            max_width,
            line_spacing: 20.0,
            ..Default::default()
        }
    }

    fn lines(records: &[LayoutRecord]) -> Vec<TextSelectionDetails> {
        records
            .iter()
            .filter_map(|record| match record {
                LayoutRecord::Line(line) => Some(*line),
                LayoutRecord::Glyph(_) => None,
            })
            .collect()
    }

    fn glyphs(records: &[LayoutRecord]) -> Vec<GlyphPlacement> {
        records
            .iter()
            .filter_map(|record| match record {
                LayoutRecord::Glyph(glyph) => Some(*glyph),
                LayoutRecord::Line(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_word_wrap() {
        let font = test_font();
        let text = "one two three";
        let params = params(70.0);

        assert_eq!(count_lines(&font, text, &params).unwrap(), 2);

        let records = layout_text(&font, text, &params).unwrap();
        let lines = lines(&records);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start_position, lines[0].end_position), (0, 7));
        assert_eq!((lines[1].start_position, lines[1].end_position), (8, 13));
        assert_eq!(lines[0].end_x, 65.0);
        assert_eq!(lines[1].end_x, 50.0);
        assert_eq!(lines[0].base_y, 0.0);
        assert_eq!(lines[1].base_y, -20.0);

        let glyphs = glyphs(&records);
        assert_eq!(glyphs.len(), 12, "the space between lines isn't drawn");
        assert_eq!(glyphs[7].codepoint, 't' as Codepoint);
        assert_eq!(glyphs[7].selection.start_position, 8);
        assert_eq!(glyphs[7].quad.left(), 1.0);
    }

    #[test]
    fn test_lines_come_before_their_glyphs() {
        let font = test_font();
        let records = layout_text(&font, "ab cd", &params(20.0)).unwrap();
        let kinds: Vec<&str> = records
            .iter()
            .map(|record| match record {
                LayoutRecord::Line(_) => "line",
                LayoutRecord::Glyph(_) => "glyph",
            })
            .collect();
        assert_eq!(kinds, ["line", "glyph", "glyph", "line", "glyph", "glyph"]);
    }

    #[test]
    fn test_exact_width_fits() {
        let font = test_font();
        assert_eq!(count_lines(&font, "one two", &params(65.0)).unwrap(), 1);
        assert_eq!(count_lines(&font, "one two", &params(64.0)).unwrap(), 2);
    }

    #[test]
    fn test_oversized_word_emits_nothing() {
        let font = test_font();
        let mut records = Vec::new();
        let err = iterate_text(&font, "extraordinary", &params(100.0), &mut records)
            .unwrap_err();

        assert!(matches!(err, Error::TextFormat { .. }));
        assert!(records.is_empty());
        assert!(count_lines(&font, "extraordinary", &params(100.0)).is_err());
    }

    #[test]
    fn test_alignment() {
        let font = test_font();
        let mut params = params(100.0);
        params.start_x = 100.0;

        params.align = TextAlign::Center;
        let records = layout_text(&font, "one", &params).unwrap();
        let first = glyphs(&records)[0];
        assert_eq!(first.quad.left(), 100.0 - 30.0 / 2.0 + 1.0);
        assert_eq!(lines(&records)[0].start_x, 85.0);
        assert_eq!(lines(&records)[0].end_x, 115.0);

        params.align = TextAlign::Right;
        let records = layout_text(&font, "one", &params).unwrap();
        assert_eq!(glyphs(&records)[0].quad.left(), 71.0);
        assert_eq!(lines(&records)[0].end_x, 100.0);
    }

    #[test]
    fn test_glyph_quads_and_selection() {
        let font = test_font();
        let mut params = params(100.0);
        params.start_y = 50.0;

        let records = layout_text(&font, "av", &params).unwrap();
        let glyphs = glyphs(&records);

        // kerned against the a
        let v = glyphs[1];
        assert_eq!(v.quad.left(), 10.0 - 4.0 + 1.0);
        assert_eq!(v.quad.top(), 58.0);
        assert_eq!(v.quad.vertices[0].y, 48.0);
        assert_eq!(v.selection.start_x, 10.0, "selection starts before kerning");
        assert_eq!(v.selection.end_x, 16.0);
        assert_eq!((v.selection.ascent, v.selection.descent), (8.0, -2.0));
        assert_eq!(lines(&records)[0].end_x, 16.0);
    }

    #[test]
    fn test_blank_lines_move_down() {
        let font = test_font();
        let text = "a\n\nb";
        assert_eq!(count_lines(&font, text, &params(100.0)).unwrap(), 3);

        let records = layout_text(&font, text, &params(100.0)).unwrap();
        let lines = lines(&records);
        let ys: Vec<f64> = lines.iter().map(|line| line.base_y).collect();
        assert_eq!(ys, [0.0, -20.0, -40.0]);
        assert_eq!((lines[1].start_position, lines[1].end_position), (2, 2));
        assert_eq!((lines[2].start_position, lines[2].end_position), (3, 4));
    }

    #[test]
    fn test_windows_line_endings() {
        let font = test_font();
        let records = layout_text(&font, "ab\r\ncd", &params(100.0)).unwrap();
        let lines = lines(&records);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start_position, 4);
        assert_eq!(glyphs(&records).len(), 4);
    }

    #[test]
    fn test_trailing_spaces_stay_on_the_line() {
        let font = test_font();
        let records = layout_text(&font, "ab  \ncd", &params(100.0)).unwrap();
        let lines = lines(&records);

        assert_eq!((lines[0].start_position, lines[0].end_position), (0, 4));
        assert_eq!(lines[0].end_x, 20.0, "trailing spaces aren't measured");
        assert_eq!(lines[1].start_position, 5);
        assert_eq!(glyphs(&records).len(), 6);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let font = test_font();
        assert_eq!(count_lines(&font, "abc\n", &params(100.0)).unwrap(), 1);
        assert_eq!(count_lines(&font, "", &params(100.0)).unwrap(), 0);
        assert_eq!(count_lines(&font, "\n\n", &params(100.0)).unwrap(), 2);
    }

    #[test]
    fn test_leading_spaces_are_skipped() {
        let font = test_font();
        let records = layout_text(&font, "  ab", &params(100.0)).unwrap();
        let line = lines(&records)[0];
        assert_eq!((line.start_position, line.end_position), (2, 4));
        assert_eq!(glyphs(&records)[0].quad.left(), 1.0);
    }

    #[test]
    fn test_stops_at_nul() {
        let font = test_font();
        let records = layout_text(&font, b"one\0garbage", &params(100.0)).unwrap();
        assert_eq!(glyphs(&records).len(), 3);
        assert_eq!(lines(&records).len(), 1);
    }

    #[test]
    fn test_missing_glyph() {
        let font = test_font();
        let err = layout_text(&font, "a#", &params(100.0)).unwrap_err();
        assert_eq!(err, Error::MissingGlyph('#' as Codepoint));
    }

    #[test]
    fn test_bad_encoding() {
        let font = test_font();
        let err = layout_text(&font, [b'a', 0xD0, 0x41], &params(100.0)).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_closure_callbacks() {
        let font = test_font();
        let mut line_count = 0;
        let mut text = String::new();
        iterate_text_with(
            &font,
            "ab cd",
            &params(20.0),
            |_| line_count += 1,
            |glyph| text.extend(char::from_u32(glyph.codepoint)),
        )
        .unwrap();

        assert_eq!(line_count, 2);
        assert_eq!(text, "abcd");
    }

    #[test]
    fn test_dyn_font_view() {
        let font = test_font();
        let view: &dyn FontView = &font;
        let records = layout_text(view, "ab", &params(100.0)).unwrap();
        assert_eq!(records.len(), 3);
    }
}
