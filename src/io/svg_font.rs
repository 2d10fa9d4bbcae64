//! SVG font loading
//!
//! This module reads fonts stored in the SVG font format:
//!
//! ```xml
//! <svg>
//!   <defs>
//!     <font horiz-adv-x="500">
//!       <font-face units-per-em="1000" ascent="800" descent="-200" bbox="0 -200 1000 800"/>
//!       <glyph unicode="A" glyph-name="A" horiz-adv-x="620" d="M0 0 L310 700 L620 0 Z"/>
//!       <hkern u1="A" u2="V" k="-80"/>
//!     </font>
//!   </defs>
//! </svg>
//! ```
//!
//! Tag names are matched case insensitively. Glyphs are keyed by their
//! `unicode` attribute, `glyph-name` is only used to resolve the `g1`/`g2`
//! lists of kerning entries.

use std::collections::HashMap;
use std::path::Path;

use roxmltree::{Document, Node};
use smol_str::SmolStr;

use crate::core::errors::{Error, Result};
use crate::core::settings::MAX_UNICODE_ATTRIBUTE_BYTES;
use crate::data::font::{Codepoint, FontBoundingBox, FontData, FontMetrics, GlyphData, GlyphMetrics};
use crate::geometry::path::parse_path;
use crate::io::number::{parse_number_attribute, parse_numbers, skip_separators};
use crate::text::utf8::{at_end, next_char};

/// Glyph names seen so far, only needed while parsing
type GlyphNames = HashMap<SmolStr, Codepoint>;

/// Read and parse an SVG font file
pub fn load_svg_font<P: AsRef<Path>>(path: P) -> Result<FontData> {
    let path = path.as_ref();
    log::info!("Loading SVG font from {}", path.display());
    let bytes = std::fs::read(path)?;
    parse_svg_font_bytes(&bytes)
}

/// Parse an SVG font from raw bytes, which must be UTF-8
pub fn parse_svg_font_bytes(bytes: &[u8]) -> Result<FontData> {
    let document = std::str::from_utf8(bytes)
        .map_err(|e| Error::parse(format!("font document is not valid utf-8: {e}")))?;
    parse_svg_font(document)
}

/// Parse an SVG font document
pub fn parse_svg_font(document: &str) -> Result<FontData> {
    // The tree borrows `document` and is dropped on every way out of here.
    let tree = Document::parse(document)
        .map_err(|e| Error::parse(format!("xml document is not well formed: {e}")))?;

    let root = tree.root_element();
    if !tag_is(root, "svg") {
        return Err(Error::parse(format!(
            "root element is \"{}\", not \"svg\"",
            root.tag_name().name()
        )));
    }

    let defs = find_child(root, "defs")?;
    let font_tag = find_child(defs, "font")?;
    let face = find_child(font_tag, "font-face")?;

    let metrics = parse_font_metrics(face)?;
    let defaults = default_glyph_metrics(font_tag, &metrics)?;

    let mut font = FontData {
        metrics,
        ..Default::default()
    };
    let mut names = GlyphNames::new();

    for glyph_tag in children(font_tag, "glyph") {
        parse_glyph(glyph_tag, &defaults, &mut font, &mut names)?;
    }
    for hkern_tag in children(font_tag, "hkern") {
        parse_hkern(hkern_tag, &names, &mut font)?;
    }

    log::debug!(
        "Parsed SVG font: {} glyphs, {} kerning pairs",
        font.glyphs.len(),
        font.horizontal_kern_table.len()
    );

    Ok(font)
}

fn tag_is(node: Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn find_child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    parent.children().find(|child| tag_is(*child, name)).ok_or_else(|| {
        Error::parse(format!(
            "No {name} tag found in {} tag",
            parent.tag_name().name()
        ))
    })
}

fn children<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent.children().filter(move |child| tag_is(*child, name))
}

fn string_attribute<'a>(tag: Node<'a, '_>, key: &str) -> Result<&'a str> {
    tag.attribute(key).ok_or_else(|| {
        Error::parse(format!(
            "Missing {} attribute: {key}",
            tag.tag_name().name()
        ))
    })
}

fn number_attribute(tag: Node, key: &str) -> Result<f64> {
    let value = string_attribute(tag, key)?;
    parse_number_attribute(value)
        .ok_or_else(|| Error::parse(format!("Cannot convert string \"{value}\" to number")))
}

fn optional_number_attribute(tag: Node, key: &str) -> Result<Option<f64>> {
    if tag.has_attribute(key) {
        number_attribute(tag, key).map(Some)
    } else {
        Ok(None)
    }
}

/// Decode a string that must hold exactly one character
fn single_codepoint(text: &str) -> Option<Codepoint> {
    let bytes = text.as_bytes();
    let (c, next) = next_char(bytes, 0).ok()?;
    (next > 0 && at_end(bytes, next) && next == bytes.len()).then_some(c)
}

fn unicode_attribute(tag: Node, key: &str) -> Result<Codepoint> {
    let value = string_attribute(tag, key)?;
    if value.len() > MAX_UNICODE_ATTRIBUTE_BYTES {
        return Err(Error::parse(format!(
            "{} attribute {key} has length {}. Expecting unicode",
            tag.tag_name().name(),
            value.len()
        )));
    }
    single_codepoint(value)
        .ok_or_else(|| Error::parse(format!("Cannot read string \"{value}\" as utf-8")))
}

fn parse_bounding_box(face: Node) -> Result<FontBoundingBox> {
    let value = string_attribute(face, "bbox")?;
    let ([left, bottom, right, top], _) = parse_numbers::<4>(skip_separators(value))
        .ok_or_else(|| Error::parse("bbox attribute doesn't contain 4 numbers"))?;

    Ok(FontBoundingBox {
        left,
        bottom,
        right,
        top,
    })
}

fn parse_font_metrics(face: Node) -> Result<FontMetrics> {
    let metrics = FontMetrics {
        ascent: number_attribute(face, "ascent")?,
        descent: number_attribute(face, "descent")?,
        units_per_em: number_attribute(face, "units-per-em")?,
        bbox: parse_bounding_box(face)?,
    };

    if metrics.units_per_em <= 0.0 {
        return Err(Error::parse(format!(
            "units-per-em must be positive, got {}",
            metrics.units_per_em
        )));
    }

    Ok(metrics)
}

/// Metrics for glyphs that don't specify their own
///
/// The glyph box defaults to the font's bounding box. The `font` tag may
/// override the advance and shift the origin, which is an offset from the
/// top-left corner of the bounding box.
fn default_glyph_metrics(font_tag: Node, metrics: &FontMetrics) -> Result<GlyphMetrics> {
    let bbox = &metrics.bbox;
    let mut defaults = GlyphMetrics {
        bearing_x: bbox.left,
        bearing_y: bbox.top,
        width: bbox.width(),
        height: bbox.height(),
        advance_x: bbox.width(),
    };

    if let Some(advance) = optional_number_attribute(font_tag, "horiz-adv-x")? {
        defaults.advance_x = advance;
    }
    if let Some(x) = optional_number_attribute(font_tag, "horiz-origin-x")? {
        defaults.bearing_x = bbox.left + x;
    }
    if let Some(y) = optional_number_attribute(font_tag, "horiz-origin-y")? {
        defaults.bearing_y = bbox.top + y;
    }

    Ok(defaults)
}

fn parse_glyph(
    glyph_tag: Node,
    defaults: &GlyphMetrics,
    font: &mut FontData,
    names: &mut GlyphNames,
) -> Result<()> {
    if !glyph_tag.has_attribute("unicode") {
        log::debug!(
            "Skipping glyph without unicode attribute: {}",
            glyph_tag.attribute("glyph-name").unwrap_or("<unnamed>")
        );
        return Ok(());
    }

    let c = unicode_attribute(glyph_tag, "unicode")?;

    if let Some(name) = glyph_tag.attribute("glyph-name") {
        names.insert(SmolStr::new(name), c);
    }

    // A glyph origin replaces the font's, both count from the bbox corner
    let bbox = &font.metrics.bbox;
    let mut metrics = *defaults;
    if let Some(advance) = optional_number_attribute(glyph_tag, "horiz-adv-x")? {
        metrics.advance_x = advance;
    }
    if let Some(x) = optional_number_attribute(glyph_tag, "horiz-origin-x")? {
        metrics.bearing_x = bbox.left + x;
    }
    if let Some(y) = optional_number_attribute(glyph_tag, "horiz-origin-y")? {
        metrics.bearing_y = bbox.top + y;
    }

    // 'd' might be missing for a whitespace glyph
    let path = match glyph_tag.attribute("d") {
        Some(d) => parse_path(d).map_err(|e| match e {
            Error::FontParse(message) => {
                Error::FontParse(format!("glyph U+{c:04X}: {message}"))
            }
            other => other,
        })?,
        None => Vec::new(),
    };

    if font.glyphs.insert(c, GlyphData { metrics, path }).is_some() {
        log::warn!("Glyph U+{c:04X} is defined more than once, keeping the last one");
    }

    Ok(())
}

fn parse_glyph_name_list(tag: Node, key: &str, names: &GlyphNames) -> Result<Vec<Codepoint>> {
    string_attribute(tag, key)?
        .split(',')
        .map(str::trim)
        .map(|name| {
            names
                .get(name)
                .copied()
                .ok_or_else(|| Error::parse(format!("No such glyph: {name}")))
        })
        .collect()
}

fn parse_unicode_list(tag: Node, key: &str) -> Result<Vec<Codepoint>> {
    string_attribute(tag, key)?
        .split(',')
        .map(|repr| {
            single_codepoint(repr).ok_or_else(|| {
                Error::parse(format!(
                    "Error interpreting {} attribute {key} \"{repr}\" as utf-8",
                    tag.tag_name().name()
                ))
            })
        })
        .collect()
}

fn parse_hkern(hkern_tag: Node, names: &GlyphNames, font: &mut FontData) -> Result<()> {
    let k = number_attribute(hkern_tag, "k")?;

    let mut lefts = Vec::new();
    let mut rights = Vec::new();
    if hkern_tag.has_attribute("g1") {
        lefts.extend(parse_glyph_name_list(hkern_tag, "g1", names)?);
    }
    if hkern_tag.has_attribute("g2") {
        rights.extend(parse_glyph_name_list(hkern_tag, "g2", names)?);
    }
    if hkern_tag.has_attribute("u1") {
        lefts.extend(parse_unicode_list(hkern_tag, "u1")?);
    }
    if hkern_tag.has_attribute("u2") {
        rights.extend(parse_unicode_list(hkern_tag, "u2")?);
    }

    for &left in &lefts {
        for &right in &rights {
            if let Some(previous) = font.horizontal_kern_table.insert(left, right, k) {
                log::warn!(
                    "Kerning pair U+{left:04X} U+{right:04X} redefined: {previous} -> {k}"
                );
            }
        }
    }

    Ok(())
}
