// Lay out text with an SVG font from the command line.

use anyhow::Result;
use clap::Parser;
use kurbo::{Affine, Rect, Shape};

use svgtype::core::cli::CliArgs;
use svgtype::core::errors::SvgtypeContext;
use svgtype::data::{FontData, FontStyle, FontView, ScaledFont};
use svgtype::io::load_svg_font;
use svgtype::layout::{
    count_lines, layout_text, line_height, GlyphPlacement, LayoutRecord, TextParams,
};
use svgtype::logger::init_custom_logger;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_custom_logger(args.debug);
    args.validate().map_err(anyhow::Error::msg)?;

    let font = load_svg_font(&args.font_path).with_file_context("load font", &args.font_path)?;
    log::info!(
        "Loaded {} glyphs and {} kerning pairs",
        font.glyphs.len(),
        font.horizontal_kern_table.len()
    );

    let mut style = match &args.style_path {
        Some(path) => FontStyle::from_json_file(path).with_file_context("read style", path)?,
        None => FontStyle::default(),
    };
    if let Some(size) = args.size {
        style.size = size;
    }
    let scaled = ScaledFont::new(&font, style)?;

    let params = TextParams {
        max_width: args.max_width,
        line_spacing: args.line_spacing.unwrap_or_else(|| line_height(&scaled)),
        align: args.align.into(),
        ..Default::default()
    };

    let line_count = count_lines(&scaled, &args.text, &params).with_layout_context(&args.text)?;
    let records = layout_text(&scaled, &args.text, &params).with_layout_context(&args.text)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_summary(&font, &scaled, &records, line_count);
    Ok(())
}

/// Ink bounds of one placed glyph, from its outline
fn glyph_bounds(font: &FontData, scaled: &ScaledFont, glyph: &GlyphPlacement) -> Option<Rect> {
    let data = font.glyph(glyph.codepoint)?;
    if data.path.is_empty() {
        return None;
    }
    let metrics = scaled.glyph_metrics(glyph.codepoint).ok()?;
    let pen_x = glyph.quad.left() - metrics.bearing_x;
    let outline = Affine::translate((pen_x, glyph.selection.base_y)) * scaled.glyph_outline(data);
    Some(outline.bounding_box())
}

fn print_summary(font: &FontData, scaled: &ScaledFont, records: &[LayoutRecord], line_count: usize) {
    let mut ink: Option<Rect> = None;
    let mut glyph_count = 0;

    for record in records {
        match record {
            LayoutRecord::Line(line) => println!(
                "line: chars {}..{}  x {:.2}..{:.2}  baseline {:.2}",
                line.start_position, line.end_position, line.start_x, line.end_x, line.base_y
            ),
            LayoutRecord::Glyph(glyph) => {
                glyph_count += 1;
                let c = char::from_u32(glyph.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
                println!(
                    "  {c:?} U+{:04X}  x {:.2}..{:.2}",
                    glyph.codepoint, glyph.selection.start_x, glyph.selection.end_x
                );
                if let Some(bounds) = glyph_bounds(font, scaled, glyph) {
                    ink = Some(ink.map_or(bounds, |ink| ink.union(bounds)));
                }
            }
        }
    }

    println!(
        "{line_count} lines, {glyph_count} glyphs, size {}",
        scaled.style().map_or(0.0, |style| style.size)
    );
    if let Some(ink) = ink {
        println!(
            "ink bounds: ({:.2}, {:.2}) - ({:.2}, {:.2})",
            ink.x0, ink.y0, ink.x1, ink.y1
        );
    }
}
