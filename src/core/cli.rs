//! Command line arguments for the svgtype tool

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::settings::DEFAULT_MAX_WIDTH;
use crate::layout::TextAlign;

/// Lay out text with an SVG font and print where every glyph goes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to an SVG font file
    #[arg(long = "font", default_value = "assets/fonts/svgtype-test.svg")]
    pub font_path: PathBuf,

    /// JSON file with a font style (size, fill and stroke)
    #[arg(long = "style")]
    pub style_path: Option<PathBuf>,

    /// point size, overrides the style file
    #[arg(long)]
    pub size: Option<f64>,

    /// lines wrap at this width
    #[arg(long = "max-width", default_value_t = DEFAULT_MAX_WIDTH)]
    pub max_width: f64,

    #[arg(long, value_enum, default_value_t = AlignArg::Left)]
    pub align: AlignArg,

    /// distance between baselines, the font's line height by default
    #[arg(long = "line-spacing")]
    pub line_spacing: Option<f64>,

    /// print every layout record as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// the text to lay out
    pub text: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for TextAlign {
    fn from(align: AlignArg) -> Self {
        match align {
            AlignArg::Left => TextAlign::Left,
            AlignArg::Center => TextAlign::Center,
            AlignArg::Right => TextAlign::Right,
        }
    }
}

impl CliArgs {
    /// Catch numbers clap accepts but layout can't use
    pub fn validate(&self) -> Result<(), String> {
        if let Some(size) = self.size {
            if !(size.is_finite() && size > 0.0) {
                return Err(format!("--size must be positive, got {size}"));
            }
        }
        if !(self.max_width.is_finite() && self.max_width > 0.0) {
            return Err(format!(
                "--max-width must be positive, got {}",
                self.max_width
            ));
        }
        if let Some(spacing) = self.line_spacing {
            if !spacing.is_finite() {
                return Err(format!("--line-spacing must be a number, got {spacing}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = CliArgs::try_parse_from([
            "svgtype",
            "--font",
            "a.svg",
            "--align",
            "center",
            "--max-width",
            "120",
            "hello world",
        ])
        .unwrap();

        assert_eq!(args.font_path, PathBuf::from("a.svg"));
        assert_eq!(TextAlign::from(args.align), TextAlign::Center);
        assert_eq!(args.max_width, 120.0);
        assert_eq!(args.text, "hello world");
        assert_eq!(args.size, None);
        assert!(!args.json);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let args =
            CliArgs::try_parse_from(["svgtype", "--size", "0", "text"]).unwrap();
        assert!(args.validate().is_err());

        let args =
            CliArgs::try_parse_from(["svgtype", "--max-width=-5", "text"]).unwrap();
        assert!(args.validate().is_err());
    }
}
