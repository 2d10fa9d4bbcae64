//! Glyph outlines and the SVG path mini-language
//!
//! This module reads the `d` attribute of a glyph into a list of
//! [`PathElement`]s and converts such a list into a kurbo path for whoever
//! rasterizes the glyph.
//!
//! # What ends up in a glyph outline?
//! - Lines, horizontal and vertical lines all become `LineTo`
//! - Cubic curves stay cubic, quadratic curves are raised to cubic ones
//! - Elliptical arcs are kept as `ArcTo` with their SVG parameters
//!
//! Arcs are not turned into curves here, not even degenerate ones with a zero
//! radius. Deciding what those look like is up to the rasterizer, see
//! [`outline_to_bez_path`].

use kurbo::{Arc, BezPath, Point, SvgArc, Vec2};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::io::number::{parse_numbers, skip_separators};

/// Accuracy used when approximating arcs with cubic curves, in font units
const ARC_TOLERANCE: f64 = 0.1;

/// How much of the path data to quote in error messages
const FRAGMENT_LEN: usize = 32;

/// One drawing command of a glyph outline, in absolute coordinates
///
/// Each element starts at the current point, which is where the previous
/// element ended. `ClosePath` moves the current point back to the start of
/// the subpath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    /// Two control points and the end point
    CurveTo(Point, Point, Point),
    ArcTo {
        radii: Vec2,
        /// Rotation of the x axis of the ellipse, in radians
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    ClosePath,
}

impl PathElement {
    /// Where the element leaves the pen, `None` for `ClosePath`
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathElement::MoveTo(p) | PathElement::LineTo(p) => Some(p),
            PathElement::CurveTo(_, _, p) => Some(p),
            PathElement::ArcTo { end, .. } => Some(end),
            PathElement::ClosePath => None,
        }
    }
}

/// Converts a quadratic curve to the control points of a cubic one
///
/// Uses the 2/3 rule: each cubic control point lies 2/3 of the way from an
/// end point to the quadratic control point.
pub fn quad_to_cubic(start: Point, control: Point, end: Point) -> (Point, Point) {
    let control1 = Point::new(
        control.x * 2.0 / 3.0 + start.x / 3.0,
        control.y * 2.0 / 3.0 + start.y / 3.0,
    );
    let control2 = Point::new(
        control.x * 2.0 / 3.0 + end.x / 3.0,
        control.y * 2.0 / 3.0 + end.y / 3.0,
    );
    (control1, control2)
}

/// The point symmetric to `control` around `around`
fn reflect(control: Point, around: Point) -> Point {
    around + (around - control)
}

/// Parses SVG path data into a glyph outline
pub fn parse_path(d: &str) -> Result<Vec<PathElement>> {
    let mut parser = PathParser::new(d);
    parser.run()?;
    Ok(parser.elements)
}

struct PathParser<'a> {
    rest: &'a str,
    current: Point,
    subpath_start: Point,
    // Second control point of the previous cubic, for S/s.
    last_cubic_control: Option<Point>,
    // Control point of the previous quadratic, for T/t.
    last_quad_control: Option<Point>,
    elements: Vec<PathElement>,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            rest: d,
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            last_cubic_control: None,
            last_quad_control: None,
            elements: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.rest = skip_separators(self.rest);
            let Some(symbol) = self.rest.chars().next() else {
                return Ok(());
            };
            let fragment = self.rest;
            self.rest = &self.rest[symbol.len_utf8()..];

            if self.elements.is_empty() && !matches!(symbol, 'M' | 'm') {
                return Err(Error::parse(format!(
                    "path data must start with a moveto, not \"{}\"",
                    quote(fragment)
                )));
            }

            // upper is absolute, lower is relative
            let relative = symbol.is_ascii_lowercase();
            match symbol.to_ascii_lowercase() {
                'z' => self.close_path(),
                'm' => self.repeat(symbol, fragment, |p, first| p.move_to(relative, first))?,
                'l' => self.repeat(symbol, fragment, |p, _| p.line_to(relative))?,
                'h' => self.repeat(symbol, fragment, |p, _| p.horizontal_line_to(relative))?,
                'v' => self.repeat(symbol, fragment, |p, _| p.vertical_line_to(relative))?,
                'c' => self.repeat(symbol, fragment, |p, _| p.curve_to(relative))?,
                's' => self.repeat(symbol, fragment, |p, _| p.smooth_curve_to(relative))?,
                'q' => self.repeat(symbol, fragment, |p, _| p.quad_to(relative))?,
                't' => self.repeat(symbol, fragment, |p, _| p.smooth_quad_to(relative))?,
                'a' => self.repeat(symbol, fragment, |p, _| p.arc_to(relative))?,
                _ => {
                    return Err(Error::parse(format!(
                        "unknown path command '{symbol}' in \"{}\"",
                        quote(fragment)
                    )))
                }
            }
        }
    }

    /// Run one coordinate group, then more for as long as numbers follow
    fn repeat(
        &mut self,
        symbol: char,
        fragment: &str,
        mut group: impl FnMut(&mut Self, bool) -> Option<()>,
    ) -> Result<()> {
        let mut first = true;
        while first || self.number_follows() {
            if group(self, first).is_none() {
                return Err(Error::parse(format!(
                    "path command '{symbol}' is missing coordinates in \"{}\"",
                    quote(fragment)
                )));
            }
            first = false;
        }
        Ok(())
    }

    fn number_follows(&self) -> bool {
        matches!(
            skip_separators(self.rest).as_bytes().first(),
            Some(b'0'..=b'9' | b'-' | b'.')
        )
    }

    fn numbers<const N: usize>(&mut self) -> Option<[f64; N]> {
        let (values, rest) = parse_numbers::<N>(self.rest)?;
        self.rest = rest;
        Some(values)
    }

    /// Interpret a coordinate pair in the current mode
    fn point(&self, x: f64, y: f64, relative: bool) -> Point {
        if relative {
            self.current + Vec2::new(x, y)
        } else {
            Point::new(x, y)
        }
    }

    fn push(&mut self, element: PathElement) {
        if let Some(end) = element.end_point() {
            self.current = end;
        }
        self.last_cubic_control = match element {
            PathElement::CurveTo(_, c2, _) => Some(c2),
            _ => None,
        };
        self.last_quad_control = None;
        self.elements.push(element);
    }

    fn close_path(&mut self) {
        self.push(PathElement::ClosePath);
        self.current = self.subpath_start;
    }

    fn move_to(&mut self, relative: bool, first: bool) -> Option<()> {
        let [x, y] = self.numbers::<2>()?;
        let p = self.point(x, y, relative);

        // Pairs after the first one of a moveto are implicit linetos.
        if first {
            self.subpath_start = p;
            self.push(PathElement::MoveTo(p));
        } else {
            self.push(PathElement::LineTo(p));
        }
        Some(())
    }

    fn line_to(&mut self, relative: bool) -> Option<()> {
        let [x, y] = self.numbers::<2>()?;
        let p = self.point(x, y, relative);
        self.push(PathElement::LineTo(p));
        Some(())
    }

    fn horizontal_line_to(&mut self, relative: bool) -> Option<()> {
        let [x] = self.numbers::<1>()?;
        let x = if relative { self.current.x + x } else { x };
        self.push(PathElement::LineTo(Point::new(x, self.current.y)));
        Some(())
    }

    fn vertical_line_to(&mut self, relative: bool) -> Option<()> {
        let [y] = self.numbers::<1>()?;
        let y = if relative { self.current.y + y } else { y };
        self.push(PathElement::LineTo(Point::new(self.current.x, y)));
        Some(())
    }

    fn curve_to(&mut self, relative: bool) -> Option<()> {
        let [x1, y1, x2, y2, x, y] = self.numbers::<6>()?;
        let c1 = self.point(x1, y1, relative);
        let c2 = self.point(x2, y2, relative);
        let end = self.point(x, y, relative);
        self.push(PathElement::CurveTo(c1, c2, end));
        Some(())
    }

    fn smooth_curve_to(&mut self, relative: bool) -> Option<()> {
        let [x2, y2, x, y] = self.numbers::<4>()?;
        let c1 = match self.last_cubic_control {
            Some(previous) => reflect(previous, self.current),
            None => self.current,
        };
        let c2 = self.point(x2, y2, relative);
        let end = self.point(x, y, relative);
        self.push(PathElement::CurveTo(c1, c2, end));
        Some(())
    }

    fn quad_to(&mut self, relative: bool) -> Option<()> {
        let [qx, qy, x, y] = self.numbers::<4>()?;
        let control = self.point(qx, qy, relative);
        let end = self.point(x, y, relative);
        self.push_quad(control, end);
        Some(())
    }

    fn smooth_quad_to(&mut self, relative: bool) -> Option<()> {
        let [x, y] = self.numbers::<2>()?;
        let control = match self.last_quad_control {
            Some(previous) => reflect(previous, self.current),
            None => self.current,
        };
        let end = self.point(x, y, relative);
        self.push_quad(control, end);
        Some(())
    }

    fn push_quad(&mut self, control: Point, end: Point) {
        let (c1, c2) = quad_to_cubic(self.current, control, end);
        self.push(PathElement::CurveTo(c1, c2, end));
        // A quadratic isn't a cubic as far as S/s is concerned.
        self.last_cubic_control = None;
        self.last_quad_control = Some(control);
    }

    fn arc_to(&mut self, relative: bool) -> Option<()> {
        let [rx, ry, rotation] = self.numbers::<3>()?;
        let large_arc = self.flag()?;
        let sweep = self.flag()?;
        let [x, y] = self.numbers::<2>()?;

        let end = self.point(x, y, relative);
        self.push(PathElement::ArcTo {
            radii: Vec2::new(rx, ry),
            rotation: rotation.to_radians(),
            large_arc,
            sweep,
            end,
        });
        Some(())
    }

    /// A single digit flag, `0` is false and any other digit true
    fn flag(&mut self) -> Option<bool> {
        self.rest = skip_separators(self.rest);
        let digit = *self.rest.as_bytes().first()?;
        if !digit.is_ascii_digit() {
            return None;
        }
        self.rest = &self.rest[1..];
        Some(digit != b'0')
    }
}

fn quote(fragment: &str) -> &str {
    match fragment.char_indices().nth(FRAGMENT_LEN) {
        Some((end, _)) => &fragment[..end],
        None => fragment,
    }
}

/// Convert a glyph outline into a kurbo path
///
/// Arcs are approximated with cubic curves the way SVG renderers draw them:
/// an arc with a zero radius is a straight line, an arc that ends where it
/// starts is left out, and radii too small to reach the end point are scaled
/// up.
pub fn outline_to_bez_path(elements: &[PathElement]) -> BezPath {
    let mut path = BezPath::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;

    for element in elements {
        // Outlines built by hand may skip the initial moveto, kurbo needs one.
        if path.elements().is_empty() && !matches!(element, PathElement::MoveTo(_)) {
            path.move_to(current);
        }
        match *element {
            PathElement::MoveTo(p) => {
                path.move_to(p);
                start = p;
            }
            PathElement::LineTo(p) => path.line_to(p),
            PathElement::CurveTo(c1, c2, p) => path.curve_to(c1, c2, p),
            PathElement::ArcTo {
                radii,
                rotation,
                large_arc,
                sweep,
                end,
            } => {
                let svg_arc = SvgArc {
                    from: current,
                    to: end,
                    radii,
                    x_rotation: rotation,
                    large_arc,
                    sweep,
                };
                if current == end {
                    // nothing to draw
                } else if svg_arc.is_straight_line() {
                    path.line_to(end);
                } else if let Some(arc) = Arc::from_svg_arc(&svg_arc) {
                    for el in arc.append_iter(ARC_TOLERANCE) {
                        path.push(el);
                    }
                } else {
                    path.line_to(end);
                }
            }
            PathElement::ClosePath => {
                path.close_path();
                current = start;
                continue;
            }
        }
        if let Some(end) = element.end_point() {
            current = end;
        }
    }

    path
}
