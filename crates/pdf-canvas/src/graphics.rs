//! Vector graphics operators

use crate::document::Color;
use crate::text::fmt_num;

/// How a rectangle is painted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RectStyle {
    /// Fill with the current fill color
    #[default]
    Fill,
    /// Outline with the current stroke color
    Stroke,
    /// Fill, then outline
    FillStroke,
}

impl RectStyle {
    fn paint_operator(self) -> &'static str {
        match self {
            RectStyle::Fill => "f",
            RectStyle::Stroke => "S",
            RectStyle::FillStroke => "B",
        }
    }
}

/// Graphics state applied to a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PathPaint {
    pub fill: Color,
    pub stroke: Color,
    /// Line width in points
    pub line_width: f64,
}

/// Generate PDF operators for a rectangle
///
/// # Arguments
/// * `x` - Left edge in points
/// * `y` - Bottom edge in points (PDF coordinates)
/// * `width` - Width in points
/// * `height` - Height in points
pub(crate) fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    style: RectStyle,
    paint: &PathPaint,
) -> Vec<u8> {
    let mut ops = String::from("q\n");
    ops.push_str(&format!("{} rg\n", paint.fill.to_operands()));
    ops.push_str(&format!("{} RG\n", paint.stroke.to_operands()));
    ops.push_str(&format!("{} w\n", fmt_num(paint.line_width)));
    ops.push_str(&format!(
        "{} {} {} {} re\n",
        fmt_num(x),
        fmt_num(y),
        fmt_num(width),
        fmt_num(height)
    ));
    ops.push_str(style.paint_operator());
    ops.push_str("\nQ\n");
    ops.into_bytes()
}

/// Generate PDF operators for a stroked line segment (all values in points)
pub(crate) fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    paint: &PathPaint,
) -> Vec<u8> {
    let mut ops = String::from("q\n");
    ops.push_str(&format!("{} RG\n", paint.stroke.to_operands()));
    ops.push_str(&format!("{} w\n", fmt_num(paint.line_width)));
    ops.push_str(&format!("{} {} m\n", fmt_num(x1), fmt_num(y1)));
    ops.push_str(&format!("{} {} l\n", fmt_num(x2), fmt_num(y2)));
    ops.push_str("S\nQ\n");
    ops.into_bytes()
}
