//! Drawing surface abstraction
//!
//! All coordinates handed to a [`Surface`] are in the surface's user unit and
//! measured from the top-left corner of the page. Font sizes are always in
//! points, matching what printed documents specify.

use crate::document::Color;
use crate::font::FontWeight;
use crate::graphics::RectStyle;
use crate::image::ImageScaleMode;
use crate::text::{calculate_x_offset, wrap_to_width};
use crate::{Align, Result};

/// Points per millimetre
const PT_PER_MM: f64 = 72.0 / 25.4;

/// User unit of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unit {
    /// Millimetres
    #[default]
    Mm,
    /// PDF points (1/72 inch)
    Pt,
}

impl Unit {
    /// Number of PDF points in one user unit
    pub fn scale(self) -> f64 {
        match self {
            Unit::Mm => PT_PER_MM,
            Unit::Pt => 1.0,
        }
    }

    /// Convert a length in millimetres to this unit
    pub fn from_mm(self, mm: f64) -> f64 {
        mm * PT_PER_MM / self.scale()
    }
}

/// Page dimensions in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// A4 portrait in millimetres
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Font selection: weight plus size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size: f64,
}

impl FontSpec {
    pub const fn regular(size: f64) -> Self {
        Self {
            weight: FontWeight::Regular,
            size,
        }
    }

    pub const fn bold(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            size,
        }
    }

    /// Same weight at a different size
    pub const fn with_size(self, size: f64) -> Self {
        Self {
            weight: self.weight,
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::regular(12.0)
    }
}

/// Text measurement capability
///
/// Widths are returned in the user unit of the implementor.
pub trait TextMeasure {
    /// Width of a single line of text
    fn text_width(&self, text: &str, font: FontSpec) -> f64;

    /// Split text into lines no wider than `max_width`
    ///
    /// Explicit newlines always break. Words longer than the width are split
    /// between characters.
    fn wrap_text(&self, text: &str, max_width: f64, font: FontSpec) -> Vec<String> {
        wrap_to_width(text, max_width, |line| self.text_width(line, font))
    }
}

/// A page that can be drawn on
///
/// Implemented by [`crate::PdfDocument`] for real output and by
/// [`crate::Recorder`] for layout tests.
pub trait Surface: TextMeasure {
    /// Size of the page in user units
    fn page_size(&self) -> PageSize;

    /// The surface as a plain measurement capability
    fn as_measure(&self) -> &dyn TextMeasure;

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_color(&mut self, color: Color);

    fn set_text_color(&mut self, color: Color);

    /// Set stroke width in user units
    fn set_line_width(&mut self, width: f64);

    fn set_font(&mut self, font: FontSpec);

    /// Currently selected font
    fn font(&self) -> FontSpec;

    /// Draw a rectangle with its top-left corner at (x, y)
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: RectStyle);

    /// Stroke a straight line
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Draw one line of text with its baseline at y
    fn text(&mut self, text: &str, x: f64, y: f64);

    /// Draw an image with its top-left corner at (x, y)
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `width`, `height` - Target box in user units
    /// * `mode` - How the image is fitted into the box
    fn image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()>;

    /// Produce the finished document
    fn to_bytes(&mut self) -> Result<Vec<u8>>;

    /// Draw text aligned relative to x
    fn text_aligned(&mut self, text: &str, x: f64, y: f64, align: Align) {
        let width = self.text_width(text, self.font());
        let offset = calculate_x_offset(width, 0.0, align);
        self.text(text, x + offset, y);
    }

    /// Draw several lines, advancing the baseline by `line_height` each time
    fn text_lines(&mut self, lines: &[String], x: f64, y: f64, line_height: f64) {
        let mut baseline = y;
        for line in lines {
            self.text(line, x, baseline);
            baseline += line_height;
        }
    }

    /// Width of text in the current font
    fn measure(&self, text: &str) -> f64 {
        self.text_width(text, self.font())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_scale() {
        assert_eq!(Unit::Pt.scale(), 1.0);
        assert!((Unit::Mm.scale() - 2.834_645_669).abs() < 1e-6);
    }

    #[test]
    fn test_from_mm() {
        assert!((Unit::Pt.from_mm(80.0) - 226.771_653).abs() < 1e-4);
        assert!((Unit::Mm.from_mm(80.0) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_spec_constructors() {
        let font = FontSpec::bold(10.0);
        assert_eq!(font.weight, FontWeight::Bold);
        assert_eq!(font.with_size(8.0).size, 8.0);
        assert_eq!(font.with_size(8.0).weight, FontWeight::Bold);
        assert_eq!(FontSpec::default(), FontSpec::regular(12.0));
    }
}
