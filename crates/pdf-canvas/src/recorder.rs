//! Display-list surface for layout tests
//!
//! [`Recorder`] measures text with the built-in Helvetica metrics, exactly
//! like [`crate::PdfDocument`] without an embedded family, and keeps every
//! draw call as a [`DrawOp`] instead of producing PDF operators.

use crate::document::Color;
use crate::image::{calculate_scaled_dimensions, get_dimensions, ImageScaleMode};
use crate::metrics::BuiltinMetrics;
use crate::surface::{FontSpec, PageSize, Surface, TextMeasure, Unit};
use crate::{RectStyle, Result};

/// A single recorded draw call, in user units
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
        fill: Color,
        stroke: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Color,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        byte_len: usize,
    },
}

/// Surface that records draw calls
#[derive(Debug, Clone)]
pub struct Recorder {
    page_size: PageSize,
    metrics: BuiltinMetrics,
    ops: Vec<DrawOp>,
    fill_color: Color,
    stroke_color: Color,
    text_color: Color,
    line_width: f64,
    font: FontSpec,
}

impl Recorder {
    pub fn new(page_size: PageSize, unit: Unit) -> Self {
        Self {
            page_size,
            metrics: BuiltinMetrics::new(unit),
            ops: Vec::new(),
            fill_color: Color::black(),
            stroke_color: Color::black(),
            text_color: Color::black(),
            line_width: 0.2,
            font: FontSpec::default(),
        }
    }

    /// All recorded operations in draw order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded text strings in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any recorded text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Recorded text op whose text equals `text`
    pub fn find_text(&self, text: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text: t, .. } if t == text))
    }

    /// Recorded rectangles as (x, y, width, height)
    pub fn rects(&self) -> Vec<(f64, f64, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }

    /// Current stroke width in user units
    pub fn line_width(&self) -> f64 {
        self.line_width
    }
}

impl TextMeasure for Recorder {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        self.metrics.text_width(text, font)
    }
}

impl Surface for Recorder {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn as_measure(&self) -> &dyn TextMeasure {
        self
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn font(&self) -> FontSpec {
        self.font
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: RectStyle) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            style,
            fill: self.fill_color,
            stroke: self.stroke_color,
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: self.stroke_color,
        });
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: self.font,
            color: self.text_color,
        });
    }

    fn image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        let dims = get_dimensions(data)?;
        let (width, height) =
            calculate_scaled_dimensions(dims.width, dims.height, width, height, mode);
        self.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            byte_len: data.len(),
        });
        Ok(())
    }

    /// Debug listing of the recorded operations, one per line
    fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let listing: String = self.ops.iter().map(|op| format!("{op:?}\n")).collect();
        Ok(listing.into_bytes())
    }
}
