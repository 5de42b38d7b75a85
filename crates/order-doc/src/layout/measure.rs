//! Text measurement on top of a surface's metrics

use log::warn;
use pdf_canvas::{FontSpec, TextMeasure};

/// Wrapping and width measurement bound to one set of font metrics
///
/// Measuring and drawing must go through the same metrics, so layouts
/// build a `Measurer` from the surface they will draw on.
#[derive(Clone, Copy)]
pub struct Measurer<'a> {
    metrics: &'a dyn TextMeasure,
}

impl<'a> Measurer<'a> {
    pub fn new(metrics: &'a dyn TextMeasure) -> Self {
        Self { metrics }
    }

    /// Width of one line of text
    pub fn width(&self, text: &str, font: FontSpec) -> f64 {
        self.metrics.text_width(text, font)
    }

    /// Wrap text to `max_width`
    ///
    /// Never returns an empty list for non-empty text: if the metrics yield
    /// no lines, the text is kept as a single line.
    pub fn wrap(&self, text: &str, max_width: f64, font: FontSpec) -> Vec<String> {
        let lines = self.metrics.wrap_text(text, max_width, font);
        if lines.is_empty() {
            if text.trim().is_empty() {
                return vec![String::new()];
            }
            warn!(
                "wrapping produced no lines for {} chars at width {:.1}",
                text.chars().count(),
                max_width
            );
            return vec![text.to_string()];
        }
        lines
    }

    /// Number of lines `text` wraps to
    pub fn line_count(&self, text: &str, max_width: f64, font: FontSpec) -> usize {
        self.wrap(text, max_width, font).len()
    }
}
