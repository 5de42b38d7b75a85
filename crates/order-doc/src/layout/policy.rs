//! Two-column warranty policy block with adaptive font size

use super::geometry::Cursor;
use super::measure::Measurer;
use log::{debug, warn};
use pdf_canvas::{Color, FontSpec, Surface};

/// Font sizes tried from largest to smallest
pub const FONT_CANDIDATES: [f64; 5] = [5.0, 4.5, 4.0, 3.5, 3.0];

const BULLET: char = '•';

/// Baseline step for a font size, in millimetres
pub fn line_spacing(font_size: f64) -> f64 {
    font_size * 0.5
}

/// Prefix a policy with a bullet unless it already has one
pub fn with_bullet(text: &str) -> String {
    if text.trim_start().starts_with(BULLET) {
        text.trim_start().to_string()
    } else {
        format!("{BULLET} {text}")
    }
}

/// Policies split into two wrapped columns at one font size
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyColumns {
    pub font_size: f64,
    /// Policies at even positions, each as wrapped lines
    pub left: Vec<Vec<String>>,
    /// Policies at odd positions
    pub right: Vec<Vec<String>>,
    pub left_height: f64,
    pub right_height: f64,
    /// Even the smallest size did not fit the budget
    pub overflow: bool,
}

impl PolicyColumns {
    /// Height of the taller column
    pub fn height(&self) -> f64 {
        self.left_height.max(self.right_height)
    }

    /// Wrap and distribute policies at a fixed font size
    pub fn layout(measurer: &Measurer, policies: &[String], wrap_width: f64, font_size: f64) -> Self {
        let font = FontSpec::regular(font_size);
        let spacing = line_spacing(font_size);
        let mut columns = Self {
            font_size,
            left: Vec::new(),
            right: Vec::new(),
            left_height: 0.0,
            right_height: 0.0,
            overflow: false,
        };

        for (index, policy) in policies.iter().enumerate() {
            let lines = measurer.wrap(&with_bullet(policy), wrap_width, font);
            let height = lines.len() as f64 * spacing;
            if index % 2 == 0 {
                columns.left_height += height;
                columns.left.push(lines);
            } else {
                columns.right_height += height;
                columns.right.push(lines);
            }
        }
        columns
    }

    /// Draw both columns with their first baseline at `top`
    ///
    /// Returns the cursor below the taller column.
    pub fn render(&self, surface: &mut dyn Surface, left_x: f64, right_x: f64, top: Cursor) -> Cursor {
        let spacing = line_spacing(self.font_size);
        surface.set_text_color(Color::black());
        surface.set_font(FontSpec::regular(self.font_size));
        for (x, column) in [(left_x, &self.left), (right_x, &self.right)] {
            let mut y = top.y();
            for lines in column {
                surface.text_lines(lines, x, y, spacing);
                y += lines.len() as f64 * spacing;
            }
        }
        top.advance(self.height())
    }
}

/// Pick the largest candidate size whose taller column fits `budget`
///
/// When nothing fits, the smallest size is used and the result is marked as
/// overflowing. Policy text is never dropped.
pub fn fit_policies(
    measurer: &Measurer,
    policies: &[String],
    wrap_width: f64,
    budget: f64,
) -> PolicyColumns {
    for size in FONT_CANDIDATES {
        let columns = PolicyColumns::layout(measurer, policies, wrap_width, size);
        if columns.height() <= budget {
            debug!(
                "policies fit at {}pt: height {:.2} of {:.2}",
                size,
                columns.height(),
                budget
            );
            return columns;
        }
    }

    let smallest = FONT_CANDIDATES[FONT_CANDIDATES.len() - 1];
    let mut columns = PolicyColumns::layout(measurer, policies, wrap_width, smallest);
    columns.overflow = true;
    warn!(
        "policies overflow at {}pt: height {:.2} exceeds {:.2}",
        smallest,
        columns.height(),
        budget
    );
    columns
}
