//! Bordered panels with a title band
//!
//! Panels are drawn in two passes. Content is measured first so the
//! background can be drawn at its final height, then the content is drawn
//! on top of it.

use super::geometry::{Cursor, Point, Rect};
use super::measure::Measurer;
use log::debug;
use pdf_canvas::{Color, FontSpec, RectStyle, Surface};

/// Offset of the content origin from the panel's top-left corner
pub const CONTENT_INSET_X: f64 = 3.0;
pub const CONTENT_TOP: f64 = 10.0;

/// Space below the last info row
const BOTTOM_PADDING: f64 = 2.0;
/// Baseline step between info rows
const INFO_LINE_STEP: f64 = 5.0;
/// Horizontal offset of info values from the label column
const INFO_VALUE_OFFSET: f64 = 22.0;
/// Space the label column takes out of the wrap width
const INFO_LABEL_ALLOWANCE: f64 = 30.0;

const INFO_LABEL_FONT: FontSpec = FontSpec::bold(9.0);
const INFO_VALUE_FONT: FontSpec = FontSpec::regular(9.0);

/// Colors and title band geometry of a panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub background: Color,
    pub border: Color,
    pub band: Color,
    pub band_height: f64,
    pub title_font: FontSpec,
    /// Title baseline below the panel top
    pub title_baseline: f64,
    pub line_width: f64,
}

impl PanelStyle {
    /// Info and equipment panels
    pub fn standard() -> Self {
        Self {
            background: Color::gray(250),
            border: Color::gray(200),
            band: Color::gray(150),
            band_height: 8.0,
            title_font: FontSpec::bold(10.0),
            title_baseline: 6.0,
            line_width: 0.2,
        }
    }

    /// Narrow band used by the policy panel
    pub fn compact() -> Self {
        Self {
            band_height: 6.0,
            title_font: FontSpec::bold(8.0),
            title_baseline: 4.5,
            ..Self::standard()
        }
    }
}

/// Smallest height any panel is drawn at: title band plus padding
pub fn min_height(style: &PanelStyle) -> f64 {
    style.band_height.max(CONTENT_TOP) + BOTTOM_PADDING
}

/// Draw a panel shell and then its content
///
/// Background and border are drawn at `rect`'s full height before `content`
/// runs. `content` receives the content origin below the title band.
pub fn render_panel<R>(
    surface: &mut dyn Surface,
    rect: Rect,
    title: &str,
    style: &PanelStyle,
    content: impl FnOnce(&mut dyn Surface, Point) -> R,
) -> R {
    surface.set_line_width(style.line_width);
    surface.set_fill_color(style.background);
    surface.rect(rect.x, rect.y, rect.width, rect.height, RectStyle::Fill);
    surface.set_stroke_color(style.border);
    surface.rect(rect.x, rect.y, rect.width, rect.height, RectStyle::Stroke);

    surface.set_fill_color(style.band);
    surface.rect(rect.x, rect.y, rect.width, style.band_height, RectStyle::Fill);
    surface.set_text_color(Color::white());
    surface.set_font(style.title_font);
    surface.text(title, rect.x + CONTENT_INSET_X, rect.y + style.title_baseline);
    surface.set_text_color(Color::black());

    content(
        surface,
        rect.origin().offset(CONTENT_INSET_X, CONTENT_TOP),
    )
}

/// A labelled value inside an info panel
#[derive(Debug, Clone, PartialEq)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

impl InfoRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Info panel content after measuring
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredInfo {
    pub title: String,
    pub rows: Vec<(String, Vec<String>)>,
    pub height: f64,
}

/// Measure an info panel of the given width
///
/// Values are wrapped to the width left after the label column. The height
/// covers the title band, every wrapped line and the bottom padding.
pub fn measure_info(
    measurer: &Measurer,
    title: &str,
    rows: &[InfoRow],
    width: f64,
) -> MeasuredInfo {
    let wrap_width = width - INFO_LABEL_ALLOWANCE;
    let rows: Vec<(String, Vec<String>)> = rows
        .iter()
        .map(|row| {
            let lines = measurer.wrap(&row.value, wrap_width, INFO_VALUE_FONT);
            (row.label.clone(), lines)
        })
        .collect();

    let line_count: usize = rows.iter().map(|(_, lines)| lines.len()).sum();
    let height = CONTENT_TOP + line_count as f64 * INFO_LINE_STEP + BOTTOM_PADDING;
    debug!("panel '{}': {} lines, height {:.1}", title, line_count, height);

    MeasuredInfo {
        title: title.to_string(),
        rows,
        height,
    }
}

/// Draw measured info rows from a content origin
fn render_info_rows(surface: &mut dyn Surface, origin: Point, rows: &[(String, Vec<String>)]) {
    let mut y = origin.y;
    for (label, lines) in rows {
        surface.set_font(INFO_LABEL_FONT);
        surface.text(label, origin.x, y);
        surface.set_font(INFO_VALUE_FONT);
        surface.text_lines(lines, origin.x + INFO_VALUE_OFFSET, y, INFO_LINE_STEP);
        y += lines.len() as f64 * INFO_LINE_STEP;
    }
}

/// Draw one measured info panel, never shorter than its content
pub fn render_info(surface: &mut dyn Surface, rect: Rect, info: &MeasuredInfo, style: &PanelStyle) {
    let rect = rect.with_height(rect.height.max(info.height));
    render_panel(surface, rect, &info.title, style, |s, origin| {
        render_info_rows(s, origin, &info.rows)
    });
}

/// Draw two info panels side by side at a shared height
///
/// Both panels take the larger of the two measured heights so their bottom
/// edges line up. Returns the shared height and the cursor at the bottom.
pub fn render_side_by_side(
    surface: &mut dyn Surface,
    top: Cursor,
    columns: (f64, f64),
    width: f64,
    left: &MeasuredInfo,
    right: &MeasuredInfo,
    style: &PanelStyle,
) -> (f64, Cursor) {
    let height = left.height.max(right.height);
    for (x, info) in [(columns.0, left), (columns.1, right)] {
        render_info(surface, Rect::new(x, top.y(), width, height), info, style);
    }
    (height, top.advance(height))
}
