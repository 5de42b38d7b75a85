//! Equipment table: device row, line items and checklist

use super::geometry::Cursor;
use super::measure::Measurer;
use crate::model::{ChecklistItemDef, ChecklistStatus, LineItem, OrderDocument};
use cl_format::format_clp;
use pdf_canvas::{Align, Color, FontSpec, RectStyle, Surface};
use std::collections::{BTreeMap, HashSet};

/// Index, name, note and amount column widths
pub const COLUMN_WIDTHS: [f64; 4] = [10.0, 32.0, 95.0, 37.0];
/// Baseline step inside a cell
pub const LINE_HEIGHT: f64 = 4.0;
/// Space between a row's last line and the next row
pub const ROW_GAP: f64 = 3.0;
/// Padding between a column edge and its text
pub const CELL_PADDING: f64 = 2.0;

const HEADER_HEIGHT: f64 = 7.0;
const HEADER_BASELINE: f64 = 5.0;
/// First body baseline below the header top
const BODY_OFFSET: f64 = 10.0;

const HEADER_FONT: FontSpec = FontSpec::bold(8.0);
const BODY_FONT: FontSpec = FontSpec::regular(8.0);
const CAPTION_FONT: FontSpec = FontSpec::regular(5.0);
const CAPTION_OFFSET: f64 = 3.0;

const CHECKLIST_TITLE: &str = "Checklist de Diagnóstico Inicial";
const CHECKLIST_TITLE_FONT: FontSpec = FontSpec::bold(6.0);
const CHECKLIST_FONT: FontSpec = FontSpec::regular(5.0);
const CHECKLIST_GAP: f64 = 5.0;
const CHECKLIST_TITLE_STEP: f64 = 4.0;
const CHECKLIST_LINE_STEP: f64 = 3.0;

const DEFAULT_SERVICE_NOTE: &str = "Servicio de reparación";
const REPLACEMENT_NAME: &str = "REPUESTO";
const REPLACEMENT_NOTE: &str = "Repuesto original";

/// Content of the amount column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountCell {
    /// A dash; the device row never carries a price
    Placeholder,
    /// Stored line total with a `quantity x unit price` caption
    Priced {
        total: f64,
        quantity: u32,
        unit_price: f64,
    },
}

/// One table row before wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub marker: String,
    pub name: String,
    pub note: String,
    pub amount: AmountCell,
}

impl TableRow {
    /// Row 0: model with serial and unlock lines, problem plus notes
    pub fn device(order: &OrderDocument, notes: &[String]) -> Self {
        let mut name = order.device_model.clone();
        if let Some(serial) = order.serial() {
            name.push_str(&format!("\nIMEI: {serial}"));
        }
        if let Some(credential) = order.unlock_credential() {
            name.push_str(&format!("\nPASSCODE: {credential}"));
        }

        let mut note_lines: Vec<&str> = Vec::new();
        let problem = order.problem_description.trim();
        if !problem.is_empty() {
            note_lines.push(problem);
        }
        note_lines.extend(notes.iter().map(|n| n.trim()).filter(|n| !n.is_empty()));
        let note = if note_lines.is_empty() {
            "-".to_string()
        } else {
            note_lines.join("\n")
        };

        Self {
            marker: "1".to_string(),
            name,
            note,
            amount: AmountCell::Placeholder,
        }
    }

    /// A service or part line
    ///
    /// The note is the service description, else the full problem
    /// description, else a generic caption.
    pub fn service(item: &LineItem, problem_description: &str) -> Self {
        let note = item
            .description()
            .map(str::to_string)
            .or_else(|| {
                let problem = problem_description.trim();
                (!problem.is_empty()).then(|| problem.to_string())
            })
            .unwrap_or_else(|| DEFAULT_SERVICE_NOTE.to_string());

        Self {
            marker: "-".to_string(),
            name: item.name.to_uppercase(),
            note,
            amount: AmountCell::Priced {
                total: item.line_total(),
                quantity: item.quantity(),
                unit_price: item.unit_price,
            },
        }
    }

    /// Replacement part row
    pub fn replacement(cost: f64) -> Self {
        Self {
            marker: "-".to_string(),
            name: REPLACEMENT_NAME.to_string(),
            note: REPLACEMENT_NOTE.to_string(),
            amount: AmountCell::Priced {
                total: cost,
                quantity: 1,
                unit_price: cost,
            },
        }
    }
}

/// A row after wrapping, with its height fixed
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub marker: String,
    pub name_lines: Vec<String>,
    pub note_lines: Vec<String>,
    pub amount: AmountCell,
    /// Taller of the two wrapped columns, at least one line
    pub height: f64,
}

impl MeasuredRow {
    /// Vertical space the row takes including the gap after it
    pub fn advance(&self) -> f64 {
        self.height + ROW_GAP
    }
}

/// Column geometry of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    x: f64,
    widths: [f64; 4],
}

impl TableLayout {
    pub fn new(x: f64) -> Self {
        Self::with_widths(x, COLUMN_WIDTHS)
    }

    pub fn with_widths(x: f64, widths: [f64; 4]) -> Self {
        Self { x, widths }
    }

    pub fn total_width(&self) -> f64 {
        self.widths.iter().sum()
    }

    /// Left edge of a column
    pub fn column_x(&self, column: usize) -> f64 {
        self.x + self.widths[..column].iter().sum::<f64>()
    }

    /// Right edge of a column
    pub fn column_right(&self, column: usize) -> f64 {
        self.column_x(column) + self.widths[column]
    }

    fn wrap_width(&self, column: usize) -> f64 {
        self.widths[column] - 2.0 * CELL_PADDING
    }

    /// Wrap both text columns and fix the row height
    pub fn measure_row(&self, measurer: &Measurer, row: &TableRow) -> MeasuredRow {
        let name_lines = measurer.wrap(&row.name, self.wrap_width(1), BODY_FONT);
        let note_lines = measurer.wrap(&row.note, self.wrap_width(2), BODY_FONT);
        let lines = name_lines.len().max(note_lines.len()).max(1);
        MeasuredRow {
            marker: row.marker.clone(),
            name_lines,
            note_lines,
            amount: row.amount,
            height: lines as f64 * LINE_HEIGHT,
        }
    }

    /// Vertical space of the header up to the first body baseline
    pub fn header_advance(&self) -> f64 {
        BODY_OFFSET
    }

    /// Draw the shaded header; returns the first body baseline
    pub fn render_header(&self, surface: &mut dyn Surface, top: Cursor) -> Cursor {
        surface.set_fill_color(Color::gray(230));
        surface.rect(
            self.x,
            top.y(),
            self.total_width(),
            HEADER_HEIGHT,
            RectStyle::Fill,
        );
        surface.set_font(HEADER_FONT);
        surface.set_text_color(Color::black());
        let baseline = top.y() + HEADER_BASELINE;
        surface.text("#", self.column_x(0) + CELL_PADDING, baseline);
        surface.text("Modelo", self.column_x(1) + CELL_PADDING, baseline);
        surface.text("Nota [Descripción]", self.column_x(2) + CELL_PADDING, baseline);
        surface.text_aligned("Total", self.column_right(3) - CELL_PADDING, baseline, Align::Right);
        top.advance(BODY_OFFSET)
    }

    /// Draw a measured row at the cursor baseline
    pub fn render_row(&self, surface: &mut dyn Surface, row: &MeasuredRow, at: Cursor) -> Cursor {
        let y = at.y();
        surface.set_font(BODY_FONT);
        surface.set_text_color(Color::black());
        surface.text(&row.marker, self.column_x(0) + CELL_PADDING, y);
        surface.text_lines(&row.name_lines, self.column_x(1) + CELL_PADDING, y, LINE_HEIGHT);
        surface.text_lines(&row.note_lines, self.column_x(2) + CELL_PADDING, y, LINE_HEIGHT);

        let right = self.column_right(3) - CELL_PADDING;
        match row.amount {
            AmountCell::Placeholder => surface.text_aligned("-", right, y, Align::Right),
            AmountCell::Priced {
                total,
                quantity,
                unit_price,
            } => {
                surface.text_aligned(&format_clp(total, false), right, y, Align::Right);
                surface.set_font(CAPTION_FONT);
                surface.set_text_color(Color::gray(100));
                let caption = format!("{} x {}", quantity, format_clp(unit_price, false));
                surface.text_aligned(&caption, right, y + CAPTION_OFFSET, Align::Right);
                surface.set_font(BODY_FONT);
                surface.set_text_color(Color::black());
            }
        }
        at.advance(row.advance())
    }
}

/// Statused checklist entries as printed, in display order
///
/// Entries follow the item definitions. Statused entries without a
/// definition come after them in name order. Entries without a status are
/// left out.
pub fn checklist_entries(
    definitions: &[ChecklistItemDef],
    data: &BTreeMap<String, Option<ChecklistStatus>>,
) -> Vec<String> {
    let mut ordered: Vec<&ChecklistItemDef> = definitions.iter().collect();
    ordered.sort_by_key(|def| def.item_order);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();
    for def in ordered {
        if !seen.insert(def.item_name.as_str()) {
            continue;
        }
        if let Some(Some(status)) = data.get(&def.item_name) {
            entries.push(status.entry(&def.item_name));
        }
    }
    for (name, status) in data {
        if let Some(status) = status {
            if !seen.contains(name.as_str()) {
                entries.push(status.entry(name));
            }
        }
    }
    entries
}

/// Checklist text block after wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistBlock {
    pub lines: Vec<String>,
}

impl ChecklistBlock {
    /// Join and wrap entries; `None` when there is nothing to print
    pub fn measure(measurer: &Measurer, entries: &[String], width: f64) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        let lines = measurer.wrap(&entries.join(", "), width, CHECKLIST_FONT);
        Some(Self { lines })
    }

    /// Vertical space from the cursor before the block to the one after it
    pub fn height(&self) -> f64 {
        CHECKLIST_GAP + CHECKLIST_TITLE_STEP + self.lines.len() as f64 * CHECKLIST_LINE_STEP
    }

    pub fn render(&self, surface: &mut dyn Surface, x: f64, at: Cursor) -> Cursor {
        let title_y = at.advance(CHECKLIST_GAP);
        surface.set_text_color(Color::black());
        surface.set_font(CHECKLIST_TITLE_FONT);
        surface.text(CHECKLIST_TITLE, x, title_y.y());

        let body = title_y.advance(CHECKLIST_TITLE_STEP);
        surface.set_font(CHECKLIST_FONT);
        surface.text_lines(&self.lines, x, body.y(), CHECKLIST_LINE_STEP);
        at.advance(self.height())
    }
}
