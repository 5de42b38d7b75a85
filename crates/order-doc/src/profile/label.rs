//! Small order label without pricing
//!
//! The page is as tall as its content, so the whole label is laid out
//! before anything is drawn. Units are points.

use super::DocumentAssembler;
use crate::layout::{Cursor, Measurer};
use pdf_canvas::{Align, Color, FontSpec, Surface, TextMeasure};

const MARGIN: f64 = 15.0;
const TITLE: &str = "ETIQUETA DE ORDEN";
const TITLE_FONT: FontSpec = FontSpec::bold(12.0);
const NUMBER_FONT: FontSpec = FontSpec::bold(10.0);
const LABEL_FONT: FontSpec = FontSpec::bold(8.0);
const VALUE_FONT: FontSpec = FontSpec::regular(8.0);
const LINE_STEP: f64 = 6.0;
const FIELD_GAP: f64 = 5.0;
const SHORT_FIELD_STEP: f64 = 8.0;

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
struct Placed {
    text: String,
    x: f64,
    y: f64,
    font: FontSpec,
    align: Align,
}

/// Label content with every line positioned
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LabelLayout {
    lines: Vec<Placed>,
    end: Cursor,
}

impl LabelLayout {
    pub(super) fn page_height(&self) -> f64 {
        self.end.y() + MARGIN
    }
}

struct Builder<'m> {
    measurer: Measurer<'m>,
    content_width: f64,
    lines: Vec<Placed>,
    cursor: Cursor,
}

impl Builder<'_> {
    fn place(&mut self, text: &str, x: f64, font: FontSpec, align: Align) {
        self.lines.push(Placed {
            text: text.to_string(),
            x,
            y: self.cursor.y(),
            font,
            align,
        });
    }

    /// Bold label with a value wrapped beside it
    fn field(&mut self, label: &str, value: &str, offset: f64, step_after: Option<f64>) {
        self.place(label, MARGIN, LABEL_FONT, Align::Left);
        let lines = self
            .measurer
            .wrap(value, self.content_width - offset, VALUE_FONT);
        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            self.lines.push(Placed {
                text: line.clone(),
                x: MARGIN + offset,
                y: self.cursor.y() + i as f64 * LINE_STEP,
                font: VALUE_FONT,
                align: Align::Left,
            });
        }
        let wrapped = count as f64 * LINE_STEP;
        let advance = step_after.map_or(wrapped + FIELD_GAP, |step| step.max(wrapped));
        self.cursor = self.cursor.advance(advance);
    }
}

/// Lay out the label for a page of the given width
pub(super) fn measure(
    assembler: &DocumentAssembler,
    metrics: &dyn TextMeasure,
    page_width: f64,
) -> LabelLayout {
    let bundle = assembler.bundle;
    let order = &bundle.order;
    let mut b = Builder {
        measurer: Measurer::new(metrics),
        content_width: page_width - 2.0 * MARGIN,
        lines: Vec::new(),
        cursor: Cursor::new(MARGIN),
    };

    b.place(TITLE, page_width / 2.0, TITLE_FONT, Align::Center);
    b.cursor = b.cursor.advance(15.0);
    b.place(
        &format!("Orden: {}", order.order_number),
        MARGIN,
        NUMBER_FONT,
        Align::Left,
    );
    b.cursor = b.cursor.advance(12.0);

    if let Some(customer) = &bundle.customer {
        b.field("Cliente:", &customer.name, 50.0, None);
    }
    b.field("Dispositivo:", &order.device_model, 60.0, None);
    b.field("Problema:", &order.problem_description, 60.0, None);
    if let Some(credential) = order.unlock_credential() {
        b.field("Passcode:", &credential, 60.0, Some(SHORT_FIELD_STEP));
    }
    if let Some(name) = bundle.branch.as_ref().and_then(|br| br.name()) {
        b.field("Local:", name, 50.0, Some(SHORT_FIELD_STEP));
    }
    if let Some(date) = assembler.commitment_display() {
        b.field("Fecha Compromiso:", &date, 90.0, Some(SHORT_FIELD_STEP));
    }

    LabelLayout {
        lines: b.lines,
        end: b.cursor,
    }
}

pub(super) fn compose(assembler: &DocumentAssembler, surface: &mut dyn Surface) -> Cursor {
    let layout = measure(assembler, surface.as_measure(), surface.page_size().width);
    surface.set_text_color(Color::black());
    for line in &layout.lines {
        surface.set_font(line.font);
        surface.text_aligned(&line.text, line.x, line.y, line.align);
    }
    layout.end
}
