//! 80 mm receipt tape
//!
//! Sections run top to bottom in a single column. Units are points.

use super::{DocumentAssembler, LayoutReport};
use crate::layout::{with_bullet, Cursor, Measurer};
use cl_format::{format_clp, TaxBreakdown};
use log::warn;
use pdf_canvas::{Align, Color, FontSpec, ImageScaleMode, RectStyle, Surface};

const MARGIN: f64 = 15.0;
const LOGO_SCALE: f64 = 2.0;

const HEADING_FONT: FontSpec = FontSpec::bold(9.0);
const BODY_FONT: FontSpec = FontSpec::regular(8.0);
const HEADING_STEP: f64 = 8.0;
const LINE_STEP: f64 = 6.0;

const BADGE_WIDTH: f64 = 50.0;
const BADGE_HEIGHT: f64 = 7.0;
const QR_SIZE: f64 = 60.0;
const SIGNATURE_HEIGHT: f64 = 40.0;
const POLICY_FONT: FontSpec = FontSpec::regular(7.0);
const POLICY_LINE_STEP: f64 = 5.5;
const POLICY_GAP: f64 = 2.0;

/// Single-column text writer over a surface
struct Column<'s> {
    surface: &'s mut dyn Surface,
    x: f64,
    width: f64,
    page_width: f64,
    cursor: Cursor,
}

impl Column<'_> {
    fn skip(&mut self, dy: f64) {
        self.cursor = self.cursor.advance(dy);
    }

    fn heading(&mut self, text: &str) {
        self.surface.set_font(HEADING_FONT);
        self.surface.text(text, self.x, self.cursor.y());
        self.skip(HEADING_STEP);
    }

    /// Wrapped paragraph at the column width
    fn paragraph(&mut self, text: &str, font: FontSpec, step: f64) {
        let lines = Measurer::new(self.surface.as_measure()).wrap(text, self.width, font);
        self.surface.set_font(font);
        self.surface.text_lines(&lines, self.x, self.cursor.y(), step);
        self.skip(lines.len() as f64 * step);
    }

    fn line(&mut self, text: &str) {
        self.paragraph(text, BODY_FONT, LINE_STEP);
    }

    fn centered(&mut self, text: &str, font: FontSpec, step: f64) {
        self.surface.set_font(font);
        self.surface
            .text_aligned(text, self.page_width / 2.0, self.cursor.y(), Align::Center);
        self.skip(step);
    }
}

pub(super) fn compose(
    assembler: &DocumentAssembler,
    surface: &mut dyn Surface,
    report: &mut LayoutReport,
) -> Cursor {
    let bundle = assembler.bundle;
    let order = &bundle.order;
    let page_width = surface.page_size().width;
    let mut col = Column {
        surface,
        x: MARGIN,
        width: page_width - 2.0 * MARGIN,
        page_width,
        cursor: Cursor::new(MARGIN),
    };
    col.surface.set_text_color(Color::black());

    if let Some(logo) = &assembler.assets.logo {
        let cfg = &assembler.config.pdf_logo;
        let (w, h) = (cfg.width * LOGO_SCALE, cfg.height * LOGO_SCALE);
        let x = (page_width - w) / 2.0;
        match col.surface.image(logo, x, col.cursor.y(), w, h, cfg.scale_mode()) {
            Ok(()) => col.skip(h + 15.0),
            Err(e) => warn!("logo skipped: {}", e),
        }
    }

    col.surface.set_stroke_color(Color::gray(200));
    col.surface.set_line_width(0.5);
    col.surface
        .line(MARGIN, col.cursor.y(), page_width - MARGIN, col.cursor.y());
    col.skip(10.0);

    col.heading("DATOS DEL LOCAL");
    let branch = bundle.branch.as_ref();
    let branch_name = branch
        .and_then(|b| b.legal_name())
        .unwrap_or(assembler.config.company_name.as_str());
    col.line(&format!("Nombre: {branch_name}"));
    col.line(&format!("Fecha de Emisión: {}", assembler.created_at_display()));
    if let Some(branch) = branch {
        if let Some(phone) = branch.phone() {
            col.line(&format!("Teléfono: {phone}"));
        }
        if let Some(address) = branch.address() {
            col.line(&format!("Dirección: {address}"));
        }
        if let Some(email) = branch.email() {
            col.line(&format!("Email: {email}"));
        }
    }
    col.skip(10.0);

    col.heading("DATOS DEL CLIENTE");
    if let Some(customer) = &bundle.customer {
        col.line(&format!("Nombre: {}", customer.name));
        col.line(&format!("Teléfono: {}", customer.phone_with_default_code()));
        if !customer.email.trim().is_empty() {
            col.line(&format!("Email: {}", customer.email));
        }
    }
    col.skip(8.0);

    if let Some(date) = assembler.commitment_display() {
        col.paragraph(
            &format!("Fecha de Compromiso: {date}"),
            FontSpec::bold(8.0),
            HEADING_STEP,
        );
    }

    col.skip(5.0);
    let badge_top = col.cursor;
    let badge_x = (page_width - BADGE_WIDTH) / 2.0;
    col.surface.set_fill_color(Color::gray(80));
    col.surface
        .rect(badge_x, badge_top.y(), BADGE_WIDTH, BADGE_HEIGHT, RectStyle::Fill);
    col.surface.set_text_color(Color::white());
    col.cursor = badge_top.advance(5.0);
    col.centered("N° Orden:", FontSpec::bold(8.0), 0.0);
    col.surface.set_text_color(Color::black());
    col.cursor = badge_top.advance(BADGE_HEIGHT + 10.0);
    col.centered(&order.order_number, FontSpec::bold(10.0), 8.0);
    col.skip(10.0);

    col.heading("DATOS DEL EQUIPO");
    col.line(&format!("Modelo: {}", order.device_model));
    if let Some(serial) = order.serial() {
        col.line(&format!("IMEI: {serial}"));
    }
    if let Some(credential) = order.unlock_credential() {
        col.line(&format!("Passcode: {credential}"));
    }
    col.skip(8.0);

    let mut services: Vec<String> = bundle
        .effective_line_items()
        .iter()
        .map(|item| with_bullet(&item.name))
        .collect();
    if order.replacement_cost > 0.0 {
        services.push(with_bullet("Repuesto original"));
    }
    if !services.is_empty() {
        col.heading("SERVICIOS");
        for service in &services {
            col.line(service);
        }
        col.skip(8.0);
    }

    col.skip(5.0);
    let split = TaxBreakdown::from_gross(bundle.total());
    col.centered("VALOR PRESUPUESTADO", HEADING_FONT, 10.0);
    col.centered(
        &format!("Subtotal: {}", format_clp(split.subtotal, false)),
        BODY_FONT,
        7.0,
    );
    col.centered(
        &format!("IVA (19%): {}", format_clp(split.tax, false)),
        BODY_FONT,
        7.0,
    );
    col.surface.set_stroke_color(Color::gray(150));
    col.surface
        .line(MARGIN, col.cursor.y(), page_width - MARGIN, col.cursor.y());
    col.skip(12.0);
    col.centered(
        &format!("TOTAL: {}", format_clp(split.total, true)),
        FontSpec::bold(12.0),
        15.0,
    );

    if let Some(qr) = &assembler.assets.qr {
        let x = (page_width - QR_SIZE) / 2.0;
        match col
            .surface
            .image(qr, x, col.cursor.y(), QR_SIZE, QR_SIZE, ImageScaleMode::Stretch)
        {
            Ok(()) => col.skip(QR_SIZE + 15.0),
            Err(e) => warn!("QR code skipped: {}", e),
        }
    }

    col.surface.set_fill_color(Color::gray(230));
    col.surface.set_stroke_color(Color::gray(150));
    col.surface.rect(
        MARGIN,
        col.cursor.y(),
        col.width,
        SIGNATURE_HEIGHT,
        RectStyle::FillStroke,
    );
    col.skip(SIGNATURE_HEIGHT + 6.0);
    col.centered("FIRMA DEL CLIENTE", FontSpec::bold(8.0), 12.0);

    col.surface.set_font(HEADING_FONT);
    col.surface.text("GARANTÍAS", MARGIN, col.cursor.y());
    col.skip(10.0);
    for policy in assembler.config.policy_texts(order.warranty_days) {
        col.paragraph(&with_bullet(&policy), POLICY_FONT, POLICY_LINE_STEP);
        col.skip(POLICY_GAP);
    }

    report.policy_font_size = Some(POLICY_FONT.size);
    col.cursor
}
