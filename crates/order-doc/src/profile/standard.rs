//! A4 work order

use super::{DocumentAssembler, LayoutReport};
use crate::layout::{
    checklist_entries, fit_policies, measure_info, render_panel, render_side_by_side,
    ChecklistBlock, Cursor, InfoRow, Measurer, PanelStyle, Rect, TableLayout, TableRow,
};
use crate::model::OrderBundle;
use cl_format::{format_clp, TaxBreakdown};
use log::warn;
use pdf_canvas::{Align, Color, FontSpec, ImageScaleMode, RectStyle, Surface, TextMeasure};

const MARGIN: f64 = 15.0;

const HEADER_HEIGHT: f64 = 32.0;
const BADGE_TOP: f64 = 8.0;
const BADGE_HEIGHT: f64 = 7.0;
const BADGE_PADDING: f64 = 3.0;
const ORDER_NUMBER_BASELINE: f64 = 19.0;
const CREATED_AT_BASELINE: f64 = 23.0;
const QR_SIZE: f64 = 20.0;
const QR_TOP: f64 = 6.0;

const SIDE_PANELS_TOP: f64 = 45.0;
const SIDE_PANEL_GAP: f64 = 10.0;
const SECTION_GAP: f64 = 5.0;

/// Table header top below the equipment panel top
const TABLE_TOP: f64 = 12.0;

const TOTALS_WIDTH: f64 = 30.0;
const TOTALS_HEIGHT: f64 = 20.0;

const POLICY_PANEL_GAP: f64 = 10.0;
const POLICY_COLUMN_GAP: f64 = 12.0;
/// Room above the first policy line and below the last one
const POLICY_CHROME: f64 = 15.0;

const SIGNATURE_GAP: f64 = 10.0;
const SIGNATURE_WIDTH: f64 = 50.0;
const SIGNATURE_HEIGHT: f64 = 18.0;
const SIGNATURE_CAPTION: f64 = 6.0;
/// Space kept free below the policies for the signature block
const SIGNATURE_RESERVE: f64 = SIGNATURE_HEIGHT + SIGNATURE_CAPTION + SIGNATURE_GAP + MARGIN;

pub(super) fn compose(
    assembler: &DocumentAssembler,
    surface: &mut dyn Surface,
    report: &mut LayoutReport,
) -> Cursor {
    let page_width = surface.page_size().width;
    let content_width = page_width - 2.0 * MARGIN;

    render_header(assembler, surface, page_width);
    let cursor = render_side_panels(assembler, surface, content_width, report);
    let cursor = render_equipment(assembler, surface, content_width, cursor.advance(SECTION_GAP), report);
    let cursor = render_policies(assembler, surface, content_width, cursor, report);
    render_signature(surface, page_width, cursor.advance(SIGNATURE_GAP))
}

fn render_header(assembler: &DocumentAssembler, surface: &mut dyn Surface, page_width: f64) {
    let order = &assembler.bundle.order;

    surface.set_fill_color(Color::gray(200));
    surface.rect(0.0, 0.0, page_width, HEADER_HEIGHT, RectStyle::Fill);

    if let Some(logo) = &assembler.assets.logo {
        let cfg = &assembler.config.pdf_logo;
        let y = (HEADER_HEIGHT - cfg.height) / 2.0;
        if let Err(e) = surface.image(logo, MARGIN, y, cfg.width, cfg.height, cfg.scale_mode()) {
            warn!("logo skipped: {}", e);
        }
    }

    let label = "N° Orden:";
    let label_font = FontSpec::bold(8.0);
    let badge_width = surface.text_width(label, label_font) + 2.0 * BADGE_PADDING;
    let badge_x = (page_width - badge_width) / 2.0;
    surface.set_fill_color(Color::gray(80));
    surface.rect(badge_x, BADGE_TOP, badge_width, BADGE_HEIGHT, RectStyle::Fill);
    surface.set_text_color(Color::white());
    surface.set_font(label_font);
    surface.text(label, badge_x + BADGE_PADDING, BADGE_TOP + 5.0);

    let center = page_width / 2.0;
    surface.set_text_color(Color::black());
    surface.set_font(FontSpec::regular(8.0));
    surface.text_aligned(&order.order_number, center, ORDER_NUMBER_BASELINE, Align::Center);
    surface.set_font(FontSpec::regular(7.0));
    surface.text_aligned(
        &assembler.created_at_display(),
        center,
        CREATED_AT_BASELINE,
        Align::Center,
    );

    if let Some(qr) = &assembler.assets.qr {
        let x = page_width - MARGIN - QR_SIZE;
        if let Err(e) = surface.image(qr, x, QR_TOP, QR_SIZE, QR_SIZE, ImageScaleMode::Stretch) {
            warn!("QR code skipped: {}", e);
        }
    }
}

fn branch_rows(assembler: &DocumentAssembler) -> Vec<InfoRow> {
    let branch = assembler.bundle.branch.as_ref();
    let mut rows = vec![InfoRow::new(
        "Sucursal:",
        branch.and_then(|b| b.name()).unwrap_or("Sucursal"),
    )];
    if let Some(branch) = branch {
        if let Some(address) = branch.address() {
            rows.push(InfoRow::new("Dirección:", address));
        }
        if let Some(phone) = branch.phone() {
            rows.push(InfoRow::new("Teléfono:", phone));
        }
        if let Some(email) = branch.email() {
            rows.push(InfoRow::new("Correo:", email));
        }
    }
    rows
}

fn customer_rows(bundle: &OrderBundle) -> Vec<InfoRow> {
    let Some(customer) = &bundle.customer else {
        return Vec::new();
    };
    let mut rows = vec![
        InfoRow::new("Nombre:", customer.name.as_str()),
        InfoRow::new("Teléfono:", customer.phone_display()),
    ];
    if !customer.email.trim().is_empty() {
        rows.push(InfoRow::new("Correo:", customer.email.as_str()));
    }
    if let Some(address) = customer.address() {
        rows.push(InfoRow::new("Dirección:", address));
    }
    rows
}

fn render_side_panels(
    assembler: &DocumentAssembler,
    surface: &mut dyn Surface,
    content_width: f64,
    report: &mut LayoutReport,
) -> Cursor {
    let width = (content_width - SIDE_PANEL_GAP) / 2.0;
    let (branch, customer) = {
        let measurer = Measurer::new(surface.as_measure());
        (
            measure_info(&measurer, &assembler.config.company_name, &branch_rows(assembler), width),
            measure_info(&measurer, "CLIENTE", &customer_rows(assembler.bundle), width),
        )
    };
    report.record_panel("branch", branch.height);
    report.record_panel("customer", customer.height);

    let columns = (MARGIN, MARGIN + width + SIDE_PANEL_GAP);
    let (shared, bottom) = render_side_by_side(
        surface,
        Cursor::new(SIDE_PANELS_TOP),
        columns,
        width,
        &branch,
        &customer,
        &PanelStyle::standard(),
    );
    report.record_panel("side_panels", shared);
    bottom
}

fn render_equipment(
    assembler: &DocumentAssembler,
    surface: &mut dyn Surface,
    content_width: f64,
    top: Cursor,
    report: &mut LayoutReport,
) -> Cursor {
    let bundle = assembler.bundle;
    let order = &bundle.order;
    let table = TableLayout::new(MARGIN + 3.0);
    let text_x = MARGIN + 3.0;

    let mut rows = vec![TableRow::device(order, &bundle.notes)];
    rows.extend(
        bundle
            .effective_line_items()
            .iter()
            .map(|item| TableRow::service(item, &order.problem_description)),
    );
    if order.replacement_cost > 0.0 {
        rows.push(TableRow::replacement(order.replacement_cost));
    }
    let entries = checklist_entries(&assembler.assets.checklist_items, &order.checklist_data);

    // measure
    let (measured, checklist) = {
        let measurer = Measurer::new(surface.as_measure());
        let measured: Vec<_> = rows.iter().map(|r| table.measure_row(&measurer, r)).collect();
        let checklist = ChecklistBlock::measure(&measurer, &entries, content_width - 6.0);
        (measured, checklist)
    };
    let rows_end = top
        .advance(TABLE_TOP + table.header_advance())
        .advance(measured.iter().map(|r| r.advance()).sum());
    let content_end = rows_end.advance(checklist.as_ref().map_or(0.0, |c| c.height()));
    let totals_top = content_end.advance(SECTION_GAP);
    let panel_end = content_end
        .advance(10.0)
        .max(totals_top.advance(TOTALS_HEIGHT + SECTION_GAP));
    let height = panel_end.y() - top.y();
    report.record_panel("equipment", height);

    // render
    let total = bundle.total();
    let rect = Rect::new(MARGIN, top.y(), content_width, height);
    render_panel(surface, rect, "DATOS DEL EQUIPO", &PanelStyle::standard(), |s, _| {
        let mut cursor = table.render_header(s, top.advance(TABLE_TOP));
        for row in &measured {
            cursor = table.render_row(s, row, cursor);
        }
        if let Some(block) = &checklist {
            block.render(s, text_x, cursor);
        }

        let box_x = MARGIN + content_width - TOTALS_WIDTH - 3.0;
        render_totals(s, box_x, totals_top.y(), total);

        s.set_font(FontSpec::regular(6.0));
        s.set_text_color(Color::black());
        s.text(
            &format!("Garantía {} días", order.warranty_days),
            text_x,
            totals_top.y() + 6.0,
        );
    });
    panel_end
}

/// Compact subtotal / IVA / total box
fn render_totals(surface: &mut dyn Surface, x: f64, y: f64, total: f64) {
    let split = TaxBreakdown::from_gross(total);
    let right = x + TOTALS_WIDTH - 2.0;

    surface.set_line_width(0.2);
    surface.set_fill_color(Color::gray(240));
    surface.set_stroke_color(Color::gray(150));
    surface.rect(x, y, TOTALS_WIDTH, TOTALS_HEIGHT, RectStyle::FillStroke);

    surface.set_text_color(Color::black());
    surface.set_font(FontSpec::regular(5.0));
    surface.text("Subtotal:", x + 2.0, y + 4.0);
    surface.text_aligned(&format_clp(split.subtotal, false), right, y + 4.0, Align::Right);
    surface.text("IVA (19%):", x + 2.0, y + 8.0);
    surface.text_aligned(&format_clp(split.tax, false), right, y + 8.0, Align::Right);

    surface.line(x, y + 12.0, x + TOTALS_WIDTH, y + 12.0);
    surface.set_font(FontSpec::bold(7.0));
    surface.text("TOTAL:", x + 2.0, y + 16.0);

    let total_font = FontSpec::bold(6.0);
    let total_text = format_clp(split.total, false);
    surface.set_font(total_font);
    let total_x = (right - surface.text_width(&total_text, total_font)).max(x + 2.0);
    surface.text(&total_text, total_x, y + 19.0);
}

/// Column budget for the policy block starting at `top`
fn policy_budget(page_height: f64, top: f64) -> f64 {
    page_height - top - SIGNATURE_RESERVE - POLICY_CHROME - POLICY_CHROME
}

fn render_policies(
    assembler: &DocumentAssembler,
    surface: &mut dyn Surface,
    content_width: f64,
    after: Cursor,
    report: &mut LayoutReport,
) -> Cursor {
    let top = after.advance(POLICY_PANEL_GAP);
    let column_width = (content_width - POLICY_COLUMN_GAP) / 2.0;
    let policies = assembler
        .config
        .policy_texts(assembler.bundle.order.warranty_days);
    let budget = policy_budget(surface.page_size().height, top.y());

    let columns = {
        let measurer = Measurer::new(surface.as_measure());
        fit_policies(&measurer, &policies, column_width - 3.0, budget)
    };
    let height = columns.height() + POLICY_CHROME;
    report.record_panel("policies", height);
    report.policy_font_size = Some(columns.font_size);
    report.policy_overflow = columns.overflow;

    let rect = Rect::new(MARGIN, top.y(), content_width, height);
    let right_x = MARGIN + column_width + 9.0;
    render_panel(surface, rect, "POLÍTICAS DE GARANTÍA", &PanelStyle::compact(), |s, origin| {
        columns.render(s, origin.x, right_x, Cursor::new(origin.y));
    });
    top.advance(height)
}

fn render_signature(surface: &mut dyn Surface, page_width: f64, top: Cursor) -> Cursor {
    let x = (page_width - SIGNATURE_WIDTH) / 2.0;
    surface.set_line_width(0.5);
    surface.set_fill_color(Color::gray(230));
    surface.set_stroke_color(Color::gray(150));
    surface.rect(x, top.y(), SIGNATURE_WIDTH, SIGNATURE_HEIGHT, RectStyle::FillStroke);

    let caption = top.advance(SIGNATURE_HEIGHT + SIGNATURE_CAPTION);
    surface.set_font(FontSpec::bold(7.0));
    surface.set_text_color(Color::black());
    surface.text_aligned("FIRMA DEL CLIENTE", page_width / 2.0, caption.y(), Align::Center);
    caption
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_budget_leaves_signature_room() {
        let budget = policy_budget(297.0, 200.0);
        // panel chrome plus signature reserve still fit on the page
        assert!(200.0 + budget + POLICY_CHROME + SIGNATURE_RESERVE <= 297.0);
    }

    #[test]
    fn test_signature_reserve() {
        assert_eq!(SIGNATURE_RESERVE, 49.0);
    }
}
