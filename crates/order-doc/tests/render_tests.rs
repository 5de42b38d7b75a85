//! Integration tests for order-doc
//!
//! Layout is checked against the recording surface; PDF output is parsed
//! back with lopdf.

use lopdf::{Document, Object};
use order_doc::layout::{Measurer, PolicyColumns};
use order_doc::{
    parse_bundle, render, Assets, ChecklistItemDef, DocumentAssembler, OrderBundle, Profile,
    RenderConfig, WarrantyPolicies,
};
use pdf_canvas::{BuiltinMetrics, DrawOp, FontSpec, PageSize, PdfDocument, Recorder, TextMeasure, Unit};
use pretty_assertions::assert_eq;

const ORDER_JSON: &str = r#"{
    "order": {
        "order_number": "ORD-2024-0042",
        "created_at": "2024-03-05T14:30:00-03:00",
        "device_type": "iphone",
        "device_model": "iPhone 13",
        "device_serial_number": "356789012345678",
        "device_unlock_code": "2580",
        "problem_description": "Pantalla rota, no responde al tacto en la parte inferior",
        "warranty_days": 90,
        "replacement_cost": 0,
        "total_repair_cost": 119,
        "commitment_date": "2024-03-12",
        "checklist_data": {"Screen": "ok", "Battery": null}
    },
    "customer": {
        "name": "Ana Pérez",
        "phone": "912345678",
        "phone_country_code": "+56",
        "email": "ana@example.cl",
        "address": "Los Leones 1200, depto 34, Providencia"
    },
    "branch": {
        "name": "Providencia",
        "razon_social": "iDocStore SpA",
        "phone": "+56 2 2345 6789"
    },
    "order_services": [
        {"service_name": "Cambio de pantalla", "quantity": 1, "unit_price": 119, "total_price": 119}
    ],
    "notes": ["Cliente solicita respaldo de fotos"]
}"#;

fn bundle() -> OrderBundle {
    parse_bundle(ORDER_JSON).unwrap()
}

fn checklist_assets() -> Assets {
    Assets::default().with_checklist_items(vec![
        ChecklistItemDef {
            device_type: "iphone".to_string(),
            item_name: "Screen".to_string(),
            item_order: 1,
        },
        ChecklistItemDef {
            device_type: "iphone".to_string(),
            item_name: "Battery".to_string(),
            item_order: 2,
        },
    ])
}

fn compose(profile: Profile, bundle: &OrderBundle, config: &RenderConfig, assets: &Assets) -> Recorder {
    let assembler = DocumentAssembler::new(bundle, config, assets);
    let (page, unit) = assembler.page_setup(profile);
    let mut rec = Recorder::new(page, unit);
    assembler.compose(profile, &mut rec);
    rec
}

fn hex(text: &str) -> String {
    let body: String = text.bytes().map(|b| format!("{b:02X}")).collect();
    format!("<{body}>")
}

fn page_content(doc: &Document) -> String {
    let (_, page_id) = doc.get_pages().into_iter().next().expect("one page");
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

fn media_box(doc: &Document) -> Vec<f64> {
    let (_, page_id) = doc.get_pages().into_iter().next().expect("one page");
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| match o {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            other => panic!("not a number: {other:?}"),
        })
        .collect()
}

#[test]
fn test_standard_pdf_parses() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let doc = render(Profile::Standard, &bundle, &config, &checklist_assets()).unwrap();
    assert_eq!(doc.profile, Profile::Standard);

    let pdf = Document::load_mem(&doc.bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);
    let mb = media_box(&pdf);
    assert!((mb[2] - 595.276).abs() < 0.01);
    assert!((mb[3] - 841.89).abs() < 0.01);

    let content = page_content(&pdf);
    assert!(content.contains(&hex("DATOS DEL EQUIPO")));
    assert!(content.contains(&hex("ORD-2024-0042")));
    assert!(content.contains(&hex("FIRMA DEL CLIENTE")));
}

#[test]
fn test_side_panels_share_height() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let assembler = DocumentAssembler::new(&bundle, &config, &assets);
    let mut rec = Recorder::new(PageSize::A4, Unit::Mm);
    let report = assembler.compose(Profile::Standard, &mut rec);

    let branch = report.panel_height("branch").unwrap();
    let customer = report.panel_height("customer").unwrap();
    assert!(branch != customer);
    assert_eq!(report.panel_height("side_panels"), Some(branch.max(customer)));

    let panel_backgrounds: Vec<(f64, f64)> = rec
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Rect { y, height, .. } if *y == 45.0 && *height > 8.0 => Some((*y, *height)),
            _ => None,
        })
        .collect();
    assert!(panel_backgrounds.len() >= 2);
    assert!(panel_backgrounds
        .iter()
        .all(|(_, h)| *h == branch.max(customer)));
}

#[test]
fn test_checklist_only_statused_entries() {
    let rec = compose(
        Profile::Standard,
        &bundle(),
        &RenderConfig::default(),
        &checklist_assets(),
    );
    assert!(rec.contains_text("Checklist de Diagnóstico Inicial"));
    assert!(rec.contains_text("Screen (ok)"));
    assert!(!rec.contains_text("Battery"));
}

#[test]
fn test_no_checklist_block_without_statuses() {
    let mut bundle = bundle();
    bundle.order.checklist_data.clear();
    let rec = compose(
        Profile::Standard,
        &bundle,
        &RenderConfig::default(),
        &checklist_assets(),
    );
    assert!(!rec.contains_text("Checklist de Diagnóstico Inicial"));
}

#[test]
fn test_totals_box_tax_split() {
    let rec = compose(
        Profile::Standard,
        &bundle(),
        &RenderConfig::default(),
        &Assets::default(),
    );
    let texts = rec.texts();
    let after = |label: &str| {
        let pos = texts.iter().position(|t| *t == label).unwrap();
        texts[pos + 1]
    };
    assert_eq!(after("Subtotal:"), "$100");
    assert_eq!(after("IVA (19%):"), "$19");
    assert_eq!(after("TOTAL:"), "$119");
    assert!(rec.contains_text("Garantía 90 días"));
}

#[test]
fn test_stored_total_printed_verbatim() {
    let mut bundle = bundle();
    bundle.order.total_repair_cost = Some(238.0);
    let rec = compose(
        Profile::Standard,
        &bundle,
        &RenderConfig::default(),
        &Assets::default(),
    );
    let texts = rec.texts();
    let pos = texts.iter().position(|t| *t == "TOTAL:").unwrap();
    assert_eq!(texts[pos + 1], "$238");
    // the line itself still shows its own stored amount
    assert!(rec.find_text("$119").is_some());
}

#[test]
fn test_missing_customer_renders_shell() {
    let mut bundle = bundle();
    bundle.customer = None;
    let rec = compose(
        Profile::Standard,
        &bundle,
        &RenderConfig::default(),
        &Assets::default(),
    );
    assert!(rec.contains_text("CLIENTE"));
    assert!(!rec.contains_text("Nombre:"));
    assert!(!rec.contains_text("Ana Pérez"));
}

#[test]
fn test_unreadable_logo_is_skipped() {
    let assets = Assets::default().with_logo(b"not an image".to_vec());
    let doc = render(Profile::Standard, &bundle(), &RenderConfig::default(), &assets).unwrap();
    let pdf = Document::load_mem(&doc.bytes).unwrap();
    assert!(!page_content(&pdf).contains(" Do"));
}

#[test]
fn test_compose_is_idempotent() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = checklist_assets();
    let assembler = DocumentAssembler::new(&bundle, &config, &assets);

    let mut first = Recorder::new(PageSize::A4, Unit::Mm);
    let mut second = Recorder::new(PageSize::A4, Unit::Mm);
    let report_a = assembler.compose(Profile::Standard, &mut first);
    let report_b = assembler.compose(Profile::Standard, &mut second);

    assert_eq!(report_a, report_b);
    assert_eq!(first.ops(), second.ops());
    assert_eq!(report_a.policy_font_size, Some(5.0));
    assert!(!report_a.policy_overflow);
}

const POLICY: &str = "Toda reparación cuenta con garantía sobre la mano de obra y los repuestos \
                      instalados, siempre que el equipo no presente golpes, humedad ni \
                      intervenciones de terceros posteriores a la entrega.";

fn policy_config(count: usize) -> RenderConfig {
    RenderConfig {
        warranty_policies: WarrantyPolicies {
            policies: vec![POLICY.to_string(); count],
        },
        ..Default::default()
    }
}

/// Column budget of the policy block for the fixture order
fn fixture_policy_budget() -> f64 {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let mut rec = Recorder::new(PageSize::A4, Unit::Mm);
    let report = DocumentAssembler::new(&bundle, &config, &assets).compose(Profile::Standard, &mut rec);
    let policy_top = 45.0
        + report.panel_height("side_panels").unwrap()
        + 5.0
        + report.panel_height("equipment").unwrap()
        + 10.0;
    // signature reserve plus the chrome above and below the columns
    297.0 - policy_top - 49.0 - 30.0
}

#[test]
fn test_policies_shrink_to_first_size_that_fits() {
    let budget = fixture_policy_budget();
    let metrics = BuiltinMetrics::new(Unit::Mm);
    let measurer = Measurer::new(&metrics);
    let wrap_width = (180.0 - 12.0) / 2.0 - 3.0;
    let height_at = |count: usize, size: f64| {
        let policies = vec![POLICY.to_string(); count];
        PolicyColumns::layout(&measurer, &policies, wrap_width, size).height()
    };
    let count = (1..200)
        .find(|&n| height_at(n, 4.5) > budget && height_at(n, 4.0) <= budget)
        .expect("a policy count that fits only at 4pt");

    let config = policy_config(count);
    let bundle = bundle();
    let assets = Assets::default();
    let mut rec = Recorder::new(PageSize::A4, Unit::Mm);
    let report = DocumentAssembler::new(&bundle, &config, &assets).compose(Profile::Standard, &mut rec);

    assert_eq!(report.policy_font_size, Some(4.0));
    assert!(!report.policy_overflow);
    let caption_y = match rec.find_text("FIRMA DEL CLIENTE") {
        Some(DrawOp::Text { y, .. }) => *y,
        other => panic!("no signature caption: {other:?}"),
    };
    assert_eq!(caption_y, report.cursor.y());
    assert!(caption_y <= 297.0 - 15.0);
    let drawn = rec.texts().iter().filter(|t| t.starts_with("• Toda")).count();
    assert_eq!(drawn, count);
}

#[test]
fn test_policy_overflow_keeps_every_policy() {
    let config = policy_config(120);
    let bundle = bundle();
    let assets = Assets::default();
    let mut rec = Recorder::new(PageSize::A4, Unit::Mm);
    let report = DocumentAssembler::new(&bundle, &config, &assets).compose(Profile::Standard, &mut rec);

    assert_eq!(report.policy_font_size, Some(3.0));
    assert!(report.policy_overflow);
    let drawn = rec.texts().iter().filter(|t| t.starts_with("• Toda")).count();
    assert_eq!(drawn, 120);
}

#[test]
fn test_unknown_checklist_status_prints_bare_name() {
    let json = ORDER_JSON.replace(
        r#""checklist_data": {"Screen": "ok", "Battery": null}"#,
        r#""checklist_data": {"Screen": "rota", "Battery": "ok"}"#,
    );
    let bundle = parse_bundle(&json).unwrap();
    let rec = compose(
        Profile::Standard,
        &bundle,
        &RenderConfig::default(),
        &checklist_assets(),
    );
    assert!(rec.contains_text("Screen, Battery (ok)"));
    assert!(!rec.contains_text("Screen ("));
}

#[test]
fn test_label_has_no_pricing() {
    let rec = compose(
        Profile::Label,
        &bundle(),
        &RenderConfig::default(),
        &checklist_assets(),
    );
    assert!(rec.contains_text("ETIQUETA DE ORDEN"));
    assert!(rec.contains_text("Orden: ORD-2024-0042"));
    assert!(rec.contains_text("Passcode:"));
    assert!(rec.contains_text("Providencia"));
    assert!(rec.contains_text("12/03/2024"));
    for text in rec.texts() {
        assert!(!text.contains('$'), "pricing leaked into label: {text}");
        assert!(!text.contains("TOTAL"));
        assert!(!text.contains("IVA"));
    }
    assert!(!rec.ops().iter().any(|op| matches!(op, DrawOp::Image { .. })));
}

#[test]
fn test_label_page_fits_content() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let doc = render(Profile::Label, &bundle, &config, &assets).unwrap();
    assert!(doc.report.cursor.y() < doc.report.page_size.height);

    let pdf = Document::load_mem(&doc.bytes).unwrap();
    let mb = media_box(&pdf);
    assert!((mb[2] - 226.77).abs() < 0.01);
    assert!((mb[3] - doc.report.page_size.height).abs() < 0.01);
    assert!(mb[3] < 400.0);
}

#[test]
fn test_wrapped_branch_name_pushes_next_field_down() {
    let mut bundle = bundle();
    let long_name = "Servicio Técnico Autorizado Providencia Norte, Edificio Costanera Center";
    bundle.branch.as_mut().unwrap().name = Some(long_name.to_string());
    let rec = compose(
        Profile::Label,
        &bundle,
        &RenderConfig::default(),
        &Assets::default(),
    );

    let texts: Vec<(&str, f64)> = rec
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
            _ => None,
        })
        .collect();
    let local = texts.iter().position(|(t, _)| *t == "Local:").unwrap();
    let commitment = texts
        .iter()
        .position(|(t, _)| *t == "Fecha Compromiso:")
        .unwrap();
    let branch_lines = &texts[local + 1..commitment];
    assert!(branch_lines.len() >= 2, "branch name did not wrap: {branch_lines:?}");

    let last_branch_y = branch_lines.last().unwrap().1;
    assert!(texts[commitment].1 >= last_branch_y + 6.0);
}

/// Builtin metrics at double width, standing in for a wide embedded font
struct WideMetrics(BuiltinMetrics);

impl TextMeasure for WideMetrics {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        2.0 * self.0.text_width(text, font)
    }
}

#[test]
fn test_label_height_follows_the_measuring_fonts() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let assembler = DocumentAssembler::new(&bundle, &config, &assets);

    let builtin = assembler.label_page_size(&BuiltinMetrics::new(Unit::Pt));
    let wide = assembler.label_page_size(&WideMetrics(BuiltinMetrics::new(Unit::Pt)));
    assert_eq!(wide.width, builtin.width);
    assert!(wide.height > builtin.height);
}

#[test]
fn test_render_with_resizes_label_page() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let assembler = DocumentAssembler::new(&bundle, &config, &assets);

    let doc = PdfDocument::new(PageSize::new(226.77, 50.0), Unit::Pt);
    let rendered = assembler.render_with(Profile::Label, doc).unwrap();
    let expected = assembler.label_page_size(&BuiltinMetrics::new(Unit::Pt));
    assert_eq!(rendered.report.page_size, expected);

    let pdf = Document::load_mem(&rendered.bytes).unwrap();
    let mb = media_box(&pdf);
    assert!((mb[3] - expected.height).abs() < 0.01);
}

#[test]
fn test_tape_sections() {
    let rec = compose(
        Profile::Tape,
        &bundle(),
        &RenderConfig::default(),
        &Assets::default(),
    );
    let texts = rec.texts();
    let order = [
        "DATOS DEL LOCAL",
        "DATOS DEL CLIENTE",
        "N° Orden:",
        "DATOS DEL EQUIPO",
        "SERVICIOS",
        "VALOR PRESUPUESTADO",
        "FIRMA DEL CLIENTE",
        "GARANTÍAS",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|h| texts.iter().position(|t| t == h).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(rec.contains_text("Nombre: iDocStore SpA"));
    assert!(rec.contains_text("Teléfono: +56 912345678"));
    assert!(rec.contains_text("TOTAL: $119 CLP"));
    assert!(rec.contains_text("• Cambio de pantalla"));
}

#[test]
fn test_tape_page_size() {
    let bundle = bundle();
    let config = RenderConfig::default();
    let assets = Assets::default();
    let (page, unit) = DocumentAssembler::new(&bundle, &config, &assets).page_setup(Profile::Tape);
    assert_eq!(unit, Unit::Pt);
    assert!((page.width - 226.77).abs() < 0.01);
    assert!((page.height - 5669.29).abs() < 0.01);
}
