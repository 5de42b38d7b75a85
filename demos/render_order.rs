//! Work Order Renderer
//!
//! Renders one order in every profile (A4, receipt tape and label).
//!
//! Usage:
//!   cargo run -p order-doc --example render_order -- [order.json] [output_dir] [font.ttf]
//!
//! Examples:
//!   cargo run -p order-doc --example render_order
//!   cargo run -p order-doc --example render_order -- demos/data/order.json output
//!   cargo run -p order-doc --example render_order -- demos/data/order.json output fonts/Roboto-Regular.ttf

use order_doc::{
    parse_bundle, prepare_assets, AssetFetcher, ChecklistItemDef, DocError, DocumentAssembler,
    Profile, QrCodeEncoder, RenderConfig, StaticChecklist,
};
use pdf_canvas::{FontFamilyBuilder, PdfDocument};
use std::path::{Path, PathBuf};

/// Reads logo URLs such as `/logo.png` relative to a directory
struct LocalFiles {
    root: PathBuf,
}

impl AssetFetcher for LocalFiles {
    fn fetch(&self, url: &str) -> order_doc::Result<Vec<u8>> {
        let path = self.root.join(url.trim_start_matches('/'));
        std::fs::read(&path).map_err(|e| DocError::FetchError(format!("{}: {}", path.display(), e)))
    }
}

fn checklist() -> StaticChecklist {
    let items = ["Pantalla", "Cámara", "Batería", "Botones", "Face ID"]
        .iter()
        .enumerate()
        .map(|(i, name)| ChecklistItemDef {
            device_type: "iphone".to_string(),
            item_name: name.to_string(),
            item_order: i as i32 + 1,
        })
        .collect();
    StaticChecklist::new(items)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let input_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("demos/data/order.json");
    let output_dir = Path::new(args.get(2).map(String::as_str).unwrap_or("output"));
    std::fs::create_dir_all(output_dir)?;

    let input_json = std::fs::read_to_string(input_path)
        .map_err(|e| format!("Failed to read order '{}': {}", input_path, e))?;
    let bundle = parse_bundle(&input_json)?;
    let config = RenderConfig::default();
    let fetcher = LocalFiles {
        root: PathBuf::from("demos/data"),
    };
    let checklist = checklist();

    for profile in Profile::ALL {
        let assets = prepare_assets(profile, &bundle, &config, &fetcher, &checklist, &QrCodeEncoder);
        let doc = order_doc::render(profile, &bundle, &config, &assets)?;

        let output_path = output_dir.join(format!("{}_{}.pdf", bundle.order.order_number, profile));
        std::fs::write(&output_path, &doc.bytes)?;
        println!("Generated: {} ({} bytes)", output_path.display(), doc.bytes.len());
        for (panel, height) in &doc.report.panel_heights {
            println!("  {:<12} {:>7.2}", panel, height);
        }
        if let Some(size) = doc.report.policy_font_size {
            println!("  policy font {}pt, overflow: {}", size, doc.report.policy_overflow);
        }
    }

    // A4 and label again with an embedded TrueType face for measuring and drawing
    if let Some(font_path) = args.get(3) {
        let ttf = std::fs::read(font_path)
            .map_err(|e| format!("Failed to read font '{}': {}", font_path, e))?;
        for profile in [Profile::Standard, Profile::Label] {
            let assets =
                prepare_assets(profile, &bundle, &config, &fetcher, &checklist, &QrCodeEncoder);
            let assembler = DocumentAssembler::new(&bundle, &config, &assets);
            let (page_size, unit) = assembler.page_setup(profile);
            let mut doc = PdfDocument::new(page_size, unit);
            doc.register_font_family("custom", FontFamilyBuilder::new().regular(ttf.clone()))?;
            let rendered = assembler.render_with(profile, doc)?;

            let output_path = output_dir.join(format!(
                "{}_{}_font.pdf",
                bundle.order.order_number, profile
            ));
            std::fs::write(&output_path, &rendered.bytes)?;
            println!(
                "Generated: {} ({:.1} x {:.1})",
                output_path.display(),
                rendered.report.page_size.width,
                rendered.report.page_size.height
            );
        }
    }

    Ok(())
}
