//! Order Doc - work order document composition
//!
//! This crate provides:
//! - Order, customer, branch and line item types read from the backend
//! - Render configuration with the shop's default logo and policies
//! - Two-pass layout blocks: panels, the equipment table, the policy block
//! - Three output profiles drawn by one assembler (A4, receipt tape, label)
//! - Traits for the checklist source, asset fetching and QR encoding
//!
//! # Example
//!
//! ```ignore
//! use order_doc::{parse_bundle, prepare_assets, render, NoFetch, Profile, QrCodeEncoder,
//!     RenderConfig, StaticChecklist};
//!
//! let bundle = parse_bundle(order_json)?;
//! let config = RenderConfig::default();
//! let assets = prepare_assets(Profile::Standard, &bundle, &config, &NoFetch,
//!     &StaticChecklist::default(), &QrCodeEncoder);
//! let doc = render(Profile::Standard, &bundle, &config, &assets)?;
//! std::fs::write("orden.pdf", &doc.bytes)?;
//! ```

pub mod config;
pub mod layout;
pub mod model;
pub mod parser;
mod profile;
pub mod services;

pub use config::{LogoConfig, RenderConfig, SettingRow, WarrantyPolicies};
pub use model::{
    BranchInfo, CatalogService, ChecklistItemDef, ChecklistStatus, CustomerInfo, LineItem,
    OrderBundle, OrderDocument,
};
pub use parser::{parse_bundle, parse_config, parse_settings_rows};
pub use profile::{DocumentAssembler, LayoutReport, Profile, RenderedDocument};
pub use services::{
    decode_data_url, prepare_assets, AssetFetcher, Assets, ChecklistSource, NoFetch,
    QrCodeEncoder, QrEncoder, QrOptions, StaticChecklist,
};

use thiserror::Error;

/// Errors that can occur while producing an order document
#[derive(Debug, Error)]
pub enum DocError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Unknown profile: {0}")]
    InvalidProfile(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Invalid data URL: {0}")]
    DataUrlError(String),

    #[error("QR error: {0}")]
    QrError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_canvas::PdfError),

    #[error("Format error: {0}")]
    FormatError(#[from] cl_format::FormatError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocError>;

/// Render one order in one profile with the built-in fonts
pub fn render(
    profile: Profile,
    bundle: &OrderBundle,
    config: &RenderConfig,
    assets: &Assets,
) -> Result<RenderedDocument> {
    DocumentAssembler::new(bundle, config, assets).render(profile)
}
