//! External collaborators and asset preparation
//!
//! Everything a layout needs from the outside world is resolved here, before
//! any measuring starts. Failures degrade to a missing visual element and are
//! logged; they never abort a render.

use crate::config::RenderConfig;
use crate::model::{ChecklistItemDef, OrderBundle};
use crate::profile::Profile;
use crate::{DocError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use log::{debug, warn};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Source of checklist item definitions per device type
pub trait ChecklistSource {
    /// Definitions for a device type, in display order
    fn checklist_items(&self, device_type: &str) -> Result<Vec<ChecklistItemDef>>;
}

/// Fetches binary assets such as the logo
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// QR rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Target image width in pixels
    pub width: u32,
    /// Quiet zone in modules
    pub margin: u32,
}

/// Encodes text as a QR image
pub trait QrEncoder {
    /// Encode `data` and return image file bytes
    fn encode(&self, data: &str, options: QrOptions) -> Result<Vec<u8>>;
}

/// PNG QR codes built with `qrcode` and `image`
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl QrEncoder for QrCodeEncoder {
    fn encode(&self, data: &str, options: QrOptions) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
            .map_err(|e| DocError::QrError(e.to_string()))?;

        let modules = code.width() as u32;
        let total = modules + 2 * options.margin;
        let module_px = (options.width / total).max(1);

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(module_px, module_px)
            .build();

        let side = total * module_px;
        let offset = i64::from(options.margin * module_px);
        let mut canvas = GrayImage::from_pixel(side, side, Luma([255u8]));
        image::imageops::replace(&mut canvas, &symbol, offset, offset);

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| DocError::ImageError(e.to_string()))?;
        Ok(png)
    }
}

/// Fixed list of checklist definitions, filtered by device type
#[derive(Debug, Clone, Default)]
pub struct StaticChecklist {
    items: Vec<ChecklistItemDef>,
}

impl StaticChecklist {
    pub fn new(items: Vec<ChecklistItemDef>) -> Self {
        Self { items }
    }
}

impl ChecklistSource for StaticChecklist {
    fn checklist_items(&self, device_type: &str) -> Result<Vec<ChecklistItemDef>> {
        let mut items: Vec<ChecklistItemDef> = self
            .items
            .iter()
            .filter(|item| item.device_type.is_empty() || item.device_type == device_type)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.item_order);
        Ok(items)
    }
}

/// Fetcher for hosts that provide assets up front
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl AssetFetcher for NoFetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(DocError::FetchError(format!("no fetcher available for {url}")))
    }
}

/// Resolved external inputs for one render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assets {
    /// Logo image bytes
    pub logo: Option<Vec<u8>>,
    /// QR image bytes
    pub qr: Option<Vec<u8>>,
    /// Checklist definitions for the order's device type
    pub checklist_items: Vec<ChecklistItemDef>,
}

impl Assets {
    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_qr(mut self, qr: Vec<u8>) -> Self {
        self.qr = Some(qr);
        self
    }

    pub fn with_checklist_items(mut self, items: Vec<ChecklistItemDef>) -> Self {
        self.checklist_items = items;
        self
    }
}

/// QR options used by a profile, if it prints one
pub fn qr_options(profile: Profile) -> Option<QrOptions> {
    match profile {
        Profile::Standard => Some(QrOptions {
            width: 60,
            margin: 1,
        }),
        Profile::Tape => Some(QrOptions {
            width: 80,
            margin: 1,
        }),
        Profile::Label => None,
    }
}

/// Resolve logo, QR and checklist definitions for a render
///
/// Any failure leaves the corresponding asset absent.
pub fn prepare_assets(
    profile: Profile,
    bundle: &OrderBundle,
    config: &RenderConfig,
    fetcher: &dyn AssetFetcher,
    checklist: &dyn ChecklistSource,
    qr: &dyn QrEncoder,
) -> Assets {
    let mut assets = Assets::default();

    if profile != Profile::Label {
        assets.logo = load_logo(&config.pdf_logo.url, fetcher);
    }

    if let Some(options) = qr_options(profile) {
        let url = config.qr_url(&bundle.order.order_number);
        match qr.encode(&url, options) {
            Ok(bytes) => assets.qr = Some(bytes),
            Err(e) => warn!("QR code for {} not generated: {}", url, e),
        }
    }

    if profile == Profile::Standard && bundle.order.has_checklist() {
        match checklist.checklist_items(&bundle.order.device_type) {
            Ok(items) => assets.checklist_items = items,
            Err(e) => warn!(
                "checklist items for '{}' unavailable: {}",
                bundle.order.device_type, e
            ),
        }
    }

    debug!(
        "assets for {}: logo={} qr={} checklist_items={}",
        bundle.order.order_number,
        assets.logo.is_some(),
        assets.qr.is_some(),
        assets.checklist_items.len()
    );
    assets
}

fn load_logo(url: &str, fetcher: &dyn AssetFetcher) -> Option<Vec<u8>> {
    let loaded = if url.starts_with("data:") {
        decode_data_url(url)
    } else {
        fetcher.fetch(url)
    };
    match loaded {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("logo not loaded: {}", e);
            None
        }
    }
}

/// Decode a base64 `data:` URL into its bytes
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| DocError::DataUrlError("missing data: prefix".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DocError::DataUrlError("missing ',' separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(DocError::DataUrlError(format!(
            "unsupported encoding '{meta}'"
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DocError::DataUrlError(e.to_string()))
}
