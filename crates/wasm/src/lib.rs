//! WASM bindings for order-doc
//!
//! This crate provides JavaScript-friendly API for:
//! - Rendering work orders as PDF in the A4, receipt tape and label formats
//! - Loading shop settings as a config object or as settings rows
//! - Formatting CLP amounts for the dashboard
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { OrderRenderer, clpFormat } from 'order-doc-wasm';
//!
//! await init();
//!
//! const renderer = OrderRenderer.fromSettingsRows(JSON.stringify(settingsRows));
//! renderer.setLogo(logoBytes);
//! renderer.setChecklistItems(JSON.stringify(checklistItems));
//!
//! const pdf = renderer.render(JSON.stringify(bundle), 'standard');
//! const label = renderer.renderObject(bundle, 'etiqueta');
//! ```

use order_doc::{
    prepare_assets, AssetFetcher, ChecklistItemDef, DocError, LayoutReport, Profile,
    QrCodeEncoder, RenderConfig, StaticChecklist,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(e: DocError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Format an amount as Chilean pesos
///
/// @param amount - Amount in pesos
/// @param withLabel - Append " CLP"
/// @returns Formatted text (e.g., "$25.000")
#[wasm_bindgen(js_name = clpFormat)]
pub fn clp_format(amount: f64, with_label: Option<bool>) -> String {
    cl_format::format_clp(amount, with_label.unwrap_or(false))
}

/// Names accepted by `render`
///
/// @returns Array of profile names
#[wasm_bindgen]
pub fn profiles() -> js_sys::Array {
    Profile::ALL
        .iter()
        .map(|p| JsValue::from_str(p.as_str()))
        .collect()
}

/// Logo bytes handed over by the page instead of fetched
struct PreloadedLogo<'a>(Option<&'a [u8]>);

impl AssetFetcher for PreloadedLogo<'_> {
    fn fetch(&self, url: &str) -> order_doc::Result<Vec<u8>> {
        self.0
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| DocError::FetchError(format!("logo not loaded: {url}")))
    }
}

/// Layout summary of the last render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderSummary {
    profile: String,
    page_width: f64,
    page_height: f64,
    panel_heights: Vec<(String, f64)>,
    policy_font_size: Option<f64>,
    policy_overflow: bool,
}

impl From<&LayoutReport> for RenderSummary {
    fn from(report: &LayoutReport) -> Self {
        Self {
            profile: report.profile.to_string(),
            page_width: report.page_size.width,
            page_height: report.page_size.height,
            panel_heights: report.panel_heights.clone(),
            policy_font_size: report.policy_font_size,
            policy_overflow: report.policy_overflow,
        }
    }
}

/// Work order renderer
#[wasm_bindgen]
pub struct OrderRenderer {
    config: RenderConfig,
    logo: Option<Vec<u8>>,
    checklist_items: Vec<ChecklistItemDef>,
    last_report: Option<RenderSummary>,
}

#[wasm_bindgen]
impl OrderRenderer {
    /// Create a renderer from a config JSON object
    ///
    /// @param configJson - RenderConfig JSON; empty for the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<OrderRenderer, JsValue> {
        let config = if config_json.trim().is_empty() {
            RenderConfig::default()
        } else {
            order_doc::parse_config(config_json).map_err(to_js)?
        };
        Ok(Self::with_config(config))
    }

    /// Create a renderer from `system_settings` rows
    ///
    /// @param rowsJson - Array of { setting_key, setting_value }
    #[wasm_bindgen(js_name = fromSettingsRows)]
    pub fn from_settings_rows(rows_json: &str) -> Result<OrderRenderer, JsValue> {
        let config = order_doc::parse_settings_rows(rows_json).map_err(to_js)?;
        Ok(Self::with_config(config))
    }

    /// Use these bytes as the logo instead of fetching the configured URL
    ///
    /// @param data - PNG or JPEG bytes (Uint8Array)
    #[wasm_bindgen(js_name = setLogo)]
    pub fn set_logo(&mut self, data: &[u8]) {
        self.logo = Some(data.to_vec());
    }

    /// Checklist item definitions for every device type
    ///
    /// @param json - Array of { device_type, item_name, item_order }
    #[wasm_bindgen(js_name = setChecklistItems)]
    pub fn set_checklist_items(&mut self, json: &str) -> Result<(), JsValue> {
        self.checklist_items =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    /// Render an order bundle
    ///
    /// @param bundleJson - Order bundle JSON string
    /// @param profile - "standard", "tape" or "label"
    /// @returns PDF bytes (Uint8Array)
    pub fn render(&mut self, bundle_json: &str, profile: &str) -> Result<Vec<u8>, JsValue> {
        let bundle = order_doc::parse_bundle(bundle_json).map_err(to_js)?;
        self.render_bundle(&bundle, profile).map_err(to_js)
    }

    /// Render an order bundle given as a JavaScript object
    ///
    /// @param bundle - Order bundle object
    /// @param profile - "standard", "tape" or "label"
    /// @returns PDF bytes (Uint8Array)
    #[wasm_bindgen(js_name = renderObject)]
    pub fn render_object(&mut self, bundle: JsValue, profile: &str) -> Result<Vec<u8>, JsValue> {
        let bundle: order_doc::OrderBundle = serde_wasm_bindgen::from_value(bundle)?;
        self.render_bundle(&bundle, profile).map_err(to_js)
    }

    /// Layout summary of the last successful render
    ///
    /// @returns { profile, pageWidth, pageHeight, panelHeights, policyFontSize, policyOverflow }
    #[wasm_bindgen(js_name = lastReport)]
    pub fn last_report(&self) -> Result<JsValue, JsValue> {
        match &self.last_report {
            Some(summary) => Ok(serde_wasm_bindgen::to_value(summary)?),
            None => Ok(JsValue::NULL),
        }
    }
}

impl OrderRenderer {
    fn with_config(config: RenderConfig) -> Self {
        OrderRenderer {
            config,
            logo: None,
            checklist_items: Vec::new(),
            last_report: None,
        }
    }

    fn render_bundle(
        &mut self,
        bundle: &order_doc::OrderBundle,
        profile: &str,
    ) -> order_doc::Result<Vec<u8>> {
        let profile: Profile = profile.parse()?;
        let checklist = StaticChecklist::new(self.checklist_items.clone());
        let assets = prepare_assets(
            profile,
            bundle,
            &self.config,
            &PreloadedLogo(self.logo.as_deref()),
            &checklist,
            &QrCodeEncoder,
        );
        let doc = order_doc::render(profile, bundle, &self.config, &assets)?;
        self.last_report = Some(RenderSummary::from(&doc.report));
        Ok(doc.bytes)
    }
}
