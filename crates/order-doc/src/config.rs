//! Render configuration and system settings

use log::warn;
use pdf_canvas::ImageScaleMode;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the order's warranty duration
pub const WARRANTY_DAYS_PLACEHOLDER: &str = "{warrantyDays}";

/// Logo source and its box on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoConfig {
    /// `data:` URL or a location understood by the asset fetcher
    pub url: String,
    pub width: f64,
    pub height: f64,
    /// Fit inside the box instead of stretching to it
    #[serde(default)]
    pub keep_aspect: bool,
}

impl LogoConfig {
    pub fn scale_mode(&self) -> ImageScaleMode {
        if self.keep_aspect {
            ImageScaleMode::FitBox
        } else {
            ImageScaleMode::Stretch
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            url: "/logo.png".to_string(),
            width: 33.0,
            height: 22.0,
            keep_aspect: false,
        }
    }
}

/// Warranty policy templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarrantyPolicies {
    pub policies: Vec<String>,
}

impl Default for WarrantyPolicies {
    fn default() -> Self {
        Self {
            policies: vec![
                "• Garantía 30 días por defectos de mano de obra y repuestos.".to_string(),
                "• NO cubre daños por mal uso, golpes, caídas o líquidos.".to_string(),
                "• Presentar boleta o factura para hacer efectiva la garantía.".to_string(),
                "• Cualquier reparación por terceros anula la garantía.".to_string(),
            ],
        }
    }
}

/// Configuration shared by every profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title of the branch panel
    pub company_name: String,
    pub pdf_logo: LogoConfig,
    pub warranty_policies: WarrantyPolicies,
    /// Public order page; the QR encodes `<qr_base_url>/<order_number>`
    pub qr_base_url: String,
    /// Offset from UTC used to print timestamps, in minutes
    pub display_offset_minutes: Option<i32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            company_name: "iDocStore".to_string(),
            pdf_logo: LogoConfig::default(),
            warranty_policies: WarrantyPolicies::default(),
            qr_base_url: "https://ordenes.idocstore.cl".to_string(),
            display_offset_minutes: None,
        }
    }
}

/// One row of the `system_settings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRow {
    pub setting_key: String,
    pub setting_value: serde_json::Value,
}

impl RenderConfig {
    /// Overlay raw settings rows on the defaults
    ///
    /// Unknown keys are ignored. A recognized key whose value does not
    /// deserialize keeps its default and is logged.
    pub fn from_settings_rows(rows: &[SettingRow]) -> Self {
        let mut config = Self::default();
        for row in rows {
            match row.setting_key.as_str() {
                "pdf_logo" => match serde_json::from_value(row.setting_value.clone()) {
                    Ok(logo) => config.pdf_logo = logo,
                    Err(e) => warn!("ignoring pdf_logo setting: {}", e),
                },
                "warranty_policies" => match serde_json::from_value(row.setting_value.clone()) {
                    Ok(policies) => config.warranty_policies = policies,
                    Err(e) => warn!("ignoring warranty_policies setting: {}", e),
                },
                _ => {}
            }
        }
        config
    }

    /// Policy texts with every placeholder substituted
    pub fn policy_texts(&self, warranty_days: u32) -> Vec<String> {
        let days = warranty_days.to_string();
        self.warranty_policies
            .policies
            .iter()
            .map(|policy| policy.replace(WARRANTY_DAYS_PLACEHOLDER, &days))
            .collect()
    }

    /// URL encoded in the order QR code
    pub fn qr_url(&self, order_number: &str) -> String {
        format!("{}/{}", self.qr_base_url.trim_end_matches('/'), order_number)
    }
}
