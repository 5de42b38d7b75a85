//! JSON input parsing

use crate::config::{RenderConfig, SettingRow};
use crate::model::OrderBundle;
use crate::{DocError, Result};

/// Parse an order bundle from its JSON payload
pub fn parse_bundle(json: &str) -> Result<OrderBundle> {
    serde_json::from_str(json).map_err(|e| DocError::ParseError(e.to_string()))
}

/// Parse a render configuration; missing fields take their defaults
pub fn parse_config(json: &str) -> Result<RenderConfig> {
    serde_json::from_str(json).map_err(|e| DocError::ParseError(e.to_string()))
}

/// Parse `system_settings` rows and overlay them on the defaults
pub fn parse_settings_rows(json: &str) -> Result<RenderConfig> {
    let rows: Vec<SettingRow> =
        serde_json::from_str(json).map_err(|e| DocError::ParseError(e.to_string()))?;
    Ok(RenderConfig::from_settings_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bundle_with_sucursal_alias() {
        let json = r#"{
            "order": {
                "order_number": "ORD-12",
                "created_at": "2024-03-05 14:30:00+00",
                "device_model": "Galaxy S21"
            },
            "sucursal": {"name": "Centro"},
            "order_services": [
                {"service_name": "Cambio pantalla", "quantity": 1, "unit_price": 50000, "total_price": 50000}
            ]
        }"#;
        let bundle = parse_bundle(json).unwrap();
        assert_eq!(bundle.order.order_number, "ORD-12");
        assert_eq!(
            bundle.branch.as_ref().and_then(|b| b.name()),
            Some("Centro")
        );
        assert_eq!(bundle.order_services.len(), 1);
        assert!(bundle.customer.is_none());
    }

    #[test]
    fn test_parse_bundle_missing_order() {
        let err = parse_bundle(r#"{"customer": null}"#).unwrap_err();
        assert!(matches!(err, DocError::ParseError(_)));
    }

    #[test]
    fn test_parse_settings_rows() {
        let json = r#"[
            {"setting_key": "warranty_policies", "setting_value": {"policies": ["Garantía {warrantyDays} días"]}}
        ]"#;
        let config = parse_settings_rows(json).unwrap();
        assert_eq!(config.policy_texts(30), vec!["Garantía 30 días".to_string()]);
    }
}
