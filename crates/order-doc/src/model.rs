//! Order data as fetched for a single render
//!
//! Every type here is a read-only view built from upstream query results.
//! Field names follow the backend columns so bundles can be deserialized
//! straight from the API payload.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Tolerance when comparing stored money amounts
const MONEY_EPSILON: f64 = 0.5;

/// Device condition recorded during intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    Ok,
    Damaged,
    Replaced,
    #[serde(rename = "no_probado", alias = "untested")]
    Untested,
    /// Status text the backend sent that is not one of the above
    #[serde(skip)]
    Unrecognized,
}

impl ChecklistStatus {
    /// Suffix printed after the item name
    pub fn label(self) -> &'static str {
        match self {
            ChecklistStatus::Ok => "(ok)",
            ChecklistStatus::Damaged => "(dañado)",
            ChecklistStatus::Replaced => "(reparado)",
            ChecklistStatus::Untested => "(no probado)",
            ChecklistStatus::Unrecognized => "",
        }
    }

    /// Item name followed by its suffix, if it has one
    pub fn entry(self, item_name: &str) -> String {
        match self.label() {
            "" => item_name.to_string(),
            label => format!("{item_name} {label}"),
        }
    }
}

/// Main order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
    pub order_number: String,
    pub created_at: String,
    #[serde(default)]
    pub device_type: String,
    pub device_model: String,
    #[serde(default)]
    pub device_serial_number: Option<String>,
    #[serde(default)]
    pub device_unlock_code: Option<String>,
    /// Pattern lock as the sequence of touched points
    #[serde(default)]
    pub device_unlock_pattern: Option<Vec<u8>>,
    #[serde(default)]
    pub problem_description: String,
    #[serde(default)]
    pub warranty_days: u32,
    #[serde(default)]
    pub replacement_cost: f64,
    /// Tax-inclusive total as stored on the order
    #[serde(default)]
    pub total_repair_cost: Option<f64>,
    #[serde(default)]
    pub commitment_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_checklist")]
    pub checklist_data: BTreeMap<String, Option<ChecklistStatus>>,
}

impl OrderDocument {
    /// Unlock credential as printed: the code, or the pattern points joined
    pub fn unlock_credential(&self) -> Option<String> {
        if let Some(code) = self.device_unlock_code.as_deref().map(str::trim) {
            if !code.is_empty() {
                return Some(code.to_string());
            }
        }
        match &self.device_unlock_pattern {
            Some(points) if !points.is_empty() => {
                Some(points.iter().map(|p| p.to_string()).collect())
            }
            _ => None,
        }
    }

    /// Serial number, if one was recorded
    pub fn serial(&self) -> Option<&str> {
        non_empty(self.device_serial_number.as_deref())
    }

    /// Whether any checklist entry carries a status
    pub fn has_checklist(&self) -> bool {
        self.checklist_data.values().any(Option::is_some)
    }
}

/// Branch (sucursal) details; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub razon_social: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl BranchInfo {
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// Legal name, falling back to the display name
    pub fn legal_name(&self) -> Option<&str> {
        non_empty(self.razon_social.as_deref()).or_else(|| self.name())
    }

    pub fn address(&self) -> Option<&str> {
        non_empty(self.address.as_deref())
    }

    pub fn phone(&self) -> Option<&str> {
        non_empty(self.phone.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }
}

/// Customer details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub phone_country_code: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerInfo {
    /// Phone with its country code, when one is stored
    pub fn phone_display(&self) -> String {
        match non_empty(self.phone_country_code.as_deref()) {
            Some(code) => format!("{} {}", code, self.phone),
            None => self.phone.clone(),
        }
    }

    /// Phone with the country code, defaulting to Chile
    pub fn phone_with_default_code(&self) -> String {
        let code = non_empty(self.phone_country_code.as_deref()).unwrap_or("+56");
        format!("{} {}", code, self.phone)
    }

    pub fn address(&self) -> Option<&str> {
        non_empty(self.address.as_deref())
    }
}

/// A priced line on the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(alias = "service_name")]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    /// Stored line total, kept even if it differs from quantity x unit price
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Quantity, treating a stored zero as one
    pub fn quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Stored total, or quantity x unit price when none is stored
    pub fn line_total(&self) -> f64 {
        match self.total_price {
            Some(total) if total != 0.0 => total,
            _ => f64::from(self.quantity()) * self.unit_price,
        }
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

/// A service from the catalogue linked to the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogService {
    pub name: String,
    #[serde(default)]
    pub default_price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&CatalogService> for LineItem {
    fn from(service: &CatalogService) -> Self {
        LineItem {
            name: service.name.clone(),
            quantity: 1,
            unit_price: service.default_price,
            total_price: None,
            description: service.description.clone(),
        }
    }
}

/// Checklist item definition for a device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItemDef {
    #[serde(default)]
    pub device_type: String,
    pub item_name: String,
    #[serde(default)]
    pub item_order: i32,
}

/// Everything a single render reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBundle {
    pub order: OrderDocument,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default, alias = "sucursal")]
    pub branch: Option<BranchInfo>,
    /// Catalogue services, used when no priced lines exist
    #[serde(default)]
    pub services: Vec<CatalogService>,
    /// Priced order lines
    #[serde(default)]
    pub order_services: Vec<LineItem>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl OrderBundle {
    /// Lines shown in the equipment table
    ///
    /// Priced order lines win; otherwise catalogue services are listed with
    /// quantity one at their default price.
    pub fn effective_line_items(&self) -> Vec<LineItem> {
        if !self.order_services.is_empty() {
            self.order_services.clone()
        } else {
            self.services.iter().map(LineItem::from).collect()
        }
    }

    /// Sum of line totals plus replacement cost
    pub fn computed_total(&self) -> f64 {
        let lines: f64 = self
            .effective_line_items()
            .iter()
            .map(LineItem::line_total)
            .sum();
        lines + self.order.replacement_cost
    }

    /// Tax-inclusive total to print
    ///
    /// The stored total is printed verbatim. A mismatch with the line items
    /// is logged, never corrected.
    pub fn total(&self) -> f64 {
        let computed = self.computed_total();
        match self.order.total_repair_cost {
            Some(stored) => {
                if (stored - computed).abs() > MONEY_EPSILON {
                    warn!(
                        "order {}: stored total {} differs from line items plus replacement {}",
                        self.order.order_number, stored, computed
                    );
                }
                stored
            }
            None => computed,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read checklist data, treating null and empty statuses as unassigned
///
/// An unknown status keeps its entry as [`ChecklistStatus::Unrecognized`].
fn deserialize_checklist<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Option<ChecklistStatus>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    let mut data = BTreeMap::new();
    for (name, status) in raw.unwrap_or_default() {
        let parsed = match status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                match serde_json::from_value(serde_json::Value::String(text.to_string())) {
                    Ok(status) => Some(status),
                    Err(_) => {
                        warn!("checklist item '{}': unknown status '{}'", name, text);
                        Some(ChecklistStatus::Unrecognized)
                    }
                }
            }
        };
        data.insert(name, parsed);
    }
    Ok(data)
}
