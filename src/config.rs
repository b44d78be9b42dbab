/// Dashboard configuration
///
/// Column names are read from configuration instead of being scattered
/// through the transforms, so an export with differently named headers only
/// needs a small TOML file. Every field has a default matching the Etsy
/// "Sold Orders" export; a partial file overrides just what it names.

use crate::error::Result;
use log::info;
use serde::Deserialize;
use std::path::Path;

/// Header names for each semantic role the transforms consume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub sale_date: String,
    pub quantity: String,
    pub order_id: String,
    pub ship_country: String,
    pub ship_state: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        ColumnRoles {
            sale_date: "Sale Date".to_string(),
            quantity: "Number of Items".to_string(),
            order_id: "Order ID".to_string(),
            ship_country: "Ship Country".to_string(),
            ship_state: "Ship State".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub columns: ColumnRoles,
    /// Free-text buyer columns masked before anything is displayed.
    pub pii_columns: Vec<String>,
    pub mask_char: char,
    /// Value of the ship-country column that selects domestic orders.
    pub domestic_country: String,
    pub top_n_states: usize,
    pub others_label: String,
    pub preview_rows: usize,
    /// Pre-masked export used when the user has not supplied a file.
    pub sample_data: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            columns: ColumnRoles::default(),
            pii_columns: ["Buyer User ID", "Full Name", "First Name", "Last Name", "Buyer"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mask_char: '*',
            domestic_country: "United States".to_string(),
            top_n_states: 10,
            others_label: "Others".to_string(),
            preview_rows: 5,
            sample_data: "EtsySoldOrders2022_masked.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dashboard config from: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.columns.sale_date, "Sale Date");
        assert_eq!(config.columns.quantity, "Number of Items");
        assert_eq!(config.pii_columns.len(), 5);
        assert_eq!(config.mask_char, '*');
        assert_eq!(config.top_n_states, 10);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DashboardConfig::from_toml_str(
            r#"
top_n_states = 5
pii_columns = ["Customer"]

[columns]
quantity = "Qty"
"#,
        )
        .unwrap();

        assert_eq!(config.top_n_states, 5);
        assert_eq!(config.pii_columns, vec!["Customer".to_string()]);
        assert_eq!(config.columns.quantity, "Qty");
        // Untouched roles keep their defaults
        assert_eq!(config.columns.ship_state, "Ship State");
        assert_eq!(config.others_label, "Others");
    }

    #[test]
    fn test_invalid_toml() {
        let err = DashboardConfig::from_toml_str("top_n_states = \"many\"").unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }
}
