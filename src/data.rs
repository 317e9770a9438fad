// src/data.rs
//
// Row types handed between the two pipelines and the spreadsheet layer.
// The harvester writes VariantRow, the checker reads them back and writes
// CheckedRow. Columns are fixed; see sheet.rs for the header names.

use serde_json::Value;

/// One purchasable variant, reduced to the four persisted columns.
/// Price is already converted from integer minor units to major units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantRow {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price_usd: Option<f64>,
    pub public_title: Option<String>,
}

impl VariantRow {
    /// Pick the output columns out of a flattened product+variant record.
    /// `variant_price` is the storefront's integer minor-unit price; the
    /// conversion is exact division, not truncation.
    pub fn from_flat(flat: &serde_json::Map<String, Value>) -> Self {
        Self {
            name: string_field(flat, "variant_name"),
            sku: string_field(flat, "variant_sku"),
            price_usd: flat
                .get("variant_price")
                .and_then(Value::as_i64)
                .map(|minor| minor as f64 / 100.0),
            public_title: string_field(flat, "variant_public_title"),
        }
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        // Numeric SKUs and the like still count as present
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Terminal outcome of probing the search widget for one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
    RetryFailed,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Unknown => "Unknown",
            StockStatus::RetryFailed => "Retry Failed",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A harvested row augmented by the stock checker.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedRow {
    pub variant: VariantRow,
    pub search_url: Option<String>,
    pub product_page_url: Option<String>,
    pub status: StockStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(v: Value) -> serde_json::Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn price_is_exact_division() {
        let row = VariantRow::from_flat(&flat(json!({
            "variant_name": "Widget",
            "variant_price": 1999
        })));
        assert_eq!(row.price_usd, Some(19.99));

        let row = VariantRow::from_flat(&flat(json!({ "variant_price": 100 })));
        assert_eq!(row.price_usd, Some(1.0));

        // Not integer truncation: 1 cent survives
        let row = VariantRow::from_flat(&flat(json!({ "variant_price": 1 })));
        assert_eq!(row.price_usd, Some(0.01));
    }

    #[test]
    fn missing_columns_are_none() {
        let row = VariantRow::from_flat(&flat(json!({ "product_title": "X" })));
        assert_eq!(row, VariantRow::default());
    }

    #[test]
    fn numeric_sku_is_kept_as_text() {
        let row = VariantRow::from_flat(&flat(json!({ "variant_sku": 4471 })));
        assert_eq!(row.sku.as_deref(), Some("4471"));
    }

    #[test]
    fn status_labels() {
        assert_eq!(StockStatus::InStock.as_str(), "In Stock");
        assert_eq!(StockStatus::OutOfStock.as_str(), "Out of Stock");
        assert_eq!(StockStatus::Unknown.as_str(), "Unknown");
        assert_eq!(StockStatus::RetryFailed.as_str(), "Retry Failed");
    }
}
