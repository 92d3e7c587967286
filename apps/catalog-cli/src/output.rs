//! Rendering of operation results, as console text or JSON.

use catalog_core::{Money, Product};
use serde_json::json;

/// Output style picked by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Text
        }
    }

    /// A single lookup result.
    pub fn product(&self, found: Option<&Product>) -> serde_json::Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(&found),
            Format::Text => Ok(match found {
                Some(p) => format!("Product found: {}", describe(p)),
                None => "Product not found".to_string(),
            }),
        }
    }

    /// A list of products, one `label: ...` line each in text mode.
    pub fn products(&self, label: &str, items: &[Product]) -> serde_json::Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(items),
            Format::Text if items.is_empty() => Ok("No products found".to_string()),
            Format::Text => Ok(items
                .iter()
                .map(|p| format!("{}: {}", label, describe(p)))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// A basket total.
    pub fn total(&self, label: &str, total: Money) -> serde_json::Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(&json!({ "Total": total })),
            Format::Text => Ok(format!("{}: {}", label, total)),
        }
    }

    /// Outcome of a write. `changed == false` means no record had the key.
    pub fn outcome(&self, changed: bool, success: &str) -> serde_json::Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(&json!({ "Changed": changed })),
            Format::Text if changed => Ok(success.to_string()),
            Format::Text => Ok("Product not found".to_string()),
        }
    }
}

fn describe(p: &Product) -> String {
    format!(
        "{}, Store: {}, Quantity: {}, Price: {}",
        p.product_name, p.store_id, p.quantity, p.price
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> Product {
        Product::new("Apple", 1, 10, Money::from_cents(200))
    }

    #[test]
    fn test_text_rendering() {
        let text = Format::Text;
        assert_eq!(
            text.product(Some(&apple())).unwrap(),
            "Product found: Apple, Store: 1, Quantity: 10, Price: 2.00"
        );
        assert_eq!(text.product(None).unwrap(), "Product not found");
        assert_eq!(text.products("Product", &[]).unwrap(), "No products found");
        assert_eq!(
            text.total("Total price for the purchase", Money::from_cents(600))
                .unwrap(),
            "Total price for the purchase: 6.00"
        );
        assert_eq!(text.outcome(false, "done").unwrap(), "Product not found");
    }

    #[test]
    fn test_json_rendering() {
        let json = Format::Json;

        let value: serde_json::Value =
            serde_json::from_str(&json.products("Product", &[apple()]).unwrap()).unwrap();
        assert_eq!(value[0]["ProductName"], "Apple");
        assert_eq!(value[0]["Price"], "2.00");

        assert_eq!(json.product(None).unwrap(), "null");

        let value: serde_json::Value =
            serde_json::from_str(&json.total("ignored", Money::from_cents(600)).unwrap()).unwrap();
        assert_eq!(value["Total"], "6.00");
    }
}
