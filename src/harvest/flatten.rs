// src/harvest/flatten.rs
//
// Merge one product+variant pair into a single flat record. Product keys get
// a `product_` prefix, variant keys a `variant_` prefix, so the two sides can
// never collide whatever fields the storefront ships.

use serde_json::{Map, Value};

/// Flatten a variant against its parent product.
///
/// `product_url` is the positionally paired detail-page URL (may be absent);
/// `variant_url` is derived from it by appending the variant id as a query
/// parameter, and is absent whenever the detail URL is.
pub fn flatten_product_variant(
    product: &Map<String, Value>,
    variant: &Map<String, Value>,
    product_url: Option<&str>,
) -> Map<String, Value> {
    let mut flat = Map::new();

    for (k, v) in product {
        if k == "variants" {
            continue;
        }
        flat.insert(format!("product_{k}"), v.clone());
    }
    for (k, v) in variant {
        flat.insert(format!("variant_{k}"), v.clone());
    }

    let variant_url = product_url.map(|url| {
        let id = variant.get("id").map(render_id).unwrap_or_default();
        format!("{url}?variant={id}")
    });

    flat.insert(
        s!("product_url"),
        product_url.map_or(Value::Null, |u| Value::String(s!(u))),
    );
    flat.insert(s!("variant_url"), variant_url.map_or(Value::Null, Value::String));

    flat
}

fn render_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn prefixes_keep_product_and_variant_fields_apart() {
        // Same field name on both sides must survive as two distinct keys
        let product = obj(json!({ "id": 1, "title": "Cane", "variants": [] }));
        let variant = obj(json!({ "id": 11, "title": "Cane / Black" }));

        let flat = flatten_product_variant(&product, &variant, None);

        assert_eq!(flat["product_id"], 1);
        assert_eq!(flat["variant_id"], 11);
        assert_eq!(flat["product_title"], "Cane");
        assert_eq!(flat["variant_title"], "Cane / Black");
    }

    #[test]
    fn variants_key_is_not_carried_over() {
        let product = obj(json!({ "id": 1, "variants": [{ "id": 11 }] }));
        let variant = obj(json!({ "id": 11 }));
        let flat = flatten_product_variant(&product, &variant, None);
        assert!(!flat.contains_key("product_variants"));
    }

    #[test]
    fn variant_url_appends_id_when_detail_url_present() {
        let product = obj(json!({ "id": 1 }));
        let variant = obj(json!({ "id": 11 }));
        let flat = flatten_product_variant(
            &product,
            &variant,
            Some("https://carex.com/products/cane"),
        );
        assert_eq!(flat["product_url"], "https://carex.com/products/cane");
        assert_eq!(
            flat["variant_url"],
            "https://carex.com/products/cane?variant=11"
        );
    }

    #[test]
    fn urls_are_null_without_detail_url() {
        let product = obj(json!({ "id": 1 }));
        let variant = obj(json!({ "id": 11 }));
        let flat = flatten_product_variant(&product, &variant, None);
        assert_eq!(flat["product_url"], Value::Null);
        assert_eq!(flat["variant_url"], Value::Null);
    }
}
