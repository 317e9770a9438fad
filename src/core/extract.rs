// src/core/extract.rs
//
// Pulls structured data out of a raw collection page:
//  - the `var meta = {...}` inline-script JSON blob carrying products+variants,
//  - the ordered <link rel="prefetch"> product detail URLs.
//
// Both are best-effort pattern matches. A page without the blob simply yields
// no products, which the harvester treats as end-of-catalog.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

fn meta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)var meta = (\{.*?\});\s*for \(var attr in meta\)").unwrap()
    })
}

fn prefetch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<link rel="prefetch" href="([^"]+/products/[^"/]+)""#).unwrap()
    })
}

/// Extract the product list from the embedded meta blob.
/// Missing blob or malformed JSON → empty list.
pub fn extract_products(html: &str) -> Vec<Map<String, Value>> {
    let Some(caps) = meta_re().captures(html) else {
        return Vec::new();
    };
    let meta: Value = match serde_json::from_str(&caps[1]) {
        Ok(v) => v,
        Err(e) => {
            loge!("Extract: meta blob is not valid JSON: {e}");
            return Vec::new();
        }
    };
    meta.get("products")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .filter_map(|p| p.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Detail-page URLs in page order, from the prefetch link tags.
pub fn extract_product_urls(html: &str) -> Vec<String> {
    prefetch_re()
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
        <link rel="prefetch" href="https://carex.com/products/folding-cane">
        <link rel="prefetch" href="https://carex.com/products/shower-chair">
        <link rel="stylesheet" href="/assets/theme.css">
        </head><body>
        <script>
        var meta = {"products":[
            {"id":1,"title":"Folding Cane","variants":[{"id":11,"sku":"FC-1","price":1999}]},
            {"id":2,"title":"Shower Chair","variants":[{"id":21,"sku":"SC-1","price":4500}]}
        ],"page":{"pageType":"collection"}};
        for (var attr in meta) { window[attr] = meta[attr]; }
        </script>
        </body></html>"#;

    #[test]
    fn extracts_products_from_meta_blob() {
        let products = extract_products(PAGE);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["title"], "Folding Cane");
        assert_eq!(products[1]["id"], 2);
    }

    #[test]
    fn extracts_prefetch_urls_in_order() {
        let urls = extract_product_urls(PAGE);
        assert_eq!(
            urls,
            vec![
                "https://carex.com/products/folding-cane",
                "https://carex.com/products/shower-chair",
            ]
        );
    }

    #[test]
    fn page_without_meta_blob_is_empty() {
        assert!(extract_products("<html><body>nothing here</body></html>").is_empty());
        assert!(extract_product_urls("<html></html>").is_empty());
    }

    #[test]
    fn malformed_meta_json_is_empty_not_fatal() {
        let html = "var meta = {broken; for (var attr in meta)";
        assert!(extract_products(html).is_empty());
    }

    #[test]
    fn blob_match_is_non_greedy() {
        // Two script blocks; only the first meta assignment should match
        let html = r#"
            var meta = {"products":[{"id":1,"variants":[]}]};
            for (var attr in meta) {}
            var meta = {"products":[{"id":2,"variants":[]},{"id":3,"variants":[]}]};
            for (var attr in meta) {}
        "#;
        let products = extract_products(html);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], 1);
    }
}
