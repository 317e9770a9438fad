// src/harvest/mod.rs
//
// Collection Harvester: paginate the storefront catalog, flatten every
// variant into a row, write the raw spreadsheet.
//
// Contract: a non-success fetch aborts the whole harvest and nothing is
// written — partial output is discarded on that path. A page with zero
// parsed products is the normal end-of-catalog signal.

mod flatten;
pub use flatten::flatten_product_variant;

use std::{error::Error, path::PathBuf, thread};

use serde_json::Value;

use crate::{
    config::consts::COLLECTION_PATH,
    config::options::HarvestOptions,
    core::{extract, net},
    data::VariantRow,
    progress::Progress,
    sheet,
};

/// Page fetching as an injected capability so pagination logic is testable
/// without a network.
pub trait PageFetcher {
    fn fetch_page(&mut self, page: u32) -> Result<String, Box<dyn Error>>;
}

pub struct HttpPageFetcher {
    client: net::Client,
    base_url: String,
}

impl HttpPageFetcher {
    pub fn new(base_url: &str) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            client: net::Client::new()?,
            base_url: s!(base_url),
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&mut self, page: u32) -> Result<String, Box<dyn Error>> {
        let url = format!("{}{}?page={}", self.base_url, COLLECTION_PATH, page);
        self.client.get(&url)
    }
}

/// Walk collection pages from 1 until one parses empty, flattening variants
/// as we go. Rows come back in pagination order.
pub fn harvest(
    opts: &HarvestOptions,
    fetcher: &mut dyn PageFetcher,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<VariantRow>, Box<dyn Error>> {
    let mut rows = Vec::new();
    let mut page = 1u32;

    if let Some(p) = progress.as_deref_mut() {
        p.log("Harvesting collection pages…");
    }

    loop {
        // finish() must fire on this exit path too; see the Progress contract
        let html = match fetcher.fetch_page(page) {
            Ok(html) => html,
            Err(e) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return Err(e);
            }
        };

        let products = extract::extract_products(&html);
        if products.is_empty() {
            logf!("Harvest: page {page} has no products, stopping");
            break;
        }
        let urls = extract::extract_product_urls(&html);

        let mut page_rows = 0usize;
        for (i, product) in products.iter().enumerate() {
            // Positional pairing, best-effort: products beyond the prefetch
            // list simply get no detail URL.
            let product_url = urls.get(i).map(String::as_str);

            let variants = product.get("variants").and_then(Value::as_array);
            for variant in variants.into_iter().flatten() {
                let Some(variant) = variant.as_object() else {
                    continue;
                };
                let flat = flatten_product_variant(product, variant, product_url);
                rows.push(VariantRow::from_flat(&flat));
                page_rows += 1;
            }
        }

        logf!("Harvest: page {page} → {page_rows} variants");
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&format!("page {page} ({page_rows} variants)"));
        }

        page += 1;
        thread::sleep(opts.page_pause);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(rows)
}

/// Full pipeline: fetch, flatten, persist. Returns the rows and the path
/// written (existing file is overwritten).
pub fn run(
    opts: &HarvestOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<(Vec<VariantRow>, PathBuf), Box<dyn Error>> {
    let mut fetcher = HttpPageFetcher::new(&opts.base_url)?;
    let rows = harvest(opts, &mut fetcher, progress)?;

    let path = opts.out_path();
    sheet::write_variants(&path, &rows)?;
    logf!("Harvest: wrote {} rows → {}", rows.len(), path.display());
    Ok((rows, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FakeFetcher {
        pages: Vec<Result<String, String>>,
        fetches: usize,
    }

    impl FakeFetcher {
        fn new(pages: Vec<Result<String, String>>) -> Self {
            Self { pages, fetches: 0 }
        }
    }

    impl PageFetcher for FakeFetcher {
        fn fetch_page(&mut self, page: u32) -> Result<String, Box<dyn Error>> {
            self.fetches += 1;
            match self.pages.get((page - 1) as usize) {
                Some(Ok(html)) => Ok(html.clone()),
                Some(Err(e)) => Err(e.clone().into()),
                None => Ok(s!("<html></html>")),
            }
        }
    }

    fn opts() -> HarvestOptions {
        HarvestOptions {
            page_pause: Duration::ZERO,
            ..HarvestOptions::default()
        }
    }

    fn page_html(products: &str, urls: &[&str]) -> String {
        let links: String = urls
            .iter()
            .map(|u| format!("<link rel=\"prefetch\" href=\"{u}\">\n"))
            .collect();
        format!(
            "{links}<script>var meta = {{\"products\":{products}}};\n\
             for (var attr in meta) {{}}</script>"
        )
    }

    fn two_product_page() -> String {
        page_html(
            r#"[
                {"id":1,"title":"Cane","variants":[
                    {"id":11,"name":"Cane Black","sku":"CN-B","price":1999,"public_title":"Black"},
                    {"id":12,"name":"Cane Red","sku":"CN-R","price":2099,"public_title":"Red"}]},
                {"id":2,"title":"Chair","variants":[
                    {"id":21,"name":"Chair","sku":"CH-1","price":4500,"public_title":null}]}
            ]"#,
            &[
                "https://carex.com/products/cane",
                "https://carex.com/products/chair",
            ],
        )
    }

    #[test]
    fn two_pages_three_rows_two_fetches() {
        let mut fetcher = FakeFetcher::new(vec![
            Ok(two_product_page()),
            Ok(s!("<html>no products</html>")),
        ]);
        let rows = harvest(&opts(), &mut fetcher, None).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(fetcher.fetches, 2);
        assert_eq!(rows[0].sku.as_deref(), Some("CN-B"));
        assert_eq!(rows[0].price_usd, Some(19.99));
        assert_eq!(rows[2].name.as_deref(), Some("Chair"));
    }

    #[test]
    fn harvest_is_deterministic_over_fixed_pages() {
        let run = || {
            let mut fetcher = FakeFetcher::new(vec![
                Ok(two_product_page()),
                Ok(s!("<html></html>")),
            ]);
            harvest(&opts(), &mut fetcher, None).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn short_url_list_never_panics() {
        // Two products, only one prefetch hint: second product has no URL
        let html = page_html(
            r#"[
                {"id":1,"variants":[{"id":11,"sku":"A","price":100}]},
                {"id":2,"variants":[{"id":21,"sku":"B","price":200}]}
            ]"#,
            &["https://carex.com/products/only-one"],
        );
        let mut fetcher = FakeFetcher::new(vec![Ok(html), Ok(s!(""))]);
        let rows = harvest(&opts(), &mut fetcher, None).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn fetch_failure_aborts_with_error() {
        let mut fetcher = FakeFetcher::new(vec![
            Ok(two_product_page()),
            Err(s!("HTTP error: 503 Service Unavailable")),
        ]);
        let err = harvest(&opts(), &mut fetcher, None).unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[derive(Default)]
    struct RecordingProgress {
        finished: bool,
    }

    impl Progress for RecordingProgress {
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn progress_is_finished_even_when_a_fetch_fails() {
        let mut fetcher = FakeFetcher::new(vec![
            Ok(two_product_page()),
            Err(s!("HTTP error: 503 Service Unavailable")),
        ]);
        let mut prog = RecordingProgress::default();
        assert!(harvest(&opts(), &mut fetcher, Some(&mut prog)).is_err());
        assert!(prog.finished);
    }
}
