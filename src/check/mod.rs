// src/check/mod.rs
//
// Stock Checker: read the harvested spreadsheet, probe the storefront's
// search widget once per row through a browser session, classify the first
// result's CSS classes, write the augmented spreadsheet.
//
// The browser is an injected capability (`Browser`) so the retry and
// classification logic runs against a fake in tests. Probe failures are an
// explicit result type, not caught exceptions: a row that keeps failing ends
// in "Retry Failed" and the run moves on.

mod webdriver;
pub use webdriver::ChromeSession;

use std::{error::Error, fmt, path::PathBuf, thread, time::Duration};

use crate::{
    config::consts::{
        IN_STOCK_MARKER, OUT_OF_STOCK_MARKER, RESULT_CSS, SEARCH_PATH, VIEW_LINK_CSS,
    },
    config::options::CheckOptions,
    data::{CheckedRow, StockStatus, VariantRow},
    progress::Progress,
    sheet,
};

/// Why a single probe attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeError {
    /// The result element never materialized within the wait timeout.
    Timeout,
    /// A queried element does not exist on the rendered page.
    NotFound,
    /// Anything else the session reported (navigation error, dead driver…).
    Session(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout => f.write_str("timed out waiting for element"),
            ProbeError::NotFound => f.write_str("element not found"),
            ProbeError::Session(msg) => write!(f, "session error: {msg}"),
        }
    }
}

impl Error for ProbeError {}

/// The checker's view of a browser session. One implementation wraps a real
/// WebDriver (`ChromeSession`), tests provide fakes.
pub trait Browser {
    fn navigate(&mut self, url: &str) -> Result<(), ProbeError>;
    fn wait_for_element(&mut self, css: &str, timeout: Duration) -> Result<(), ProbeError>;
    fn read_attribute(&mut self, css: &str, attr: &str) -> Result<Option<String>, ProbeError>;
}

/// SKU when present and non-empty, else name. Neither → no query.
pub fn build_search_query(row: &VariantRow) -> Option<String> {
    let pick = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    pick(&row.sku).or_else(|| pick(&row.name))
}

pub fn search_url(base_url: &str, query: &str) -> String {
    format!("{base_url}{SEARCH_PATH}?q={}", urlencoding::encode(query))
}

/// Map the result element's class list onto a stock status.
pub fn classify(classes: &str) -> StockStatus {
    if classes.contains(IN_STOCK_MARKER) {
        StockStatus::InStock
    } else if classes.contains(OUT_OF_STOCK_MARKER) {
        StockStatus::OutOfStock
    } else {
        StockStatus::Unknown
    }
}

/// The widget's "view" link is sometimes a relative product path; absolutize
/// those and pass anything else through untouched.
pub fn normalize_view_link(base_url: &str, href: &str) -> String {
    if href.starts_with("/products/") {
        format!("{base_url}{href}")
    } else {
        s!(href)
    }
}

/// One attempt: navigate, wait for the first result, read its markers.
fn probe(
    browser: &mut dyn Browser,
    opts: &CheckOptions,
    url: &str,
) -> Result<(Option<String>, StockStatus), ProbeError> {
    browser.navigate(url)?;
    browser.wait_for_element(RESULT_CSS, opts.wait_timeout)?;

    let classes = browser.read_attribute(RESULT_CSS, "class")?.unwrap_or_default();
    let status = classify(&classes);

    // The view link is optional; a missing one is data, not a failure.
    let product_url = match browser.read_attribute(VIEW_LINK_CSS, "href") {
        Ok(Some(href)) => Some(normalize_view_link(&opts.base_url, &href)),
        Ok(None) | Err(ProbeError::NotFound) => None,
        Err(e) => return Err(e),
    };

    Ok((product_url, status))
}

/// Bounded retry around `probe`. Exhaustion is a terminal status, never an
/// error: the run always continues to the next row.
pub fn check_row(
    browser: &mut dyn Browser,
    opts: &CheckOptions,
    url: &str,
) -> (Option<String>, StockStatus) {
    for attempt in 1..=opts.retries {
        match probe(browser, opts, url) {
            Ok(outcome) => return outcome,
            Err(e) => {
                logd!("Check: attempt {attempt}/{} for {url}: {e}", opts.retries);
                thread::sleep(opts.retry_pause);
            }
        }
    }
    (None, StockStatus::RetryFailed)
}

/// Check every row in input order against one shared browser session.
pub fn check_rows(
    opts: &CheckOptions,
    browser: &mut dyn Browser,
    rows: Vec<VariantRow>,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<CheckedRow> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(rows.len());
    }

    let mut out = Vec::with_capacity(rows.len());
    for variant in rows {
        let query = build_search_query(&variant);
        let (search, product_url, status) = match &query {
            // No SKU and no name: nothing to search for, row stays Unknown.
            None => (None, None, StockStatus::Unknown),
            Some(q) => {
                let url = search_url(&opts.base_url, q);
                let (product_url, status) = check_row(browser, opts, &url);
                (Some(url), product_url, status)
            }
        };

        if let Some(p) = progress.as_deref_mut() {
            let label = query.as_deref().unwrap_or("(no query)");
            match status {
                StockStatus::RetryFailed => p.item_failed(label),
                _ => p.item_done(label),
            }
        }

        out.push(CheckedRow {
            variant,
            search_url: search,
            product_page_url: product_url,
            status,
        });
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    out
}

/// Full pipeline: load input, run one browser session over all rows, persist.
/// Fails fast (before any file or session work) when the input is missing.
pub fn run(
    opts: &CheckOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<(Vec<CheckedRow>, PathBuf), Box<dyn Error>> {
    let input = opts.in_path();
    if !input.exists() {
        return Err(format!(
            "missing input file {}; run the harvester first",
            input.display()
        )
        .into());
    }

    let rows = sheet::read_variants(&input)?;
    logf!("Check: loaded {} rows from {}", rows.len(), input.display());

    // One session for the whole run; Drop releases it on every exit path.
    let mut session = ChromeSession::start(opts.webdriver_url.as_deref())?;
    let checked = check_rows(opts, &mut session, rows, progress);
    drop(session);

    let path = opts.out_path();
    sheet::write_checked(&path, &checked)?;
    logf!("Check: wrote {} rows → {}", checked.len(), path.display());
    Ok((checked, path))
}
