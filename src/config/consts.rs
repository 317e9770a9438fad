// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://carex.com";
pub const COLLECTION_PATH: &str = "/collections/all";
pub const SEARCH_PATH: &str = "/pages/search-results-page";
pub const USER_AGENT: &str = "Mozilla/5.0";

// Scrape
pub const PAGE_PAUSE_MS: u64 = 1000; // be polite between collection pages
pub const RETRY_ATTEMPTS: u32 = 5;
pub const RETRY_PAUSE_MS: u64 = 1000;
pub const WAIT_TIMEOUT_SECS: u64 = 10;

// Search-result markers rendered by the storefront's search widget
pub const RESULT_CSS: &str = ".snize-product";
pub const IN_STOCK_MARKER: &str = "snize-product-in-stock";
pub const OUT_OF_STOCK_MARKER: &str = "snize-product-out-of-stock";
pub const VIEW_LINK_CSS: &str = ".snize-product .snize-view-link";

// WebDriver
pub const WEBDRIVER_PORT: u16 = 9515;
pub const CHROME_BIN: &str = "/usr/bin/google-chrome";
pub const CHROMEDRIVER_BIN: &str = "/usr/bin/chromedriver";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const RAW_FILE: &str = "carex_variants_raw.xlsx";
pub const CHECKED_FILE: &str = "carex_variants_checked.xlsx";
