// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub harvest: HarvestOptions,
    pub check: CheckOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            harvest: HarvestOptions::default(),
            check: CheckOptions::default(),
        }
    }
}

/// Everything the Collection Harvester needs. No ambient globals:
/// the pipeline is a function of these options.
#[derive(Clone, Debug, PartialEq)]
pub struct HarvestOptions {
    pub base_url: String,
    pub out_dir: PathBuf,
    /// Pause between collection page fetches.
    pub page_pause: Duration,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            page_pause: Duration::from_millis(PAGE_PAUSE_MS),
        }
    }
}

impl HarvestOptions {
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(RAW_FILE)
    }
}

/// Everything the Stock Checker needs.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckOptions {
    pub base_url: String,
    pub out_dir: PathBuf,
    /// Per-row attempts before giving up with "Retry Failed".
    pub retries: u32,
    /// Pause after a failed attempt.
    pub retry_pause: Duration,
    /// How long to wait for the first search result to materialize.
    pub wait_timeout: Duration,
    /// Remote WebDriver endpoint. When `None`, a chromedriver is spawned locally.
    pub webdriver_url: Option<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            retries: RETRY_ATTEMPTS,
            retry_pause: Duration::from_millis(RETRY_PAUSE_MS),
            wait_timeout: Duration::from_secs(WAIT_TIMEOUT_SECS),
            webdriver_url: None,
        }
    }
}

impl CheckOptions {
    pub fn in_path(&self) -> PathBuf {
        self.out_dir.join(RAW_FILE)
    }

    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(CHECKED_FILE)
    }
}
