// src/check/webdriver.rs
//
// Real browser session: thirtyfour over a local current-thread runtime, so
// the checker stays synchronous like the rest of the pipeline.
//
// Driver provisioning follows the deployment switch: when the fixed-path
// chromedriver exists we use it (and point Chrome at the fixed binary),
// otherwise we fall back to whatever `chromedriver` is on PATH. Either way
// the spawned process and the WebDriver session are torn down in Drop, so
// the session cannot leak however the per-row loop exits.

use std::{
    error::Error,
    net::TcpStream,
    path::Path,
    process::{Child, Command, Stdio},
    thread,
    time::Duration,
};

use thirtyfour::prelude::*;

use super::{Browser, ProbeError};
use crate::config::consts::{CHROME_BIN, CHROMEDRIVER_BIN, WEBDRIVER_PORT};

const CHROME_ARGS: [&str; 5] = [
    "--headless",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--window-size=1920,1080",
];

pub struct ChromeSession {
    rt: tokio::runtime::Runtime,
    driver: Option<WebDriver>,
    chromedriver: Option<Child>,
}

impl ChromeSession {
    /// Connect to `webdriver_url` if given, else spawn a local chromedriver.
    pub fn start(webdriver_url: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (url, chromedriver) = match webdriver_url {
            Some(u) => (s!(u), None),
            None => {
                let mut child = spawn_chromedriver()?;
                if let Err(e) = wait_for_port(WEBDRIVER_PORT, &mut child) {
                    reap(&mut child);
                    return Err(e);
                }
                (format!("http://127.0.0.1:{WEBDRIVER_PORT}"), Some(child))
            }
        };

        let mut caps = DesiredCapabilities::chrome();
        for arg in CHROME_ARGS {
            caps.add_arg(arg)?;
        }
        if Path::new(CHROME_BIN).exists() {
            caps.set_binary(CHROME_BIN)?;
        }

        let driver = match rt.block_on(WebDriver::new(&url, caps)) {
            Ok(d) => d,
            Err(e) => {
                // No session yet; only the spawned process needs cleanup
                if let Some(mut child) = chromedriver {
                    reap(&mut child);
                }
                return Err(format!("could not start WebDriver session at {url}: {e}").into());
            }
        };

        logf!("Check: WebDriver session ready at {url}");
        Ok(Self {
            rt,
            driver: Some(driver),
            chromedriver,
        })
    }

    fn driver(&self) -> Result<&WebDriver, ProbeError> {
        self.driver
            .as_ref()
            .ok_or_else(|| ProbeError::Session(s!("session already closed")))
    }
}

impl Browser for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), ProbeError> {
        let driver = self.driver()?;
        self.rt.block_on(driver.goto(url)).map_err(map_webdriver_err)
    }

    fn wait_for_element(&mut self, css: &str, timeout: Duration) -> Result<(), ProbeError> {
        let driver = self.driver()?;
        let found = self.rt.block_on(
            driver
                .query(By::Css(css))
                .wait(timeout, Duration::from_millis(250))
                .first(),
        );
        match found {
            Ok(_) => Ok(()),
            // The query poll loop reports "no such element" when time runs out
            Err(e) => match map_webdriver_err(e) {
                ProbeError::NotFound => Err(ProbeError::Timeout),
                other => Err(other),
            },
        }
    }

    fn read_attribute(&mut self, css: &str, attr: &str) -> Result<Option<String>, ProbeError> {
        let driver = self.driver()?;
        let elem = self
            .rt
            .block_on(driver.find(By::Css(css)))
            .map_err(map_webdriver_err)?;
        self.rt.block_on(elem.attr(attr)).map_err(map_webdriver_err)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = self.rt.block_on(driver.quit()) {
                loge!("Check: failed to quit WebDriver session: {e}");
            }
        }
        if let Some(mut child) = self.chromedriver.take() {
            reap(&mut child);
        }
    }
}

fn map_webdriver_err(e: WebDriverError) -> ProbeError {
    let msg = e.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        ProbeError::Timeout
    } else if lower.contains("no such element") {
        ProbeError::NotFound
    } else {
        ProbeError::Session(msg)
    }
}

fn spawn_chromedriver() -> Result<Child, Box<dyn Error>> {
    let bin = if Path::new(CHROMEDRIVER_BIN).exists() {
        CHROMEDRIVER_BIN
    } else {
        "chromedriver"
    };
    logf!("Check: launching {bin} on port {WEBDRIVER_PORT}");
    Command::new(bin)
        .arg(format!("--port={WEBDRIVER_PORT}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to launch {bin}: {e}").into())
}

/// Kill the spawned chromedriver and collect its exit status so it never
/// lingers as a zombie.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Poll until something accepts on `port`. A child that exits before binding
/// is reported directly, even if an unrelated service holds the port.
fn wait_for_port(port: u16, child: &mut Child) -> Result<(), Box<dyn Error>> {
    for _ in 0..50 {
        if let Ok(Some(status)) = child.try_wait() {
            return Err(format!("chromedriver exited early ({status})").into());
        }
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(100));
    }
    Err(format!("chromedriver did not start listening on port {port}").into())
}
