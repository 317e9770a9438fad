// src/core/net.rs

// HTTPS GET via reqwest's blocking client. The storefront only speaks TLS,
// and it wants a browser-looking User-Agent.

use std::{error::Error, time::Duration};

use crate::config::consts::USER_AGENT;

pub struct Client {
    inner: reqwest::blocking::Client,
}

impl Client {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { inner })
    }

    /// Fetch a page body. Any non-success status is an error.
    pub fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let res = self.inner.get(url).send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(format!("HTTP error: {status} {url}").into());
        }
        Ok(res.text()?)
    }
}
