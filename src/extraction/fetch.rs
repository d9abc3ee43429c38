use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use super::error::ExtractError;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const MAX_CONCURRENCY: usize = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self { FetchSettings { concurrency: DEFAULT_CONCURRENCY, timeout_secs: DEFAULT_TIMEOUT_SECS } }
}

impl FetchSettings {
    /// CLI flag, then MSCRAPE_* env var, then default.
    pub fn resolve(concurrency: Option<usize>, timeout_secs: Option<u64>) -> Self {
        let concurrency = concurrency
            .or_else(|| env_parse("MSCRAPE_MAX_CONCURRENCY"))
            .unwrap_or(DEFAULT_CONCURRENCY)
            .clamp(1, MAX_CONCURRENCY);
        let timeout_secs = timeout_secs
            .or_else(|| env_parse("MSCRAPE_TIMEOUT_SECS"))
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        FetchSettings { concurrency, timeout_secs }
    }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("build http client")
}

pub async fn fetch_page(client: &Client, url: &str, timeout_secs: u64) -> Result<String, ExtractError> {
    let resp = client.get(url).send().await.map_err(|e| transport_error(e, timeout_secs))?;
    let status = resp.status();
    if !status.is_success() { return Err(ExtractError::HttpStatus(status)); }
    resp.text().await.map_err(|e| transport_error(e, timeout_secs))
}

fn transport_error(e: reqwest::Error, timeout_secs: u64) -> ExtractError {
    if e.is_timeout() { ExtractError::Timeout(timeout_secs) } else { ExtractError::Network(e) }
}
