use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong for one URL. The display string becomes the
/// `reason` of the failed result.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Site não suportado: {0}")]
    UnsupportedSite(String),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("could not parse document: {0}")]
    Parse(String),
}

impl ExtractError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::InvalidUrl { .. } => "invalid_url",
            ExtractError::UnsupportedSite(_) => "unsupported_site",
            ExtractError::Network(_) => "network",
            ExtractError::Timeout(_) => "timeout",
            ExtractError::HttpStatus(_) => "http_status",
            ExtractError::Parse(_) => "parse",
        }
    }
}
