use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("browser rendering unavailable: {reason}")]
    BrowserUnavailable { reason: String },

    #[error("browser session failed while loading {url}: {reason}")]
    Browser { url: String, reason: String },

    #[error("no target URL given")]
    MissingTargetUrl,

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("template \"{key}\" has no container or name selectors")]
    UnusableTemplate { key: String },
}

impl ScraperError {
    /// `true` for caller mistakes that no fetch strategy can recover from.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingTargetUrl | Self::InvalidUrl { .. } | Self::UnusableTemplate { .. }
        )
    }
}
