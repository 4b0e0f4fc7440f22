use async_trait::async_trait;
use reqwest::Client;

use super::{check_status, FetchResult, PageFetcher};
use crate::error::ScraperError;
use crate::template::Template;

/// Plain HTTP GET with the template's headers. No retries.
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(template: &Template, timeout_secs: u64) -> Result<Self, ScraperError> {
        Ok(Self {
            client: super::build_client(timeout_secs, template.headers)?,
        })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on transport failure or timeout.
    async fn fetch(&mut self, url: &str) -> Result<FetchResult, ScraperError> {
        tracing::info!(url, "fetching page");
        let response = self.client.get(url).send().await?;
        let response = check_status(response, url)?;
        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok(FetchResult {
            url: final_url,
            body,
        })
    }
}
