//! Page fetch strategies.
//!
//! Every strategy implements [`PageFetcher`]; the router picks one per
//! attempt and the pagination driver only sees the trait.

mod chromium;
mod http;
mod rendered;
mod static_fetch;

use async_trait::async_trait;
use scraper::Html;

use crate::error::ScraperError;

pub use chromium::ChromiumSession;
pub(crate) use http::{build_client, check_status};
pub use rendered::{BrowserSession, LaunchOptions, RenderSettings, RenderedFetcher};
pub use static_fetch::StaticFetcher;

/// Markup for one page plus the URL it was fetched from.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub body: String,
}

impl FetchResult {
    /// Parses the markup.
    ///
    /// The returned document is not `Send`; extract from it and drop it
    /// before the next `.await`.
    #[must_use]
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

#[async_trait]
pub trait PageFetcher: Send {
    /// Retrieves the markup at `url`.
    async fn fetch(&mut self, url: &str) -> Result<FetchResult, ScraperError>;

    /// Frees any session held by the fetcher. Safe to call more than once.
    async fn release(&mut self) {}
}
