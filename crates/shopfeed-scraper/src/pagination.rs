//! Bounded multi-page traversal.
//!
//! [`paginate`] drives any [`PageSource`] from a start cursor until the
//! source runs out of pages, the page bound is hit, the first page comes back
//! empty, or a load fails. Records gathered before a failure are kept.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopfeed_core::CanonicalProduct;

use crate::error::ScraperError;
use crate::extract::{extract, find_next_page};
use crate::fetch::PageFetcher;
use crate::pacing::Pacing;
use crate::template::Template;

/// Records from one page and the cursor of the page after it.
#[derive(Debug)]
pub struct Page<C> {
    pub products: Vec<CanonicalProduct>,
    pub next: Option<C>,
}

#[async_trait]
pub trait PageSource: Send {
    /// Position of a page: a URL, an item offset, a page number.
    type Cursor: Clone + Send + Sync + std::fmt::Debug;

    async fn load(&mut self, cursor: &Self::Cursor) -> Result<Page<Self::Cursor>, ScraperError>;

    /// Frees held resources. Called once when traversal ends, on every path.
    async fn release(&mut self);
}

/// Why a traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source reported no further page.
    Exhausted,
    /// The page bound was reached.
    Bounded,
    /// The first page produced no records.
    EmptyFirstPage,
    /// A page failed to load; earlier records are kept.
    FetchFailed,
}

/// Result of one traversal.
#[derive(Debug)]
pub struct ScrapeSession<C> {
    pub products: Vec<CanonicalProduct>,
    pub pages_fetched: usize,
    /// The next page that would have been loaded, if any.
    pub cursor: Option<C>,
    pub stop: StopReason,
}

/// Loads pages from `source` in order, starting at `start`.
///
/// `pacing` separates successive loads; no delay precedes the first page.
/// `source.release()` runs before this returns, whatever the outcome.
///
/// # Errors
///
/// Only [`ScraperError::BrowserUnavailable`] is returned, so the caller can
/// switch strategies. Every other load error ends the traversal with
/// [`StopReason::FetchFailed`].
pub async fn paginate<S: PageSource>(
    source: &mut S,
    start: S::Cursor,
    max_pages: usize,
    pacing: &Pacing,
) -> Result<ScrapeSession<S::Cursor>, ScraperError> {
    let mut products = Vec::new();
    let mut pages_fetched = 0usize;
    let mut cursor = Some(start);

    let outcome = loop {
        let Some(current) = cursor.clone() else {
            break Ok(StopReason::Exhausted);
        };
        if pages_fetched >= max_pages {
            break Ok(StopReason::Bounded);
        }
        if pages_fetched > 0 {
            pacing.pause().await;
        }

        match source.load(&current).await {
            Ok(page) => {
                pages_fetched += 1;
                let found = page.products.len();
                products.extend(page.products);
                cursor = page.next;
                tracing::info!(
                    page = pages_fetched,
                    cursor = ?current,
                    found,
                    total = products.len(),
                    "page loaded"
                );
                if found == 0 && pages_fetched == 1 {
                    tracing::warn!(cursor = ?current, "no products on first page");
                    break Ok(StopReason::EmptyFirstPage);
                }
            }
            Err(e @ ScraperError::BrowserUnavailable { .. }) => break Err(e),
            Err(e) => {
                tracing::warn!(cursor = ?current, error = %e, "page load failed, keeping partial results");
                cursor = Some(current);
                break Ok(StopReason::FetchFailed);
            }
        }
    };

    source.release().await;
    let stop = outcome?;

    Ok(ScrapeSession {
        products,
        pages_fetched,
        cursor,
        stop,
    })
}

/// Link-following page source over any [`PageFetcher`].
///
/// The cursor is the page URL; the next cursor comes from the template's
/// next-page selectors.
pub struct HtmlPageSource<F> {
    fetcher: F,
    template: Template,
    scraped_at: DateTime<Utc>,
}

impl<F: PageFetcher> HtmlPageSource<F> {
    #[must_use]
    pub fn new(fetcher: F, template: Template, scraped_at: DateTime<Utc>) -> Self {
        Self {
            fetcher,
            template,
            scraped_at,
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageSource for HtmlPageSource<F> {
    type Cursor = String;

    async fn load(&mut self, cursor: &String) -> Result<Page<String>, ScraperError> {
        let fetched = self.fetcher.fetch(cursor).await?;
        let document = fetched.document();
        let products = extract(&document, &self.template, &fetched.url, self.scraped_at);
        let next = find_next_page(&document, &self.template, &fetched.url);
        drop(document);
        Ok(Page { products, next })
    }

    async fn release(&mut self) {
        self.fetcher.release().await;
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
