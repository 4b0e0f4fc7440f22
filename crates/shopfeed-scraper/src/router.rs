//! Strategy selection: API first, then rendered or static HTML.
//!
//! The first attempt that yields records wins. Attempts are never merged.

use chrono::{DateTime, Utc};
use reqwest::Url;
use shopfeed_core::CanonicalProduct;

use crate::api::{
    api_page_bound, LazadaCatalog, ShopeeSearch, LAZADA_PAGE_SIZE, SHOPEE_PAGE_SIZE,
};
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::fetch::{BrowserSession, ChromiumSession, PageFetcher, RenderedFetcher, StaticFetcher};
use crate::pagination::{paginate, HtmlPageSource};
use crate::registry;
use crate::template::{ApiBinding, ApiKind, Template};
use crate::urls::query_param;

/// Query parameters a search keyword is read from, in priority order.
const KEYWORD_PARAMS: &[&str] = &["keyword", "q", "search"];

#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    /// Template key, alias or URL. The target URL is used when absent.
    pub template: Option<String>,
    pub url: Option<String>,
    /// Search keyword for API sources; read from the URL when absent.
    pub keyword: Option<String>,
    /// Overrides the template's page bound.
    pub max_pages: Option<usize>,
    /// Use the rendered fetcher even when the template does not need it.
    pub force_render: bool,
}

/// The fetch path that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Api(ApiKind),
    Rendered,
    Static,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Api(kind) => write!(f, "api:{kind}"),
            Strategy::Rendered => write!(f, "rendered"),
            Strategy::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug)]
pub struct ScrapeOutcome {
    pub products: Vec<CanonicalProduct>,
    /// `None` when every attempt came back empty.
    pub strategy: Option<Strategy>,
    pub pages_fetched: usize,
    /// Key of the template used.
    pub template: &'static str,
}

impl ScrapeOutcome {
    fn empty(template: &'static str) -> Self {
        Self {
            products: Vec::new(),
            strategy: None,
            pages_fetched: 0,
            template,
        }
    }
}

pub struct Scraper {
    config: ScraperConfig,
}

impl Scraper {
    #[must_use]
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Resolves the request's template and runs the attempt plan.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingTargetUrl`] when the request has no URL.
    /// - [`ScraperError::InvalidUrl`] when the URL is not absolute http(s).
    /// - [`ScraperError::UnusableTemplate`] when the template lacks container
    ///   or name selectors.
    /// - [`ScraperError::Http`] when an HTTP client cannot be constructed.
    ///
    /// Fetch failures are not errors: they end the attempt with whatever was
    /// collected, and an all-empty plan returns an empty outcome.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeOutcome, ScraperError> {
        let url = target_url(request)?;
        let selector = request
            .template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(url.as_str());
        let template = registry::resolve(selector);
        self.scrape_with_template(template, request).await
    }

    /// Runs the attempt plan with an explicit template.
    ///
    /// # Errors
    ///
    /// Same as [`Scraper::scrape`].
    pub async fn scrape_with_template(
        &self,
        template: Template,
        request: &ScrapeRequest,
    ) -> Result<ScrapeOutcome, ScraperError> {
        self.run::<ChromiumSession>(template, request).await
    }

    async fn run<S: BrowserSession>(
        &self,
        template: Template,
        request: &ScrapeRequest,
    ) -> Result<ScrapeOutcome, ScraperError> {
        let url = target_url(request)?;
        if !template.is_usable() {
            return Err(ScraperError::UnusableTemplate {
                key: template.key.to_owned(),
            });
        }
        let template = match request.max_pages {
            Some(max_pages) => template.with_max_pages(max_pages),
            None => template,
        };
        let keyword = request
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .or_else(|| query_param(&url, KEYWORD_PARAMS));
        let scraped_at = Utc::now();

        tracing::info!(
            template = template.key,
            url = url.as_str(),
            keyword = keyword.as_deref().unwrap_or(""),
            max_pages = template.max_pages,
            "starting scrape"
        );

        if let (Some(api), Some(keyword)) = (template.api.as_ref(), keyword.as_deref()) {
            match self.scrape_api(&template, api, keyword, scraped_at).await {
                Ok(outcome) if !outcome.products.is_empty() => return Ok(finish(outcome)),
                Ok(_) => tracing::warn!(api = %api.kind, "api attempt returned no products, trying html"),
                Err(e) => tracing::warn!(api = %api.kind, error = %e, "api attempt failed, trying html"),
            }
        }

        let outcome = if template.requires_render || request.force_render {
            let fetcher = RenderedFetcher::<S>::new(&template, self.config.render.clone());
            match self
                .scrape_html(fetcher, &template, &url, Strategy::Rendered, scraped_at)
                .await
            {
                Err(ScraperError::BrowserUnavailable { reason }) => {
                    tracing::warn!(%reason, "browser unavailable, falling back to static fetch");
                    self.scrape_static(&template, &url, scraped_at).await?
                }
                other => other?,
            }
        } else {
            self.scrape_static(&template, &url, scraped_at).await?
        };
        Ok(finish(outcome))
    }

    async fn scrape_api(
        &self,
        template: &Template,
        api: &ApiBinding,
        keyword: &str,
        scraped_at: DateTime<Utc>,
    ) -> Result<ScrapeOutcome, ScraperError> {
        let limit = self.config.api_result_limit;
        tracing::info!(api = %api.kind, keyword, limit, "trying api source");

        let (mut products, pages_fetched) = match api.kind {
            ApiKind::ShopeeSearch => {
                let mut source = ShopeeSearch::new(
                    api.endpoint.as_ref(),
                    keyword,
                    self.config.api_timeout_secs,
                    scraped_at,
                )?;
                let session = paginate(
                    &mut source,
                    0,
                    api_page_bound(limit, SHOPEE_PAGE_SIZE),
                    &self.config.shopee_pacing,
                )
                .await?;
                (session.products, session.pages_fetched)
            }
            ApiKind::LazadaCatalog => {
                let mut source = LazadaCatalog::new(
                    api.endpoint.as_ref(),
                    keyword,
                    template.clone(),
                    self.config.api_timeout_secs,
                    scraped_at,
                )?;
                let session = paginate(
                    &mut source,
                    1,
                    api_page_bound(limit, LAZADA_PAGE_SIZE),
                    &self.config.lazada_pacing,
                )
                .await?;
                (session.products, session.pages_fetched)
            }
        };
        products.truncate(limit);

        Ok(ScrapeOutcome {
            products,
            strategy: Some(Strategy::Api(api.kind)),
            pages_fetched,
            template: template.key,
        })
    }

    async fn scrape_static(
        &self,
        template: &Template,
        url: &Url,
        scraped_at: DateTime<Utc>,
    ) -> Result<ScrapeOutcome, ScraperError> {
        let fetcher = StaticFetcher::new(template, self.config.request_timeout_secs)?;
        self.scrape_html(fetcher, template, url, Strategy::Static, scraped_at)
            .await
    }

    async fn scrape_html<F: PageFetcher>(
        &self,
        fetcher: F,
        template: &Template,
        url: &Url,
        strategy: Strategy,
        scraped_at: DateTime<Utc>,
    ) -> Result<ScrapeOutcome, ScraperError> {
        tracing::info!(%strategy, url = url.as_str(), "trying html source");
        let mut source = HtmlPageSource::new(fetcher, template.clone(), scraped_at);
        let session = paginate(
            &mut source,
            url.to_string(),
            template.max_pages,
            &self.config.page_pacing,
        )
        .await?;
        tracing::info!(%strategy, stop = ?session.stop, pages = session.pages_fetched, "html source done");

        Ok(ScrapeOutcome {
            products: session.products,
            strategy: Some(strategy),
            pages_fetched: session.pages_fetched,
            template: template.key,
        })
    }
}

/// Drops the strategy from an outcome with no records.
fn finish(outcome: ScrapeOutcome) -> ScrapeOutcome {
    if outcome.products.is_empty() {
        tracing::warn!(template = outcome.template, "no products found");
        return ScrapeOutcome {
            pages_fetched: outcome.pages_fetched,
            ..ScrapeOutcome::empty(outcome.template)
        };
    }
    tracing::info!(
        template = outcome.template,
        strategy = ?outcome.strategy,
        products = outcome.products.len(),
        pages = outcome.pages_fetched,
        "scrape finished"
    );
    outcome
}

fn target_url(request: &ScrapeRequest) -> Result<Url, ScraperError> {
    let raw = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ScraperError::MissingTargetUrl)?;
    let url = Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
