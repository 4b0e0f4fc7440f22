//! Per-source extraction templates.
//!
//! A [`Template`] is plain data: CSS selector fallback lists for every product
//! field plus the fetch behaviour a source needs (rendering, scrolling, an API
//! binding). Built-in templates live in [`crate::registry`].

use std::borrow::Cow;
use std::time::Duration;

/// Desktop Chrome user agent sent by every fetch strategy.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

pub const THAI_ACCEPT_LANGUAGE: &str = "th-TH,th;q=0.9,en;q=0.8";

/// Default request headers for HTML fetches.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", DESKTOP_USER_AGENT),
    ("Accept-Language", THAI_ACCEPT_LANGUAGE),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
];

pub const DEFAULT_MAX_PAGES: usize = 5;
pub const DEFAULT_SCROLL_PAUSE: Duration = Duration::from_secs(2);

/// Which structured-data source backs a template's API binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    /// Shopee's JSON search endpoint, paged by item offset.
    ShopeeSearch,
    /// Lazada catalog pages with the listing embedded as JSON in a script tag.
    LazadaCatalog,
}

impl std::fmt::Display for ApiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKind::ShopeeSearch => write!(f, "shopee-search"),
            ApiKind::LazadaCatalog => write!(f, "lazada-catalog"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBinding {
    pub kind: ApiKind,
    pub endpoint: Cow<'static, str>,
}

/// Selector and fetch configuration for one source.
///
/// Every selector list is tried left to right and the first element with
/// non-empty text wins. Only `container` and `name_selectors` are required.
#[derive(Debug, Clone)]
pub struct Template {
    pub key: &'static str,
    pub display_name: &'static str,
    /// Grouped selector matching one element per product.
    pub container: &'static str,
    pub id_selectors: &'static [&'static str],
    pub name_selectors: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    pub discount_selectors: &'static [&'static str],
    pub image_selectors: &'static [&'static str],
    pub group_selectors: &'static [&'static str],
    pub next_page_selectors: &'static [&'static str],
    pub max_pages: usize,
    /// Markup is produced client-side and needs a rendered fetch.
    pub requires_render: bool,
    /// When present, the structured-data source is tried before HTML.
    pub api: Option<ApiBinding>,
    /// Selectors awaited (in order, first three only) after navigation.
    pub wait_for: &'static [&'static str],
    pub infinite_scroll: bool,
    pub scroll_pause: Duration,
    pub headers: &'static [(&'static str, &'static str)],
}

impl Template {
    /// Field defaults shared by the built-in table.
    pub const BASE: Template = Template {
        key: "",
        display_name: "",
        container: "",
        id_selectors: &[],
        name_selectors: &[],
        price_selectors: &[],
        discount_selectors: &[],
        image_selectors: &[],
        group_selectors: &[],
        next_page_selectors: &[],
        max_pages: DEFAULT_MAX_PAGES,
        requires_render: false,
        api: None,
        wait_for: &[],
        infinite_scroll: false,
        scroll_pause: DEFAULT_SCROLL_PAUSE,
        headers: DEFAULT_HEADERS,
    };

    /// Returns a copy with a caller-supplied page bound. Zero is raised to one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Returns a copy whose API binding points at `endpoint`.
    ///
    /// Has no effect on templates without an API binding.
    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        if let Some(api) = self.api.as_mut() {
            api.endpoint = Cow::Owned(endpoint.into());
        }
        self
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.container.trim().is_empty()
            && self.name_selectors.iter().any(|s| !s.trim().is_empty())
    }

    /// The `User-Agent` header value, falling back to [`DESKTOP_USER_AGENT`].
    #[must_use]
    pub fn user_agent(&self) -> &'static str {
        self.header("user-agent").unwrap_or(DESKTOP_USER_AGENT)
    }

    #[must_use]
    pub fn accept_language(&self) -> &'static str {
        self.header("accept-language").unwrap_or(THAI_ACCEPT_LANGUAGE)
    }

    fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}
