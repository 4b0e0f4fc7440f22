//! Multi-strategy product listing extraction.
//!
//! [`Scraper`] resolves a [`Template`] for a source, then tries its API
//! binding, rendered HTML or static HTML until one yields records.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pacing;
pub mod pagination;
pub mod price;
pub mod registry;
pub mod router;
pub mod template;
pub mod urls;

pub use config::ScraperConfig;
pub use error::ScraperError;
pub use extract::{extract, find_next_page};
pub use fetch::{FetchResult, PageFetcher, StaticFetcher};
pub use pacing::Pacing;
pub use pagination::{paginate, HtmlPageSource, Page, PageSource, ScrapeSession, StopReason};
pub use price::{parse_discount, parse_price};
pub use router::{ScrapeOutcome, ScrapeRequest, Scraper, Strategy};
pub use template::{ApiKind, Template};
