//! Lazada catalog pages with the listing embedded as JSON in a script tag.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use serde_json::Value;
use shopfeed_core::{CanonicalProduct, ProductDraft};

use super::string_field;
use crate::error::ScraperError;
use crate::extract::extract;
use crate::fetch::{build_client, check_status};
use crate::pagination::{Page, PageSource};
use crate::price::parse_price;
use crate::template::Template;
use crate::urls::{resolve_image_url, resolve_link};

const DEFAULT_GROUP: &str = "Lazada";

static LIST_ITEMS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""listItems"\s*:\s*"#).expect("valid regex"));

static ITEMS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""items"\s*:\s*"#).expect("valid regex"));

static SCRIPT: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("script").ok());

/// Lazada keyword search over catalog pages, paged by page number from 1.
///
/// When a page carries no embedded listing the template's selectors are
/// applied to the markup instead.
pub struct LazadaCatalog {
    client: Client,
    endpoint: String,
    keyword: String,
    template: Template,
    scraped_at: DateTime<Utc>,
}

impl LazadaCatalog {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        keyword: impl Into<String>,
        template: Template,
        timeout_secs: u64,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: build_client(timeout_secs, template.headers)?,
            endpoint: endpoint.into(),
            keyword: keyword.into(),
            template,
            scraped_at,
        })
    }

    fn page_url(&self, page: u32) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| ScraperError::InvalidUrl {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("q", &self.keyword)
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl PageSource for LazadaCatalog {
    type Cursor = u32;

    async fn load(&mut self, page: &u32) -> Result<Page<u32>, ScraperError> {
        let url = self.page_url(*page)?;
        tracing::info!(url = url.as_str(), "fetching lazada catalog page");
        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(response, url.as_str())?;
        let body = response.text().await?;

        let products = parse_catalog_page(&body, &url, &self.template, self.scraped_at);
        let next = (!products.is_empty()).then(|| page + 1);
        Ok(Page { products, next })
    }

    async fn release(&mut self) {}
}

/// Records from the embedded listing, or from the template selectors when
/// the page embeds none.
fn parse_catalog_page(
    body: &str,
    url: &Url,
    template: &Template,
    scraped_at: DateTime<Utc>,
) -> Vec<CanonicalProduct> {
    let document = Html::parse_document(body);
    let items = embedded_items(&document);
    let products: Vec<_> = items
        .iter()
        .filter_map(|item| to_product(item, url, scraped_at))
        .collect();

    if !products.is_empty() {
        tracing::info!(items = items.len(), products = products.len(), "lazada embedded listing");
        return products;
    }

    let products = extract(&document, template, url.as_str(), scraped_at);
    tracing::info!(products = products.len(), "lazada page had no embedded listing, used selectors");
    products
}

/// Items from every script that embeds a `listItems` (or `items`) array.
fn embedded_items(document: &Html) -> Vec<Value> {
    let Some(script) = SCRIPT.as_ref() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for element in document.select(script) {
        let text: String = element.text().collect();
        if !text.contains("listItems") && !text.contains("mods") {
            continue;
        }
        let array = decode_array_after(&text, &LIST_ITEMS_KEY)
            .or_else(|| decode_array_after(&text, &ITEMS_KEY));
        if let Some(array) = array {
            items.extend(array);
        }
    }
    items
}

/// Decodes the JSON array that starts right after the first match of `key`.
///
/// Only the array is consumed; whatever follows it in the script is ignored.
fn decode_array_after(text: &str, key: &Regex) -> Option<Vec<Value>> {
    let start = key.find(text)?.end();
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<Value>>();
    match stream.next()? {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::debug!(error = %e, "embedded listing is not a JSON array");
            None
        }
    }
}

fn to_product(item: &Value, base: &Url, scraped_at: DateTime<Utc>) -> Option<CanonicalProduct> {
    let name = string_field(item, &["name", "title"])?;

    let price = string_field(item, &["price", "priceShow"])
        .map(|raw| parse_price(&raw))
        .unwrap_or_default();
    if price <= Decimal::ZERO {
        return None;
    }
    let old_price = string_field(item, &["originalPrice"])
        .map(|raw| parse_price(&raw))
        .unwrap_or_default();
    let discount_amount = (old_price > price).then(|| (old_price - price).round_dp(2));

    let draft = ProductDraft {
        external_id: string_field(item, &["itemId", "nid"]),
        name,
        unit_price: price,
        discount_amount,
        image_url: string_field(item, &["image", "thumbUrl"])
            .and_then(|raw| resolve_image_url(base, &raw)),
        source_url: string_field(item, &["productUrl", "itemUrl"])
            .and_then(|raw| resolve_link(base, &raw)),
        group_name: Some(
            string_field(item, &["categoryName"]).unwrap_or_else(|| DEFAULT_GROUP.to_owned()),
        ),
    };
    CanonicalProduct::from_draft(draft, scraped_at).ok()
}
