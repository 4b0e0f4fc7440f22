use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shopfeed_core::{CanonicalProduct, ProductDraft};

use super::{SHOPEE_PAGE_SIZE, SHOPEE_PRICE_UNITS};
use crate::error::ScraperError;
use crate::fetch::{build_client, check_status};
use crate::pagination::{Page, PageSource};
use crate::template::{DESKTOP_USER_AGENT, THAI_ACCEPT_LANGUAGE};

const IMAGE_BASE: &str = "https://down-th.img.susercontent.com/file/";
const PRODUCT_BASE: &str = "https://shopee.co.th/product/";
const DEFAULT_GROUP: &str = "Shopee";

const SEARCH_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", DESKTOP_USER_AGENT),
    ("Accept", "application/json"),
    ("Accept-Language", THAI_ACCEPT_LANGUAGE),
    ("Referer", "https://shopee.co.th/"),
    ("X-Requested-With", "XMLHttpRequest"),
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // The endpoint sends `null` rather than `[]` when nothing matches.
    // Items are decoded one at a time so a single odd entry cannot sink the
    // page.
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    item_basic: Option<ItemBasic>,
    #[serde(flatten)]
    inline: ItemBasic,
}

impl SearchItem {
    fn info(&self) -> &ItemBasic {
        self.item_basic.as_ref().unwrap_or(&self.inline)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ItemBasic {
    itemid: Option<u64>,
    shopid: Option<u64>,
    name: Option<String>,
    price: Option<Decimal>,
    price_before_discount: Option<Decimal>,
    image: Option<String>,
    category_name: Option<String>,
}

/// Shopee keyword search, paged by item offset.
pub struct ShopeeSearch {
    client: Client,
    endpoint: String,
    keyword: String,
    scraped_at: DateTime<Utc>,
}

impl ShopeeSearch {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        keyword: impl Into<String>,
        timeout_secs: u64,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: build_client(timeout_secs, SEARCH_HEADERS)?,
            endpoint: endpoint.into(),
            keyword: keyword.into(),
            scraped_at,
        })
    }
}

#[async_trait]
impl PageSource for ShopeeSearch {
    type Cursor = u32;

    async fn load(&mut self, offset: &u32) -> Result<Page<u32>, ScraperError> {
        let limit = SHOPEE_PAGE_SIZE.to_string();
        let newest = offset.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("keyword", self.keyword.as_str()),
                ("limit", limit.as_str()),
                ("newest", newest.as_str()),
                ("order", "relevancy"),
                ("page_type", "search"),
                ("scenario", "PAGE_GLOBAL_SEARCH"),
                ("version", "2"),
            ])
            .send()
            .await?;
        let response = check_status(response, &self.endpoint)?;
        let body = response.text().await?;
        let parsed = serde_json::from_str::<SearchResponse>(&body).map_err(|source| {
            ScraperError::Deserialize {
                context: format!("shopee search results at offset {offset}"),
                source,
            }
        })?;

        let items = parsed.items.unwrap_or_default();
        let products = decode_items(&items, self.scraped_at);
        tracing::info!(
            offset,
            items = items.len(),
            products = products.len(),
            "shopee search page"
        );

        let next = (!items.is_empty()).then(|| offset + SHOPEE_PAGE_SIZE);
        Ok(Page { products, next })
    }

    async fn release(&mut self) {}
}

fn decode_items(items: &[Value], scraped_at: DateTime<Utc>) -> Vec<CanonicalProduct> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match SearchItem::deserialize(raw) {
            Ok(item) => to_product(item.info(), scraped_at),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed shopee item");
                None
            }
        })
        .collect()
}

fn to_product(info: &ItemBasic, scraped_at: DateTime<Utc>) -> Option<CanonicalProduct> {
    let name = info.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;

    let price = SHOPEE_PRICE_UNITS.apply(info.price.unwrap_or_default());
    let old_price = SHOPEE_PRICE_UNITS.apply(info.price_before_discount.unwrap_or_default());
    let discount_amount =
        (old_price > price && price > Decimal::ZERO).then(|| (old_price - price).round_dp(2));

    let image_url = info
        .image
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(|id| format!("{IMAGE_BASE}{}", id.trim()));
    let source_url = match (info.shopid, info.itemid) {
        (Some(shop), Some(item)) => Some(format!("{PRODUCT_BASE}{shop}/{item}")),
        _ => None,
    };
    let group_name = info
        .category_name
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GROUP.to_owned());

    let draft = ProductDraft {
        external_id: info.itemid.map(|id| id.to_string()),
        name: name.to_owned(),
        unit_price: price,
        discount_amount,
        image_url,
        source_url,
        group_name: Some(group_name),
    };
    match CanonicalProduct::from_draft(draft, scraped_at) {
        Ok(product) => Some(product),
        Err(e) => {
            tracing::debug!(name, error = %e, "dropping shopee item");
            None
        }
    }
}
