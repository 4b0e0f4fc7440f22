//! Structured-data sources tried before HTML scraping.
//!
//! Both sources are [`PageSource`](crate::pagination::PageSource)s with
//! numeric cursors, so they share the pagination driver with the HTML path.

mod lazada;
mod shopee;
mod units;

use std::time::Duration;

use serde_json::Value;

pub use lazada::LazadaCatalog;
pub use shopee::ShopeeSearch;
pub use units::{PriceUnitRule, SHOPEE_PRICE_UNITS};

pub const SHOPEE_PAGE_SIZE: u32 = 50;
pub const LAZADA_PAGE_SIZE: u32 = 40;

pub const SHOPEE_PAGE_DELAY: Duration = Duration::from_secs(1);
pub const LAZADA_PAGE_DELAY: Duration = Duration::from_millis(1500);

pub const DEFAULT_RESULT_LIMIT: usize = 60;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

/// API runs never load more than this many pages.
const MAX_API_PAGES: usize = 3;

/// Pages needed to reach `limit` results, capped at three.
#[must_use]
pub fn api_page_bound(limit: usize, page_size: u32) -> usize {
    let page_size = usize::try_from(page_size).unwrap_or(usize::MAX).max(1);
    limit.div_ceil(page_size).min(MAX_API_PAGES)
}

/// First non-empty value among `keys`, as a string. Numbers are rendered in
/// their JSON form.
fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn page_bound_rounds_up() {
        assert_eq!(api_page_bound(60, SHOPEE_PAGE_SIZE), 2);
        assert_eq!(api_page_bound(60, LAZADA_PAGE_SIZE), 2);
        assert_eq!(api_page_bound(50, SHOPEE_PAGE_SIZE), 1);
        assert_eq!(api_page_bound(1, LAZADA_PAGE_SIZE), 1);
    }

    #[test]
    fn page_bound_is_capped() {
        assert_eq!(api_page_bound(500, SHOPEE_PAGE_SIZE), 3);
    }

    #[test]
    fn page_bound_zero_limit() {
        assert_eq!(api_page_bound(0, SHOPEE_PAGE_SIZE), 0);
    }

    #[test]
    fn string_field_takes_first_non_empty() {
        let item = json!({"name": "  ", "title": "Stapler", "itemId": 12345});
        assert_eq!(string_field(&item, &["name", "title"]).as_deref(), Some("Stapler"));
        assert_eq!(string_field(&item, &["itemId"]).as_deref(), Some("12345"));
        assert!(string_field(&item, &["missing"]).is_none());
    }
}
