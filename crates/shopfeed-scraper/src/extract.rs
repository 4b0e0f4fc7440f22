//! Selector-driven product extraction from parsed HTML.
//!
//! Both entry points are pure: the same document, template and timestamp
//! always yield the same records.

use chrono::{DateTime, Utc};
use reqwest::Url;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use shopfeed_core::{CanonicalProduct, ProductDraft};

use crate::price::{parse_discount, parse_price};
use crate::template::Template;
use crate::urls::{resolve_image_url, resolve_link};

/// Attributes that carry a product identifier when the element has no text.
const ID_ATTRIBUTES: &[&str] = &["data-sku", "data-product-id", "data-item-id"];

/// Image source attributes, covering common lazy-loading conventions.
const IMAGE_ATTRIBUTES: &[&str] = &[
    "src",
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-image",
];

/// Extracts every product container on the page into canonical records.
///
/// Containers with no name or a non-positive price are skipped.
#[must_use]
pub fn extract(
    document: &Html,
    template: &Template,
    page_url: &str,
    scraped_at: DateTime<Utc>,
) -> Vec<CanonicalProduct> {
    let Some(container_selector) = compile(template.container) else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();
    let fields = FieldSelectors::compile(template);

    let mut products = Vec::new();
    let mut skipped = 0usize;
    for container in document.select(&container_selector) {
        match fields.product(container, base.as_ref(), page_url) {
            Some(draft) => match CanonicalProduct::from_draft(draft, scraped_at) {
                Ok(product) => products.push(product),
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(error = %e, "dropping container");
                }
            },
            None => skipped += 1,
        }
    }

    tracing::debug!(
        template = template.key,
        page_url,
        extracted = products.len(),
        skipped,
        "extracted page"
    );
    products
}

/// Finds the next listing page, resolved against `current_url`.
///
/// Links that point back at the current page are passed over. Returns `None`
/// when no next-page selector matches an element with some other navigable
/// `href`.
#[must_use]
pub fn find_next_page(document: &Html, template: &Template, current_url: &str) -> Option<String> {
    let base = Url::parse(current_url).ok()?;
    template
        .next_page_selectors
        .iter()
        .filter_map(|s| compile(s))
        .find_map(|selector| {
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("href"))
                .filter_map(|href| resolve_link(&base, href))
                .find(|next| next != base.as_str())
        })
}

struct FieldSelectors {
    id: Vec<Selector>,
    name: Vec<Selector>,
    price: Vec<Selector>,
    discount: Vec<Selector>,
    image: Vec<Selector>,
    group: Vec<Selector>,
    link: Option<Selector>,
}

impl FieldSelectors {
    fn compile(template: &Template) -> Self {
        let list = |selectors: &[&str]| selectors.iter().filter_map(|s| compile(s)).collect();
        Self {
            id: list(template.id_selectors),
            name: list(template.name_selectors),
            price: list(template.price_selectors),
            discount: list(template.discount_selectors),
            image: list(template.image_selectors),
            group: list(template.group_selectors),
            link: compile("a[href]"),
        }
    }

    fn product(
        &self,
        container: ElementRef<'_>,
        base: Option<&Url>,
        page_url: &str,
    ) -> Option<ProductDraft> {
        let name = first_text(container, &self.name)?;

        let price = first_text(container, &self.price)
            .map(|text| parse_price(&text))
            .unwrap_or_default();
        if price <= Decimal::ZERO {
            tracing::debug!(name = name.as_str(), "container has no positive price");
            return None;
        }

        let discount_amount = first_text(container, &self.discount)
            .and_then(|text| parse_discount(&text, price));

        let image_url = base.and_then(|base| self.image(container, base));
        let source_url = base
            .and_then(|base| self.link(container, base))
            .unwrap_or_else(|| page_url.to_owned());

        Some(ProductDraft {
            external_id: self.identifier(container),
            name,
            unit_price: price,
            discount_amount,
            image_url,
            source_url: Some(source_url),
            group_name: first_text(container, &self.group),
        })
    }

    fn identifier(&self, container: ElementRef<'_>) -> Option<String> {
        first_text(container, &self.id)
            .or_else(|| {
                self.id
                    .iter()
                    .flat_map(|selector| container.select(selector))
                    .find_map(id_attribute)
            })
            .or_else(|| id_attribute(container))
    }

    fn image(&self, container: ElementRef<'_>, base: &Url) -> Option<String> {
        self.image
            .iter()
            .flat_map(|selector| container.select(selector))
            .find_map(|el| {
                IMAGE_ATTRIBUTES
                    .iter()
                    .filter_map(|attr| el.value().attr(attr))
                    .find_map(|src| resolve_image_url(base, src))
            })
    }

    fn link(&self, container: ElementRef<'_>, base: &Url) -> Option<String> {
        let selector = self.link.as_ref()?;
        container
            .select(selector)
            .filter_map(|el| el.value().attr("href"))
            .find_map(|href| resolve_link(base, href))
    }
}

fn compile(selector: &str) -> Option<Selector> {
    let selector = selector.trim();
    if selector.is_empty() {
        return None;
    }
    match Selector::parse(selector) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            tracing::debug!(selector, error = %e, "skipping invalid selector");
            None
        }
    }
}

/// Text of the first element, across the selector list, whose collapsed text
/// is non-empty.
fn first_text(container: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|selector| container.select(selector))
        .map(collapsed_text)
        .find(|text| !text.is_empty())
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn id_attribute(element: ElementRef<'_>) -> Option<String> {
    ID_ATTRIBUTES
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
