use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Category tag attached to every record sent to the catalog import endpoint.
pub const IMPORT_CATEGORY: &str = "GOODS";

/// Unit label attached to every imported record ("piece").
pub const IMPORT_UNIT: &str = "ชิ้น";

const SKU_MAX_CHARS: usize = 50;
const NAME_MAX_CHARS: usize = 200;

/// Field values gathered for one listing before validation.
///
/// Extractors and API sources fill a draft and hand it to
/// [`CanonicalProduct::from_draft`], which enforces the record invariants.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub external_id: Option<String>,
    pub name: String,
    pub unit_price: Decimal,
    pub discount_amount: Option<Decimal>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub group_name: Option<String>,
}

/// A product listing normalized from any source.
///
/// Serializes with camelCase keys; this untransformed form is what gets
/// written when raw scrape output is saved for debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Source-specific product code (SKU, item id).
    pub external_id: Option<String>,
    /// Display name, trimmed and never empty.
    pub name: String,
    /// Unit price in the source currency, always `> 0`.
    pub unit_price: Decimal,
    /// Absolute discount in currency units, `> 0` when present.
    pub discount_amount: Option<Decimal>,
    pub image_url: Option<String>,
    /// Product detail page, or the listing page when no per-item link exists.
    pub source_url: Option<String>,
    /// Set once per scrape pass; every record of a pass shares it.
    pub scraped_at: DateTime<Utc>,
    pub group_name: Option<String>,
}

impl CanonicalProduct {
    /// Validates a draft and builds the canonical record.
    ///
    /// Optional string fields are trimmed and blank values become `None`.
    /// A zero or negative discount is treated as "no discount".
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyName`] if the name is blank after trimming.
    /// - [`CoreError::NonPositivePrice`] if the unit price is `<= 0`.
    pub fn from_draft(draft: ProductDraft, scraped_at: DateTime<Utc>) -> Result<Self, CoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        if draft.unit_price <= Decimal::ZERO {
            return Err(CoreError::NonPositivePrice(draft.unit_price));
        }

        Ok(Self {
            external_id: non_blank(draft.external_id),
            name: name.to_owned(),
            unit_price: draft.unit_price,
            discount_amount: draft.discount_amount.filter(|d| *d > Decimal::ZERO),
            image_url: non_blank(draft.image_url),
            source_url: non_blank(draft.source_url),
            scraped_at,
            group_name: non_blank(draft.group_name),
        })
    }

    /// Converts the record into the catalog import payload.
    #[must_use]
    pub fn to_import_payload(&self) -> ImportPayload {
        ImportPayload {
            sku: self
                .external_id
                .as_deref()
                .map(|id| truncate_chars(id.trim(), SKU_MAX_CHARS)),
            name: truncate_chars(self.name.trim(), NAME_MAX_CHARS),
            unit_price: self.unit_price.round_dp(2).max(Decimal::ZERO),
            discount: self
                .discount_amount
                .filter(|d| !d.is_zero())
                .map(|d| d.round_dp(2)),
            image_url: self.image_url.clone(),
            source_url: self.source_url.clone(),
            scraped_at: self.scraped_at,
            group_name: self.group_name.clone(),
            category: IMPORT_CATEGORY,
            unit: IMPORT_UNIT,
            is_active: true,
        }
    }
}

/// One product as posted to the catalog service's bulk import endpoint.
///
/// Prices are sent as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    pub sku: Option<String>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub group_name: Option<String>,
    pub category: &'static str,
    pub unit: &'static str,
    pub is_active: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
