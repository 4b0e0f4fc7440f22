//! Price and discount text normalization.
//!
//! Storefront price text arrives in many shapes (`฿1,234.50`, `1234 บาท`,
//! `THB 99`, `-20%`). Everything is reduced to [`Decimal`] amounts in the
//! source currency.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static CURRENCY_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[฿$€£¥]").expect("valid regex"));
static CURRENCY_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(บาท|THB|baht)").expect("valid regex"));
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\s]").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid regex"));

/// Extracts the first numeric amount from price text.
///
/// Currency symbols, Thai/English currency words, thousands separators and
/// whitespace are removed first. Returns zero when no number is present.
#[must_use]
pub fn parse_price(text: &str) -> Decimal {
    if text.is_empty() {
        return Decimal::ZERO;
    }
    let cleaned = CURRENCY_SYMBOL_RE.replace_all(text, "");
    let cleaned = CURRENCY_WORD_RE.replace_all(&cleaned, "");
    let cleaned = SEPARATOR_RE.replace_all(&cleaned, "");

    NUMBER_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().trim_end_matches('.').parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Interprets discount text relative to the product's current price.
///
/// Tried in order:
/// 1. a percentage (`20%`, `12.5 %`) of `reference_price`, when the reference
///    is positive;
/// 2. a crossed-out old price above the reference, giving the difference;
/// 3. any other positive amount, taken as a flat discount.
///
/// Computed amounts are rounded to 2 decimal places. Returns `None` when
/// nothing applies or the result is not positive.
#[must_use]
pub fn parse_discount(text: &str, reference_price: Decimal) -> Option<Decimal> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return None;
    }

    if reference_price > Decimal::ZERO {
        let percent = PERCENT_RE
            .captures(cleaned)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<Decimal>().ok());
        if let Some(percent) = percent {
            // Out-of-range figures in scraped text count as no discount.
            return reference_price
                .checked_mul(percent)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .and_then(|amount| positive(amount.round_dp(2)));
        }
    }

    let amount = parse_price(cleaned);
    if amount > reference_price && reference_price > Decimal::ZERO {
        return positive((amount - reference_price).round_dp(2));
    }

    positive(amount)
}

fn positive(amount: Decimal) -> Option<Decimal> {
    (amount > Decimal::ZERO).then_some(amount)
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
