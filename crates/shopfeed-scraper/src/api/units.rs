use rust_decimal::Decimal;

/// Rescales raw prices reported in a source's minor units.
///
/// Values strictly above `threshold` are divided by `divisor`; smaller
/// values are taken to be already in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceUnitRule {
    pub name: &'static str,
    pub threshold: Decimal,
    pub divisor: Decimal,
}

impl PriceUnitRule {
    #[must_use]
    pub fn apply(&self, raw: Decimal) -> Decimal {
        if raw > self.threshold {
            raw.checked_div(self.divisor).unwrap_or(raw).round_dp(2)
        } else {
            raw
        }
    }
}

/// Shopee search prices are integers scaled by 100 000.
///
/// The 10 000 threshold is an assumption carried over from observed
/// responses, not a documented contract: an unscaled price above 10 000 THB
/// would be misread.
pub const SHOPEE_PRICE_UNITS: PriceUnitRule = PriceUnitRule {
    name: "shopee-1e5",
    threshold: Decimal::from_parts(10_000, 0, 0, false, 0),
    divisor: Decimal::from_parts(100_000, 0, 0, false, 0),
};

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn scaled_price_is_divided() {
        assert_eq!(SHOPEE_PRICE_UNITS.apply(dec("159000000")), dec("1590"));
        assert_eq!(SHOPEE_PRICE_UNITS.apply(dec("2950000")), dec("29.5"));
    }

    #[test]
    fn small_price_is_left_alone() {
        assert_eq!(SHOPEE_PRICE_UNITS.apply(dec("350")), dec("350"));
        assert_eq!(SHOPEE_PRICE_UNITS.apply(dec("10000")), dec("10000"));
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(SHOPEE_PRICE_UNITS.apply(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn custom_rule() {
        let cents = PriceUnitRule {
            name: "cents",
            threshold: Decimal::ZERO,
            divisor: Decimal::ONE_HUNDRED,
        };
        assert_eq!(cents.apply(dec("1999")), dec("19.99"));
    }
}
