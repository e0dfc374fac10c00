//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display, e.g. `$1,250.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format_price(self.amount, self.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Format an amount with the currency symbol, two decimals and thousands
/// separators.
///
/// ```
/// use maison_core::{CurrencyCode, format_price};
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Decimal::new(125_000, 2), CurrencyCode::USD), "$1,250.00");
/// assert_eq!(format_price(Decimal::new(-5, 1), CurrencyCode::GBP), "-£0.50");
/// ```
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{}{grouped}.{cents}", currency.symbol())
}

/// Whole-number percentage saved when `sale_price` replaces `price`.
///
/// Returns `None` when there is no saving (missing sale price, sale price at
/// or above list price, or a non-positive list price).
#[must_use]
pub fn discount_percent(price: Decimal, sale_price: Option<Decimal>) -> Option<u32> {
    let sale = sale_price?;
    if price <= Decimal::ZERO || sale >= price {
        return None;
    }

    let percent = ((price - sale) / price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    percent.to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Decimal::new(0, 0), CurrencyCode::USD), "$0.00");
        assert_eq!(format_price(Decimal::new(999, 0), CurrencyCode::USD), "$999.00");
        assert_eq!(format_price(Decimal::new(1000, 0), CurrencyCode::USD), "$1,000.00");
        assert_eq!(
            format_price(Decimal::new(123_456_789, 2), CurrencyCode::EUR),
            "€1,234,567.89"
        );
    }

    #[test]
    fn test_format_price_rounds_half_away_from_zero() {
        assert_eq!(format_price(Decimal::new(10_005, 3), CurrencyCode::USD), "$10.01");
    }

    #[test]
    fn test_price_display() {
        let price = Price::usd(Decimal::new(4_950, 2));
        assert_eq!(price.to_string(), "$49.50");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(
            discount_percent(Decimal::new(200, 0), Some(Decimal::new(150, 0))),
            Some(25)
        );
        assert_eq!(
            discount_percent(Decimal::new(300, 0), Some(Decimal::new(199, 0))),
            Some(34)
        );
    }

    #[test]
    fn test_discount_percent_none_without_saving() {
        assert_eq!(discount_percent(Decimal::new(100, 0), None), None);
        assert_eq!(
            discount_percent(Decimal::new(100, 0), Some(Decimal::new(100, 0))),
            None
        );
        assert_eq!(
            discount_percent(Decimal::ZERO, Some(Decimal::new(-1, 0))),
            None
        );
    }
}
