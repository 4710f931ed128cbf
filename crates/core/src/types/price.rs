//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are whole currency units (rupees, not paise) since the demo
/// catalog never quotes fractional prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
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

    /// A whole-rupee price, the catalog's native denomination.
    #[must_use]
    pub fn rupees(amount: i64) -> Self {
        Self::new(Decimal::from(amount), CurrencyCode::INR)
    }

    /// The line total for `quantity` units at this price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.amount * Decimal::from(quantity)
    }
}

/// Renders as the currency symbol followed by the grouped amount:
/// `134900 INR` displays as `₹1,34,900`. Fractions are rounded away since
/// the catalog quotes whole units.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.amount.round();
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let digits = rounded.abs().to_string();
        let grouped = match self.currency_code {
            CurrencyCode::INR => group_indian(&digits),
            CurrencyCode::USD | CurrencyCode::EUR => group_thousands(&digits),
        };
        write!(f, "{sign}{}{grouped}", self.currency_code.symbol())
    }
}

/// Insert commas in the Indian style: the last three digits form one group,
/// everything above groups in twos.
fn group_indian(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let n = chars.len();
    if n <= 3 {
        return digits.to_owned();
    }
    let mut out = String::with_capacity(n + n / 2);
    for (i, c) in chars.iter().enumerate() {
        out.push(*c);
        let remaining = n - i - 1;
        if remaining == 3 || (remaining > 3 && (remaining - 3).is_multiple_of(2)) {
            out.push(',');
        }
    }
    out
}

/// Insert commas every three digits, western style.
fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in chars.iter().enumerate() {
        out.push(*c);
        let remaining = n - i - 1;
        if remaining > 0 && remaining.is_multiple_of(3) {
            out.push(',');
        }
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The display symbol prefixed to formatted amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "\u{20b9}",
            Self::USD => "$",
            Self::EUR => "\u{20ac}",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rupee_prices_multiply_by_quantity() {
        let price = Price::rupees(1000);
        assert_eq!(price.times(2), Decimal::from(2000));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn inr_is_the_default_currency() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
        assert_eq!(CurrencyCode::INR.symbol(), "₹");
    }

    #[test]
    fn display_groups_rupees_in_the_indian_style() {
        assert_eq!(Price::rupees(900).to_string(), "₹900");
        assert_eq!(Price::rupees(1_999).to_string(), "₹1,999");
        assert_eq!(Price::rupees(45_000).to_string(), "₹45,000");
        assert_eq!(Price::rupees(134_900).to_string(), "₹1,34,900");
        assert_eq!(Price::rupees(12_345_678).to_string(), "₹1,23,45,678");
    }

    #[test]
    fn display_groups_dollars_in_threes() {
        let price = Price::new(Decimal::from(1_234_567), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$1,234,567");
    }
}
