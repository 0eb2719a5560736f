//! Type-safe price representation using decimal arithmetic.
//!
//! Entities store bare [`Decimal`] amounts (the snapshot format has no
//! currency field); [`Price`] pairs an amount with a currency for display.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., yuan, not fen).
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
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    CNY,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::CNY => "¥",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::from_amount(Decimal::new(12_345, 3));
        assert_eq!(price.to_string(), "¥12.35");
    }

    #[test]
    fn test_times() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD).times(3);
        assert_eq!(price.amount, Decimal::new(5997, 2));
        assert_eq!(price.to_string(), "$59.97");
    }
}
