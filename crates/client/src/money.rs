//! Money helpers.
//!
//! Amounts stay exact [`Decimal`] values everywhere in the client; rounding to
//! two places happens only when an amount is turned into display text.

use std::num::NonZeroU32;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Line subtotal: unit price times quantity. `None` when the product does
/// not fit a [`Decimal`].
pub fn line_subtotal(unit_price: Decimal, quantity: NonZeroU32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity.get()))
}

/// Sum of line subtotals over `(unit price, quantity)` pairs. `None` on
/// overflow.
pub fn sum_lines<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, NonZeroU32)>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |total, (price, quantity)| {
        total.checked_add(line_subtotal(price, quantity)?)
    })
}

/// Round an amount to two decimal places for display.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats amounts in a single ISO currency.
#[derive(Debug, Clone, Copy)]
pub struct MoneyFormat {
    currency: &'static iso::Currency,
}

impl MoneyFormat {
    /// Look up a formatter by ISO 4217 code, e.g. `"BRL"`.
    pub fn for_code(code: &str) -> Option<Self> {
        iso::find(&code.trim().to_ascii_uppercase()).map(|currency| Self { currency })
    }

    /// ISO code of the configured currency.
    pub fn code(&self) -> &'static str {
        self.currency.iso_alpha_code
    }

    /// Render `amount` rounded to two places with the currency symbol.
    pub fn format(&self, amount: Decimal) -> String {
        Money::from_decimal(round_for_display(amount), self.currency).to_string()
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            currency: iso::BRL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
    }

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        assert_eq!(line_subtotal(Decimal::new(1000, 2), qty(2)), Some(Decimal::new(2000, 2)));
    }

    #[test]
    fn sum_keeps_full_precision() {
        // 3 x 0.333 = 0.999, displayed as 1.00 but never stored rounded.
        let total = sum_lines([(Decimal::new(333, 3), qty(3))]);

        assert_eq!(total, Some(Decimal::new(999, 3)));
        assert_eq!(total.map(round_for_display), Some(Decimal::new(100, 2)));
    }

    #[test]
    fn repeated_partial_display_does_not_drift() {
        let lines = [(Decimal::new(1005, 3), qty(1)); 10];
        let total = sum_lines(lines);

        // 10 x 1.005 = 10.05 exactly, where rounding each line first would give 10.10.
        assert_eq!(total.map(round_for_display), Some(Decimal::new(1005, 2)));
    }

    #[test]
    fn oversized_line_is_none_instead_of_panicking() {
        assert_eq!(line_subtotal(Decimal::MAX, qty(2)), None);
    }

    #[test]
    fn overflowing_sum_is_none() {
        let price = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);

        assert_eq!(sum_lines([(price, qty(1)), (price, qty(1))]), None);
    }

    #[test]
    fn formats_with_currency_and_two_places() {
        let format = MoneyFormat::for_code("usd");

        let rendered = format.map(|format| format.format(Decimal::new(20, 0)));

        assert!(
            rendered.as_deref().is_some_and(|text| text.contains("20.00")),
            "expected 20.00 in {rendered:?}"
        );
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(MoneyFormat::for_code("XXXX").is_none());
    }

    #[test]
    fn default_currency_is_brl() {
        assert_eq!(MoneyFormat::default().code(), DEFAULT_CURRENCY);
    }
}
