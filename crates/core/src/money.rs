//! Monetary rounding at the output boundary.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every reported amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Round to two decimal places (half away from zero) and pin the scale so the
/// value always serializes as e.g. `"1000.00"`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn pads_whole_numbers() {
        assert_eq!(round_money(dec!(1000)).to_string(), "1000.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_money(dec!(2.344)), dec!(2.34));
    }
}
