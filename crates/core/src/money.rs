use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as `"<symbol> <amount>"` with exactly two decimals.
pub fn format_price(amount: Decimal, currency_symbol: &str) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{currency_symbol} {rounded}")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::format_price;

    fn amount(raw: &str) -> Decimal {
        Decimal::from_str(raw).expect("valid decimal literal")
    }

    #[test]
    fn pads_to_two_decimals() {
        assert_eq!(format_price(amount("19.9"), "R$"), "R$ 19.90");
        assert_eq!(format_price(amount("7"), "R$"), "R$ 7.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_price(amount("10.005"), "R$"), "R$ 10.01");
        assert_eq!(format_price(amount("10.004"), "R$"), "R$ 10.00");
    }

    #[test]
    fn zero_price_is_rendered() {
        assert_eq!(format_price(Decimal::ZERO, "US$"), "US$ 0.00");
    }
}
