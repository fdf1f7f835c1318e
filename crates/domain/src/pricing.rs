//! Pure cart amount calculation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{CartLine, Money};

/// Computes the chargeable total of a set of cart lines in minor currency
/// units: `sum(unit_price × quantity)`, rounded to two decimals with
/// round-half-up before scaling by 100.
///
/// Returns `None` for an empty input so callers can tell "nothing to
/// charge" apart from a genuine zero total.
pub fn cart_total(lines: &[CartLine]) -> Option<Money> {
    if lines.is_empty() {
        return None;
    }

    let sum: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    let rounded = sum.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let cents = (rounded * Decimal::ONE_HUNDRED).to_i64()?;
    Some(Money::from_cents(cents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Category;

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            category: Category::Pizza,
            name: "Margherita".to_string(),
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn sums_price_times_quantity_into_cents() {
        // 2 × 10.00 = 20.00 → 2000 minor units
        let total = cart_total(&[line(Decimal::new(1000, 2), 2)]).unwrap();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn sums_across_lines() {
        let lines = vec![line(Decimal::new(1050, 2), 2), line(Decimal::new(199, 2), 3)];
        // 21.00 + 5.97 = 26.97
        assert_eq!(cart_total(&lines).unwrap().cents(), 2697);
    }

    #[test]
    fn empty_cart_has_no_amount() {
        assert_eq!(cart_total(&[]), None);
    }

    #[test]
    fn zero_priced_lines_are_a_zero_total_not_absence() {
        let total = cart_total(&[line(Decimal::ZERO, 3)]).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn midpoints_round_half_up() {
        // 3.335 × 3 = 10.005 → 10.01 → 1001 cents
        let total = cart_total(&[line(Decimal::new(3335, 3), 3)]).unwrap();
        assert_eq!(total.cents(), 1001);

        // 0.005 rounds up, not to even
        let total = cart_total(&[line(Decimal::new(5, 3), 1)]).unwrap();
        assert_eq!(total.cents(), 1);
    }

    #[test]
    fn sub_cent_residue_below_the_midpoint_rounds_down() {
        // 1.001 → 1.00
        let total = cart_total(&[line(Decimal::new(1001, 3), 1)]).unwrap();
        assert_eq!(total.cents(), 100);
    }
}
