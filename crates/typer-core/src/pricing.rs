//! Geometric cost curves.
//!
//! The price of the `(q+1)`-th unit of an item is `base * FACTOR^q`, so a
//! batch of `n` units starting from `q` owned costs the geometric series sum
//! `base * F^q * (F^n - 1) / (F - 1)`.
//!
//! All arithmetic is integer-only with `u128` intermediates and binary
//! exponentiation. Anything that would exceed the representable range clamps
//! to [`CAP`]; the economy saturates, it never errors on overflow.

use crate::constants::{
    BPS_PRECISION, CAP, CENTI, GROWTH_FACTOR_FP, PRICE_PRECISION, RESALE_BPS,
};
use crate::types::Amount;

/// Saturation sentinel for fixed-point powers. Any power at or above this
/// value already prices past `CAP` for every positive base price.
const POW_SAT: u128 = (CAP as u128) * (PRICE_PRECISION as u128);

/// `F - 1` in fixed point.
const FACTOR_MINUS_ONE: u128 = (GROWTH_FACTOR_FP - PRICE_PRECISION) as u128;

/// Fixed-point `FACTOR^exp`, `PRICE_PRECISION`-scaled.
///
/// Binary exponentiation for O(log n) multiplications, saturating at
/// [`POW_SAT`]. Saturation is sound because every remaining factor is >= 1.
fn factor_pow(exp: u64) -> u128 {
    let p = PRICE_PRECISION as u128;
    let mut result = p;
    let mut base = GROWTH_FACTOR_FP as u128;
    let mut e = exp;

    while e > 0 {
        if e & 1 == 1 {
            result = match result.checked_mul(base) {
                Some(v) => v / p,
                None => return POW_SAT,
            };
            if result >= POW_SAT {
                return POW_SAT;
            }
        }
        e >>= 1;
        if e > 0 {
            base = match base.checked_mul(base) {
                Some(v) => v / p,
                None => return POW_SAT,
            };
            if base >= POW_SAT {
                return POW_SAT;
            }
        }
    }
    result
}

/// Geometric series sum in centis: `base_centis * F^q * (F^n - 1) / (F - 1)`.
///
/// `round_up` selects ceiling rounding (purchases); floor favours the house
/// on resale.
fn series_centis(base_centis: u64, owned_units: u64, n: u64, round_up: bool) -> u64 {
    if n == 0 || base_centis == 0 {
        return 0;
    }

    let pow_q = factor_pow(owned_units);
    let pow_n = factor_pow(n);
    let rise = pow_n - PRICE_PRECISION as u128; // F^n - 1, >= 0 since F > 1

    let numerator = match pow_q
        .checked_mul(rise)
        .and_then(|v| v.checked_mul(base_centis as u128))
    {
        Some(v) => v,
        // Overflow past u128 implies a price far beyond CAP.
        None => return CAP,
    };
    let denominator = (PRICE_PRECISION as u128) * FACTOR_MINUS_ONE;

    let price = if round_up {
        numerator.div_ceil(denominator)
    } else {
        numerator / denominator
    };
    price.min(CAP as u128) as u64
}

/// Cost of the next single unit given `owned_units` already owned.
pub fn unit_price(base_units: u64, owned_units: u64) -> Amount {
    price_for_n(base_units, owned_units, 1)
}

/// Total cost to move from `owned_units` to `owned_units + n`, ceiling
/// rounded, clamped at [`CAP`].
pub fn price_for_n(base_units: u64, owned_units: u64, n: u64) -> Amount {
    Amount::from_raw(series_centis(
        base_units.saturating_mul(CENTI),
        owned_units,
        n,
        true,
    ))
}

/// Proceeds from selling `n` of `owned_units` units: the same series over the
/// span being vacated, on the resale-discounted base price, floor rounded.
///
/// Never exceeds the acquisition cost of the same span, and sits strictly
/// below it whenever that cost has not clamped at [`CAP`] (both series clamp
/// to the same bound at saturation).
pub fn sale_value(base_units: u64, owned_units: u64, n: u64) -> Amount {
    let n = n.min(owned_units);
    let resale_centis = (u128::from(base_units.saturating_mul(CENTI)) * u128::from(RESALE_BPS)
        / u128::from(BPS_PRECISION)) as u64;
    Amount::from_raw(series_centis(
        resale_centis,
        owned_units - n,
        n,
        false,
    ))
}

/// Largest `n` such that `price_for_n(base_units, owned_units, n) <= budget`.
///
/// The closed-form series is strictly monotonic in `n`, so the answer is
/// found by bisection over it; this keeps the result exactly consistent with
/// [`price_for_n`] in integer arithmetic. Each unit costs at least the base
/// price, which bounds the search interval by `budget / base`.
pub fn max_affordable(base_units: u64, owned_units: u64, budget: Amount) -> u64 {
    let base_centis = base_units.saturating_mul(CENTI);
    if base_centis == 0 || price_for_n(base_units, owned_units, 1) > budget {
        return 0;
    }

    // Invariants: price(lo) <= budget, price(hi) > budget. The upper bound
    // holds because price(n) >= base_centis * n; if the budget sits at CAP
    // where prices saturate, the bound itself is the answer.
    let mut lo = 1u64;
    let mut hi = budget.raw() / base_centis + 1;
    if price_for_n(base_units, owned_units, hi) <= budget {
        return hi;
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if price_for_n(base_units, owned_units, mid) <= budget {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- factor_pow ---

    #[test]
    fn pow_zero_is_one() {
        assert_eq!(factor_pow(0), PRICE_PRECISION as u128);
    }

    #[test]
    fn pow_one_is_factor() {
        assert_eq!(factor_pow(1), GROWTH_FACTOR_FP as u128);
    }

    #[test]
    fn pow_squares_correctly() {
        // 1.1^2 = 1.21
        assert_eq!(factor_pow(2), 1_210_000_000);
    }

    #[test]
    fn pow_saturates_on_huge_exponents() {
        assert_eq!(factor_pow(u64::MAX), POW_SAT);
        assert_eq!(factor_pow(1_000_000), POW_SAT);
    }

    // --- price_for_n ---

    #[test]
    fn first_unit_costs_base_price() {
        assert_eq!(price_for_n(10, 0, 1), Amount::from_units(10));
    }

    #[test]
    fn second_unit_costs_base_times_factor() {
        // 10 * 1.1 = 11
        assert_eq!(price_for_n(10, 1, 1), Amount::from_units(11));
    }

    #[test]
    fn two_units_from_scratch() {
        // 10 + 11 = 21
        assert_eq!(price_for_n(10, 0, 2), Amount::from_units(21));
    }

    #[test]
    fn zero_quantity_is_free() {
        assert_eq!(price_for_n(10, 5, 0), Amount::ZERO);
    }

    #[test]
    fn price_saturates_at_cap() {
        assert_eq!(price_for_n(10_000, 10_000, 10_000), Amount::MAX);
    }

    #[test]
    fn price_monotonic_in_owned() {
        let a = price_for_n(100, 0, 5);
        let b = price_for_n(100, 1, 5);
        assert!(b > a);
    }

    // --- sale_value ---

    #[test]
    fn resale_below_purchase_price() {
        for owned in [1u64, 5, 50] {
            let bought = price_for_n(10, 0, owned);
            let sold = sale_value(10, owned, owned);
            assert!(sold < bought, "resale {sold} >= purchase {bought}");
        }
    }

    #[test]
    fn resale_matches_purchase_only_at_the_cap() {
        // 500 units of base 10 price far past CAP: both series clamp to the
        // same bound, so the no-profit property is non-strict here.
        let bought = price_for_n(10, 0, 500);
        let sold = sale_value(10, 500, 500);
        assert_eq!(bought, Amount::MAX);
        assert!(sold <= bought);
    }

    #[test]
    fn resale_discount_survives_huge_bases() {
        assert!(sale_value(u64::MAX, 1, 1) <= Amount::MAX);
        assert!(sale_value(u64::MAX / CENTI, 10, 10) <= Amount::MAX);
    }

    #[test]
    fn sale_clamps_to_owned() {
        assert_eq!(sale_value(10, 3, 100), sale_value(10, 3, 3));
    }

    #[test]
    fn sale_of_nothing_is_zero() {
        assert_eq!(sale_value(10, 0, 5), Amount::ZERO);
        assert_eq!(sale_value(10, 5, 0), Amount::ZERO);
    }

    // --- max_affordable ---

    #[test]
    fn affordable_zero_when_broke() {
        assert_eq!(max_affordable(10, 0, Amount::ZERO), 0);
        assert_eq!(max_affordable(10, 0, Amount::from_units(9)), 0);
    }

    #[test]
    fn affordable_exact_base_price() {
        assert_eq!(max_affordable(10, 0, Amount::from_units(10)), 1);
        // 10 + 11 = 21 buys exactly two.
        assert_eq!(max_affordable(10, 0, Amount::from_units(21)), 2);
        assert_eq!(max_affordable(10, 0, Amount::from_units(20)), 1);
    }

    proptest! {
        #[test]
        fn affordable_is_consistent_with_price(
            base in 1u64..=10_000,
            owned in 0u64..=500,
            budget_units in 0u64..=100_000_000,
        ) {
            let budget = Amount::from_units(budget_units);
            let n = max_affordable(base, owned, budget);
            prop_assert!(price_for_n(base, owned, n) <= budget);
            prop_assert!(price_for_n(base, owned, n + 1) > budget);
        }

        #[test]
        fn batch_equals_sum_of_unit_prices(
            base in 1u64..=1_000,
            owned in 0u64..=200,
            n in 0u64..=50,
        ) {
            let batch = price_for_n(base, owned, n).raw();
            let mut unit_sum: u64 = 0;
            for i in 0..n {
                unit_sum += price_for_n(base, owned + i, 1).raw();
            }
            // Tolerance: one centi of ceiling rounding per unit plus the
            // relative truncation error of the fixed-point powers.
            let slack = n + batch / 10_000_000 + 1;
            let diff = unit_sum.abs_diff(batch);
            prop_assert!(diff <= slack, "batch {batch} vs unit sum {unit_sum}");
        }

        #[test]
        fn sell_then_buy_back_never_profits(
            base in 1u64..=10_000,
            owned in 1u64..=500,
            n in 1u64..=500,
        ) {
            let n = n.min(owned);
            let proceeds = sale_value(base, owned, n);
            let buy_back = price_for_n(base, owned - n, n);
            prop_assert!(proceeds <= buy_back);
            // Strict whenever the purchase side has not clamped.
            if buy_back < Amount::MAX {
                prop_assert!(proceeds < buy_back);
            }
        }

        #[test]
        fn prices_never_exceed_cap(
            base in 1u64..=u32::MAX as u64,
            owned in 0u64..=u32::MAX as u64,
            n in 0u64..=u32::MAX as u64,
        ) {
            prop_assert!(price_for_n(base, owned, n) <= Amount::MAX);
            prop_assert!(sale_value(base, owned, n) <= Amount::MAX);
        }
    }
}
