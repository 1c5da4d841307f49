//! Economy constants. All ledger quantities in centis (1 unit = 100 centis).

/// Centis per whole unit (two implied decimal digits).
pub const CENTI: u64 = 100;

/// Saturation bound for every ledger counter, in centis (10^16 whole units).
///
/// Shared by pricing, the ledger, and display formatting: a computed price
/// clamps to `CAP` instead of overflowing and a balance saturates at `CAP`
/// instead of wrapping.
pub const CAP: u64 = 1_000_000_000_000_000_000;

/// Fixed-point denominator for the price growth factor.
pub const PRICE_PRECISION: u64 = 1_000_000_000;

/// Geometric growth factor per owned unit (1.1), `PRICE_PRECISION`-scaled.
pub const GROWTH_FACTOR_FP: u64 = 1_100_000_000;

/// Resale fraction of the base price, in basis points (77%).
pub const RESALE_BPS: u64 = 7_700;
pub const BPS_PRECISION: u64 = 10_000;

/// Fixed-point denominator for per-unit-per-tick yield rates.
pub const RATE_PRECISION: u64 = 1_000_000_000;

/// Sub-centi accrual carry scale: `RATE_PRECISION` fractions per centi.
pub const SUB_CENTI: u64 = RATE_PRECISION / CENTI;

/// Passive accrual interval.
pub const TICK_INTERVAL_SECS: u64 = 1;

/// Interactive actions admitted before a cooldown episode starts.
pub const COOLDOWN_ACTION_LIMIT: u32 = 100;

/// Length of a cooldown episode, in ticks.
pub const COOLDOWN_PENALTY_TICKS: u32 = 3;

/// Milestone achievements cover the powers of ten in
/// `[MILESTONE_MIN, MILESTONE_MAX]`, in whole units.
pub const MILESTONE_MIN: u64 = 10;
pub const MILESTONE_MAX: u64 = 10_000_000;

/// Whole messages credited per accepted chat message, folded into the next
/// accrual tick.
pub const CHAT_REWARD_UNITS: u64 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_factor_exceeds_one() {
        assert!(GROWTH_FACTOR_FP > PRICE_PRECISION);
    }

    #[test]
    fn resale_fraction_below_one() {
        assert!(RESALE_BPS < BPS_PRECISION);
    }

    #[test]
    fn cap_is_whole_units() {
        assert_eq!(CAP % CENTI, 0);
    }

    #[test]
    fn sub_centi_scale() {
        assert_eq!(SUB_CENTI * CENTI, RATE_PRECISION);
    }

    #[test]
    fn milestone_bounds_are_powers_of_ten() {
        for bound in [MILESTONE_MIN, MILESTONE_MAX] {
            let mut v = bound;
            while v % 10 == 0 {
                v /= 10;
            }
            assert_eq!(v, 1, "{bound} is not a power of ten");
        }
        assert!(MILESTONE_MIN < MILESTONE_MAX);
    }
}
