//! Number formatting for the presentation layer.
//!
//! Shares the economy's scaled-integer representation so displayed values
//! can never drift from the ledger.

use crate::constants::{CENTI, RATE_PRECISION};
use crate::types::Amount;

/// Metric-style suffixes by group of three digits.
const SUFFIXES: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Whole units with apostrophe digit grouping: `1234567` → `1'234'567`.
pub fn grouped(amount: Amount) -> String {
    let digits = amount.units().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push('\'');
        }
        out.push(c);
    }
    out
}

/// Short form with a metric suffix: `1_234_567` units → `1.23M`.
pub fn short(amount: Amount) -> String {
    let units = amount.units();
    if units < 1000 {
        return units.to_string();
    }
    let group = (units.ilog10() / 3) as usize;
    let group = group.min(SUFFIXES.len() - 1);
    let scale = 10u64.pow(3 * group as u32);
    let whole = units / scale;
    let frac = units % scale * 100 / scale;
    if frac == 0 {
        format!("{whole}{}", SUFFIXES[group])
    } else {
        let num = format!("{whole}.{frac:02}");
        let num = num.trim_end_matches('0').trim_end_matches('.');
        format!("{num}{}", SUFFIXES[group])
    }
}

/// A `RATE_PRECISION`-scaled per-tick rate as a decimal string, five
/// fractional digits, trailing zeros trimmed.
pub fn rate(rate_fp: u128) -> String {
    let p = RATE_PRECISION as u128;
    let whole = rate_fp / p;
    let frac = (rate_fp % p) * 100_000 / p;
    if frac == 0 {
        format!("{whole}")
    } else {
        format!("{whole}.{frac:05}")
            .trim_end_matches('0')
            .to_string()
    }
}

/// Exact two-decimal form of an amount.
pub fn exact(amount: Amount) -> String {
    format!("{}.{:02}", amount.raw() / CENTI, amount.raw() % CENTI)
}
