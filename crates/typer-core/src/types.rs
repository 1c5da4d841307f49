//! Fixed-point amounts and identifier newtypes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{CAP, CENTI};

/// A ledger quantity in centis (two implied decimal digits).
///
/// Arithmetic is saturating: additions clamp at [`CAP`], subtractions refuse
/// to go negative. Serializes as a string-encoded raw integer so persisted
/// rows never suffer floating-point drift at large magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(CAP);

    /// Construct from raw centis, clamping at the cap.
    pub fn from_raw(raw: u64) -> Self {
        Amount(raw.min(CAP))
    }

    /// Construct from whole units, clamping at the cap.
    pub fn from_units(units: u64) -> Self {
        Amount(units.saturating_mul(CENTI).min(CAP))
    }

    /// Raw value in centis.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Whole units, fractional centis truncated.
    pub fn units(self) -> u64 {
        self.0 / CENTI
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether the value sits at the saturation bound.
    pub fn is_capped(self) -> bool {
        self.0 == CAP
    }

    /// Saturating addition, clamped at [`CAP`].
    #[must_use]
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0).min(CAP))
    }

    /// Subtraction that refuses to go negative.
    #[must_use]
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / CENTI, self.0 % CENTI)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map(Amount::from_raw)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {raw:?}")))
    }
}

/// Chat-platform player identifier (signed 64-bit user id).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
