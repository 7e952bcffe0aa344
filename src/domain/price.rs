//! Fixed-point listing prices.
//!
//! Prices are stored as whole minor units (cents) so that range filters and
//! equality never go through floating point. The wire format is a JSON number
//! with at most two fractional digits.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::error::DomainError;

const MINOR_UNITS: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::validation("price must not be negative"));
        }
        Ok(Self(cents))
    }

    /// Convert a major-unit amount (for example `799.99`) into a price.
    pub fn from_major(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price must not be negative"));
        }

        let cents = (amount * MINOR_UNITS as f64).round();
        if cents > i64::MAX as f64 {
            return Err(DomainError::validation("price exceeds supported range"));
        }
        Ok(Self(cents as i64))
    }

    pub fn whole(units: i64) -> Result<Self, DomainError> {
        units
            .checked_mul(MINOR_UNITS)
            .ok_or_else(|| DomainError::validation("price exceeds supported range"))
            .and_then(Self::from_cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / MINOR_UNITS as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_UNITS, self.0 % MINOR_UNITS)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_major(amount).map_err(de::Error::custom)
    }
}
