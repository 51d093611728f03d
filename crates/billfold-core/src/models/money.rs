//! Fixed-point monetary amounts.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::RecordError;
use crate::models::statement::TransactionType;

/// A non-negative monetary magnitude with fixed 2-digit precision.
///
/// Direction (debit vs credit) is never stored here; callers capture it as a
/// [`TransactionType`]. Serializes as a fixed-point decimal string, never a
/// binary float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Validating constructor: rejects negative values, rounds to 2 digits.
    pub fn new(value: Decimal) -> Result<Self, RecordError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecordError::NegativeAmount {
                value: value.to_string(),
            });
        }
        Ok(Self::saturating_from(value))
    }

    /// Clamping constructor used inside the extraction pipelines, which are
    /// total functions: negative inputs become zero.
    pub fn saturating_from(value: Decimal) -> Self {
        let mut v = value.max(Decimal::ZERO).round_dp(2);
        v.rescale(2);
        Money(v)
    }

    /// Split a signed raw amount into magnitude and direction. A negative
    /// sign means debit; zero and positive mean credit.
    pub fn from_signed(value: Decimal) -> (Self, TransactionType) {
        let kind = if value.is_sign_negative() && !value.is_zero() {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        };
        (Self::saturating_from(value.abs()), kind)
    }

    /// Parse from a decimal string, tolerating a currency symbol and
    /// thousands separators. Negative strings are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
        let value = Decimal::from_str(&cleaned).ok()?;
        Self::new(value).ok()
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtraction clamped at zero, for reconciliation arithmetic.
    pub fn saturating_sub(self, rhs: Money) -> Money {
        Money::saturating_from(self.0 - rhs.0)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::saturating_from(self.0 + rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Money::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid money value: {s:?}")))
    }
}
