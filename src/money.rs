use std::{fmt, iter::Sum};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Amount cannot be missing")]
    AmountRequired,
    #[error("Money cannot be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("Amount too large, would overflow")]
    Overflow,
}

/// Exact, non-negative monetary value.
///
/// Every operation returns a new value; a `Money` never changes once built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// # Panics
    ///
    /// If the sum exceeds [`Decimal::MAX`].
    pub fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    pub fn subtract(self, other: Money) -> Result<Money, MoneyError> {
        Money::new(self.0 - other.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl TryFrom<Option<Decimal>> for Money {
    type Error = MoneyError;

    fn try_from(amount: Option<Decimal>) -> Result<Self, Self::Error> {
        amount.ok_or(MoneyError::AmountRequired).and_then(Money::new)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// # Panics
///
/// If the sum exceeds [`Decimal::MAX`]; see [`Money::checked_add`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::add)
    }
}
