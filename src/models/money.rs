use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use crate::error::{Result, StoreError};

/// A currency amount held as integer minor units (pence).
///
/// Summing `Money` never drifts the way repeated `f64` addition does.
/// Arithmetic saturates instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Negative amounts collapse to zero.
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            self
        }
    }

    /// Build from a decimal, rounding to whole pence.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(StoreError::validation(format!(
                "amount must not be negative: {value}"
            )));
        }
        value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|pence| pence.to_i64())
            .map(Self)
            .ok_or_else(|| StoreError::validation(format!("amount out of range: {value}")))
    }

    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(StoreError::validation(format!(
                "amount must be a finite number: {value}"
            )));
        }
        let dec = Decimal::from_f64_retain(value)
            .ok_or_else(|| StoreError::validation(format!("amount out of range: {value}")))?;
        Self::from_decimal(dec)
    }

    /// Parse user input such as `12`, `12.5`, `£12.50`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('£').unwrap_or(trimmed);
        let valid = !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
            && digits.matches('.').count() <= 1
            && digits.split('.').nth(1).map_or(true, |frac| !frac.is_empty() && frac.len() <= 2)
            && digits.chars().next().is_some_and(|c| c.is_ascii_digit());
        if !valid {
            return Err(StoreError::validation(format!("invalid amount: '{input}'")));
        }
        let dec: Decimal = digits
            .parse()
            .map_err(|_| StoreError::validation(format!("invalid amount: '{input}'")))?;
        Self::from_decimal(dec)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// `self / other` as a plain ratio, `None` when `other` is zero.
    pub fn ratio(self, other: Money) -> Option<f64> {
        if other.0 == 0 {
            None
        } else {
            Some(self.0 as f64 / other.0 as f64)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}£{}.{:02}", abs / 100, abs % 100)
    }
}
