//! Exact money amounts for expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::Error;

/// The number of digits kept after the decimal point.
const SCALE: u32 = 2;

/// The largest amount accepted, in cents.
///
/// Millions of expenses at this size still sum within an `i64`, so SQLite's
/// `SUM` over a day cannot overflow.
pub const MAX_AMOUNT_CENTS: i64 = 999_999_999_999;

/// A non-negative amount of money with exactly two decimal places.
///
/// Amounts are stored in the database as an integer number of cents so that
/// sums computed by SQLite are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// An amount of zero dollars.
    pub const ZERO: Amount = Amount(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Create an amount, rounding to the nearest cent with midpoints rounded
    /// away from zero.
    ///
    /// # Errors
    ///
    /// Returns [Error::NegativeAmount] if `value` is less than zero, or
    /// [Error::InvalidAmount] if it is more than [MAX_AMOUNT_CENTS].
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::NegativeAmount);
        }

        let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.set_sign_positive(true);
        rounded.rescale(SCALE);

        if rounded.mantissa() > i128::from(MAX_AMOUNT_CENTS) {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        Ok(Self(rounded))
    }

    /// Create an amount from a whole number of cents.
    ///
    /// The caller should ensure `cents` is not negative. Only values read
    /// back from the database, which were validated on the way in, should be
    /// passed here.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// The amount as a whole number of cents.
    pub fn cents(&self) -> i64 {
        // `new` and `from_cents` guarantee the mantissa fits and the scale is two.
        self.0.mantissa() as i64
    }

    /// The amount as a float for charting.
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Whether the amount is zero dollars.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The exact decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);

        let value = Decimal::from_str(trimmed).map_err(|_| Error::InvalidAmount(s.to_owned()))?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount::from_cents)
    }
}
