use std::{fmt, ops::SubAssign, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger};

/// Signed money amount represented as integer **minor units** (cents).
///
/// Every amount the ledger touches (expense totals, shares, balances,
/// settlement transfers) is a `MoneyCents`, so the zero-sum and reconstruction
/// checks are exact integer comparisons.
///
/// The value is signed:
/// - positive = the group owes the participant
/// - negative = the participant owes the group
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing accepts `.` or `,` as decimal separator and rejects more than two
/// decimals:
///
/// ```rust
/// use ledger::MoneyCents;
///
/// assert_eq!("90".parse::<MoneyCents>().unwrap().cents(), 9000);
/// assert_eq!("33,3".parse::<MoneyCents>().unwrap().cents(), 3330);
/// assert!("33.333".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Splits a non-negative amount into `parts` equal shares, rounding each
    /// share down to the minor unit.
    ///
    /// Returns `(share, remainder)` with `share * parts + remainder == self`
    /// and `0 <= remainder < parts`. Returns `None` when `parts` is zero or the
    /// amount is negative.
    ///
    /// ```rust
    /// use ledger::MoneyCents;
    ///
    /// let (share, rest) = MoneyCents::new(100_00).split_floor(3).unwrap();
    /// assert_eq!(share, MoneyCents::new(33_33));
    /// assert_eq!(rest, MoneyCents::new(1));
    /// ```
    #[must_use]
    pub fn split_floor(self, parts: usize) -> Option<(MoneyCents, MoneyCents)> {
        if parts == 0 || self.0 < 0 {
            return None;
        }
        let parts = i64::try_from(parts).ok()?;
        Some((MoneyCents(self.0 / parts), MoneyCents(self.0 % parts)))
    }

    /// Checked sum over an iterator of amounts.
    pub fn checked_sum<I>(iter: I) -> ResultLedger<MoneyCents>
    where
        I: IntoIterator<Item = MoneyCents>,
    {
        iter.into_iter().try_fold(MoneyCents::ZERO, |acc, value| {
            acc.checked_add(value)
                .ok_or_else(|| LedgerError::Overflow("sum of amounts".to_string()))
        })
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Only used where both sides are known non-negative and `rhs <= self`.
impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl FromStr for MoneyCents {
    type Err = LedgerError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// At most 2 fractional digits are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| LedgerError::InvalidAmount(format!("{reason}: {s:?}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, trimmed[1..].trim_start()),
            Some(b'+') => (false, trimmed[1..].trim_start()),
            _ => (false, trimmed),
        };
        if digits.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (units, fraction) = match digits.split_once(['.', ',']) {
            Some((units, fraction)) => (units, fraction),
            None => (digits, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid("invalid amount"));
        }
        if fraction.len() > 2 {
            return Err(invalid("too many decimals"));
        }

        let units: i64 = units.parse().map_err(|_| invalid("amount too large"))?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("invalid amount"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("invalid amount"))?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(MoneyCents(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(6666).to_string(), "66.66");
        assert_eq!(MoneyCents::new(-3333).to_string(), "-33.33");
        assert_eq!(MoneyCents::new(-5).to_string(), "-0.05");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10.".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<MoneyCents>().is_err());
        assert!("-".parse::<MoneyCents>().is_err());
        assert!(".50".parse::<MoneyCents>().is_err());
        assert!("1.2.3".parse::<MoneyCents>().is_err());
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("1e3".parse::<MoneyCents>().is_err());
        assert!("99999999999999999999".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn split_floor_leaves_remainder_below_parts() {
        let (share, rest) = MoneyCents::new(9000).split_floor(3).unwrap();
        assert_eq!((share.cents(), rest.cents()), (3000, 0));

        let (share, rest) = MoneyCents::new(1).split_floor(4).unwrap();
        assert_eq!((share.cents(), rest.cents()), (0, 1));

        assert!(MoneyCents::new(100).split_floor(0).is_none());
        assert!(MoneyCents::new(-100).split_floor(2).is_none());
    }

    #[test]
    fn checked_sum_reports_overflow() {
        let total = MoneyCents::checked_sum([MoneyCents::new(5), MoneyCents::new(-7)]).unwrap();
        assert_eq!(total, MoneyCents::new(-2));

        let err = MoneyCents::checked_sum([MoneyCents::new(i64::MAX), MoneyCents::new(1)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::Overflow(_)));
    }
}
