use anyhow::bail;
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::Add,
    str::FromStr,
};

/// Represents an amount of money in USD currency.
///
/// The amount is stored internally as an integer number of cents, so sums are
/// exact, but the [`Display`] implementation formats it as dollars to 2
/// decimal places.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(i64);

impl Usd {
    /// Returns the amount in dollars, for writing to spreadsheet cells.
    #[must_use]
    pub fn dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Adds `rhs`, or returns `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Divides the amount by a count, rounding half up to the nearest cent.
    ///
    /// Days with no clicks or leads are normal, so a zero `count` gives zero
    /// rather than an error.
    ///
    /// ```
    /// # use adreport::Usd;
    /// let spent: Usd = "10.00".parse().unwrap();
    /// assert_eq!(spent.per(3), "3.33".parse::<Usd>().unwrap());
    /// assert_eq!(spent.per(0), Usd::default());
    /// ```
    #[must_use]
    pub fn per(self, count: u64) -> Self {
        if count == 0 {
            return Self::default();
        }
        let count = i128::from(count);
        Self(((i128::from(self.0) * 2 + count) / (count * 2)) as i64)
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s.trim().replace(',', "");
        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        if whole.is_empty() && frac.is_empty() {
            bail!("invalid amount {s:?}: no digits");
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            bail!("invalid amount {s:?}: expected a non-negative decimal number");
        }
        if frac.len() > 2 {
            bail!("invalid amount {s:?}: more than two decimal places");
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse()? };
        let cents: i64 = format!("{frac:0<2}").parse()?;
        let Some(total) = whole.checked_mul(100).and_then(|c| c.checked_add(cents)) else {
            bail!("invalid amount {s:?}: too large");
        };
        Ok(Self(total))
    }
}

impl Add for Usd {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_fn_accepts_export_amount_formats() {
        assert_eq!(Usd::from_str("12.34").unwrap(), Usd(1234));
        assert_eq!(Usd::from_str("12.3").unwrap(), Usd(1230));
        assert_eq!(Usd::from_str("100").unwrap(), Usd(10_000));
        assert_eq!(Usd::from_str("1,409.15").unwrap(), Usd(140_915));
        assert_eq!(Usd::from_str(".5").unwrap(), Usd(50));
        assert_eq!(Usd::from_str(" 7.05 ").unwrap(), Usd(705));
    }

    #[test]
    fn from_str_fn_rejects_malformed_amounts() {
        for bad in ["", ".", "abc", "-5.00", "1.234", "1.2.3", "$4"] {
            assert!(Usd::from_str(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn from_str_fn_returns_error_for_amount_too_large() {
        assert!(Usd::from_str("100000000000000000").is_err());
        assert!(Usd::from_str("92233720368547758.08").is_err());
        assert_eq!(
            Usd::from_str("92233720368547758.07").unwrap(),
            Usd(i64::MAX)
        );
    }

    #[test]
    fn checked_add_fn_detects_overflow() {
        assert_eq!(Usd(1).checked_add(Usd(2)), Some(Usd(3)));
        assert_eq!(Usd(i64::MAX).checked_add(Usd(1)), None);
    }

    #[test]
    fn display_fn_formats_as_dollars_and_cents() {
        assert_eq!(Usd(140_915).to_string(), "1409.15");
        assert_eq!(Usd(5).to_string(), "0.05");
        assert_eq!(Usd::default().to_string(), "0.00");
    }

    #[test]
    fn per_fn_rounds_half_up_to_nearest_cent() {
        assert_eq!(Usd(1000).per(3), Usd(333));
        assert_eq!(Usd(1000).per(6), Usd(167));
        assert_eq!(Usd(5).per(2), Usd(3));
        assert_eq!(Usd(10_000).per(10), Usd(1000));
    }

    #[test]
    fn per_fn_returns_zero_for_zero_count() {
        assert_eq!(Usd(10_000).per(0), Usd::default());
        assert_eq!(Usd::default().per(0), Usd::default());
    }

    #[test]
    fn sum_fn_adds_amounts_exactly() {
        let total: Usd = ["0.10", "0.20", "0.70"]
            .iter()
            .map(|s| Usd::from_str(s).unwrap())
            .sum();
        assert_eq!(total, Usd(100));
    }
}
