use std::{
    fmt,
    ops::Neg,
    str::FromStr,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use thiserror::Error;

/// Errors produced while parsing an [`Amount`] from user input or the wire.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

/// Signed money amount represented as **integer cents**.
///
/// The sign encodes the transaction type:
/// - negative = spending (expense)
/// - zero or positive = income
///
/// On the wire the amount is a plain JSON number in major units (`-42.5`).
///
/// # Examples
///
/// ```rust
/// use api_types::Amount;
///
/// let amount: Amount = "42,50".parse().unwrap();
/// assert_eq!(amount.cents(), 4250);
/// assert_eq!((-amount).to_string(), "-42.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

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
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Magnitude of the amount.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Signs the magnitude of `self` according to `kind`.
    ///
    /// ```rust
    /// use api_types::{Amount, TransactionType};
    ///
    /// let magnitude = Amount::new(1000);
    /// assert_eq!(magnitude.signed(TransactionType::Income).cents(), 1000);
    /// assert_eq!(magnitude.signed(TransactionType::Spending).cents(), -1000);
    /// ```
    #[must_use]
    pub const fn signed(self, kind: TransactionType) -> Self {
        let magnitude = self.0.saturating_abs();
        match kind {
            TransactionType::Income => Self(magnitude),
            TransactionType::Spending => Self(-magnitude),
        }
    }

    /// Formats the amount followed by a currency code, e.g. `-42.50 HKD`.
    pub fn format_with(self, currency: &str) -> String {
        if currency.is_empty() {
            return self.to_string();
        }
        format!("{self} {currency}")
    }

    fn from_major_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::Invalid);
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return Err(AmountError::Overflow);
        }
        Ok(Self(cents as i64))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(self.0.saturating_neg())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// At most 2 fractional digits are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(AmountError::Invalid)?;
        let cents_str = parts.next();
        if parts.next().is_some() {
            return Err(AmountError::Invalid);
        }

        // ".5" is accepted as "0.5"
        let units: i64 = match units_str {
            "" if cents_str.is_some_and(|frac| !frac.is_empty()) => 0,
            "" => return Err(AmountError::Invalid),
            digits if digits.chars().all(|c| c.is_ascii_digit()) => {
                digits.parse().map_err(|_| AmountError::Overflow)?
            }
            _ => return Err(AmountError::Invalid),
        };

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AmountError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| AmountError::Invalid)?,
                    _ => return Err(AmountError::TooManyDecimals),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as number or string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        value
            .checked_mul(100)
            .map(Amount)
            .ok_or_else(|| E::custom(AmountError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        let value = i64::try_from(value).map_err(|_| E::custom(AmountError::Overflow))?;
        self.visit_i64(value)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Amount::from_major_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        value.parse().map_err(E::custom)
    }
}

/// Direction of a money movement, chosen by the user when entering an amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    #[default]
    Spending,
}

impl TransactionType {
    /// Type implied by the sign of a stored amount.
    pub fn of(amount: Amount) -> Self {
        if amount.is_negative() {
            Self::Spending
        } else {
            Self::Income
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Spending => "Spending",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Income => Self::Spending,
            Self::Spending => Self::Income,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(1).to_string(), "0.01");
        assert_eq!(Amount::new(1050).to_string(), "10.50");
        assert_eq!(Amount::new(-4250).to_string(), "-42.50");
        assert_eq!(Amount::new(-4250).format_with("HKD"), "-42.50 HKD");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!(".5".parse::<Amount>().unwrap().cents(), 50);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("-".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("abc".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("12.345".parse::<Amount>(), Err(AmountError::TooManyDecimals));
    }

    #[test]
    fn signed_follows_transaction_type() {
        let magnitude: Amount = "42.50".parse().unwrap();
        assert_eq!(magnitude.signed(TransactionType::Spending).cents(), -4250);
        assert_eq!(magnitude.signed(TransactionType::Income).cents(), 4250);
        assert_eq!((-magnitude).signed(TransactionType::Income).cents(), 4250);
        assert_eq!(TransactionType::of(Amount::new(-1)), TransactionType::Spending);
        assert_eq!(TransactionType::of(Amount::ZERO), TransactionType::Income);
    }

    #[test]
    fn extremes_saturate_instead_of_overflowing() {
        assert_eq!((-Amount::new(i64::MIN)).cents(), i64::MAX);
        assert_eq!(Amount::new(i64::MIN).abs().cents(), i64::MAX);
        assert_eq!(
            Amount::new(i64::MIN).signed(TransactionType::Income).cents(),
            i64::MAX
        );
    }

    #[test]
    fn wire_format_is_a_json_number() {
        let json = serde_json::to_string(&Amount::new(-4250)).unwrap();
        assert_eq!(json, "-42.5");

        let amount: Amount = serde_json::from_str("12.34").unwrap();
        assert_eq!(amount.cents(), 1234);
        let amount: Amount = serde_json::from_str("10").unwrap();
        assert_eq!(amount.cents(), 1000);
        let amount: Amount = serde_json::from_str("\"-3,5\"").unwrap();
        assert_eq!(amount.cents(), -350);
    }
}
