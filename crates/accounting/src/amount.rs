//! Non-negative decimal amounts.
//!
//! Amounts are exact decimals (`rust_decimal`), never binary floats, so sums of
//! currency values do not drift.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use ledgerkit_core::{DomainError, DomainResult, ValueObject};

/// A non-negative monetary amount.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wrap a decimal, rejecting negative values.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(DomainError::validation(format!("amount must be non-negative: {value}")));
        }
        Ok(Self(value))
    }

    pub(crate) const fn from_decimal_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// Read a user-entered value the way a form field is read: the longest
    /// numeric prefix counts, anything else contributes zero.
    ///
    /// `"12.50"` → 12.50, `" 7abc"` → 7, `"abc"`/`""`/`"-5"` → 0. Never fails.
    pub fn parse_lenient(input: &str) -> Self {
        let Some(scan) = scan_number(input.trim_start()) else {
            return Self::ZERO;
        };
        scan.to_decimal()
            .and_then(|value| Self::new(value).ok())
            .unwrap_or(Self::ZERO)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Addition clamped at the largest representable amount.
    pub fn saturating_add(self, other: Amount) -> Amount {
        Self(self.0.saturating_add(other.0))
    }

    /// `|self - other|`.
    pub fn abs_diff(self, other: Amount) -> Amount {
        // Both operands are non-negative, so the difference cannot overflow.
        Self((self.0 - other.0).abs())
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// Strict parsing: the whole (trimmed) input must be a non-negative number.
impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        let scan = scan_number(trimmed)
            .filter(|scan| scan.len == trimmed.len())
            .ok_or_else(|| DomainError::validation(format!("not a decimal amount: {trimmed:?}")))?;
        let value = scan
            .to_decimal()
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {trimmed:?}")))?;
        Self::new(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Lenient on the way in: numbers, numeric strings, null and junk are all
/// accepted, junk and null reading as zero.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientAmountVisitor)
    }
}

struct LenientAmountVisitor;

impl<'de> Visitor<'de> for LenientAmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount as a number, string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Ok(Amount::parse_lenient(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(if v < 0 { Amount::ZERO } else { Amount(Decimal::from(v)) })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Ok(Amount::ZERO);
        }
        // Shortest round-trip rendering keeps "99.9995" as written.
        Ok(Amount::parse_lenient(&v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// Numeric prefix of a string: `[+-]digits[.digits][(e|E)[+-]digits]`.
#[derive(Debug)]
struct Scan<'a> {
    negative: bool,
    int: &'a str,
    frac: &'a str,
    exp: Option<&'a str>,
    len: usize,
}

impl Scan<'_> {
    fn to_decimal(&self) -> Option<Decimal> {
        let int = if self.int.is_empty() { "0" } else { self.int };
        let sign = if self.negative { "-" } else { "" };
        let mantissa = if self.frac.is_empty() {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{}", self.frac)
        };
        match self.exp {
            None => Decimal::from_str(&mantissa).ok(),
            Some(exp) => {
                let exp: i32 = exp.parse().ok()?;
                if exp == 0 {
                    Decimal::from_str(&mantissa).ok()
                } else {
                    Decimal::from_scientific(&format!("{mantissa}e{exp}")).ok()
                }
            }
        }
    }
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

fn scan_number(s: &str) -> Option<Scan<'_>> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    pos += count_digits(bytes, pos);
    let int = &s[int_start..pos];

    let mut frac = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_digits = count_digits(bytes, pos + 1);
        if frac_digits > 0 {
            frac = &s[pos + 1..pos + 1 + frac_digits];
            pos += 1 + frac_digits;
        } else if !int.is_empty() {
            // "5." reads as 5 and consumes the dot.
            pos += 1;
        }
    }

    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mut exp = None;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(bytes.get(pos + 1), Some(b'+' | b'-')));
        let exp_digits = count_digits(bytes, pos + 1 + sign_len);
        if exp_digits > 0 {
            exp = Some(&s[pos + 1..pos + 1 + sign_len + exp_digits]);
            pos += 1 + sign_len + exp_digits;
        }
    }

    Some(Scan {
        negative,
        int,
        frac,
        exp,
        len: pos,
    })
}
