//! Byte quantities.
//!
//! [`ByteQuantity`] is the unit-carrying value used for every size in the
//! model: heap sizes, word sizes, segment spans and buffer capacities.
//! Arithmetic keeps the unit straight:
//!
//! | Expression | Result |
//! |---|---|
//! | `ByteQuantity + ByteQuantity` | `ByteQuantity` |
//! | `ByteQuantity - ByteQuantity` | `ByteQuantity` |
//! | `ByteQuantity * u64` | `ByteQuantity` |
//! | `ByteQuantity / ByteQuantity` | `f64` (dimensionless ratio) |
//! | `ByteQuantity / u64` | `ByteQuantity` (floor) |
//!
//! Whole-number quotients of two quantities are available through
//! [`ByteQuantity::div_floor`] and [`ByteQuantity::div_ceil`].

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, ModelResult};

/// Binary units tried by [`ByteQuantity::format`], largest first.
const UNITS: [(u64, &str); 4] = [
    (1 << 40, "TiB"),
    (1 << 30, "GiB"),
    (1 << 20, "MiB"),
    (1 << 10, "KiB"),
];

/// A non-negative count of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ByteQuantity(u64);

impl ByteQuantity {
    /// Zero bytes.
    pub const ZERO: Self = Self(0);

    /// Create a quantity of `bytes` bytes.
    #[inline]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Create a quantity from a bit count.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidBitCount`] if `bits` is not a multiple of 8.
    pub fn from_bit_count(bits: u64) -> ModelResult<Self> {
        if bits % 8 != 0 {
            return Err(ModelError::InvalidBitCount { bits });
        }
        Ok(Self(bits / 8))
    }

    /// Raw byte count.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true for zero bytes.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Number of whole `rhs` that fit in `self`.
    ///
    /// Panics if `rhs` is zero, as integer division does.
    #[inline]
    pub const fn div_floor(self, rhs: Self) -> u64 {
        self.0 / rhs.0
    }

    /// Number of `rhs` needed to cover `self`.
    ///
    /// Panics if `rhs` is zero, as integer division does.
    #[inline]
    pub const fn div_ceil(self, rhs: Self) -> u64 {
        self.0.div_ceil(rhs.0)
    }

    /// Subtraction that returns `None` instead of going negative.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Addition that returns `None` on overflow.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Scalar multiplication that returns `None` on overflow.
    #[inline]
    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Scalar multiplication clamped at the largest representable quantity.
    #[inline]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// Human-readable rendering in the largest binary unit whose magnitude is
    /// at least one.
    ///
    /// Unit forms print `precision` decimals right-aligned in
    /// `max(width - 4, 1)` columns followed by the unit. Quantities below one
    /// KiB print as an integer right-aligned in `max(width - 6, 1)` columns
    /// followed by `bytes`. Either way the result is `width` columns wide when
    /// the number fits.
    ///
    /// ```
    /// use cnet_common::bytes::ByteQuantity;
    ///
    /// assert_eq!(ByteQuantity::new(1536).format(1, 1), "1.5 KiB");
    /// assert_eq!(ByteQuantity::new(10).format(1, 1), "10 bytes");
    /// assert_eq!(ByteQuantity::new(4096).format(8, 1), " 4.0 KiB");
    /// ```
    pub fn format(&self, width: usize, precision: usize) -> String {
        for (scale, unit) in UNITS {
            if self.0 >= scale {
                let width = width.saturating_sub(4).max(1);
                let magnitude = self.0 as f64 / scale as f64;
                return format!("{magnitude:>width$.precision$} {unit}");
            }
        }
        let width = width.saturating_sub(6).max(1);
        format!("{:>width$} bytes", self.0)
    }
}

/// Forwards the formatter's width and precision to [`ByteQuantity::format`],
/// defaulting to width 1 and precision 1: `{}` gives `1.5 KiB`, `{:8}` pads,
/// `{:.0}` drops the decimals.
impl fmt::Display for ByteQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format(f.width().unwrap_or(1), f.precision().unwrap_or(1));
        f.write_str(&text)
    }
}

// ─── Arithmetic ─────────────────────────────────────────────────────

impl Add for ByteQuantity {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for ByteQuantity {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Panics on underflow in debug builds, as integer subtraction does. Use
/// [`ByteQuantity::checked_sub`] when the result may go negative.
impl Sub for ByteQuantity {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u64> for ByteQuantity {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: u64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Mul<ByteQuantity> for u64 {
    type Output = ByteQuantity;

    #[inline]
    fn mul(self, rhs: ByteQuantity) -> ByteQuantity {
        rhs * self
    }
}

impl Div for ByteQuantity {
    type Output = f64;

    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.0 as f64 / rhs.0 as f64
    }
}

impl Div<u64> for ByteQuantity {
    type Output = Self;

    #[inline]
    fn div(self, rhs: u64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Sum for ByteQuantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a ByteQuantity> for ByteQuantity {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Parses `"4096"`, `"4096 bytes"`, `"4 KiB"`, `"32MiB"`, `"1.5 GiB"`.
///
/// Only binary units are accepted and the result must be a whole number of
/// bytes.
impl FromStr for ByteQuantity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidByteQuantity {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let text = s.trim();
        let split = text
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (number, unit) = (text[..split].trim(), text[split..].trim());
        if number.is_empty() {
            return Err(invalid("missing number"));
        }

        let scale = match unit.to_ascii_lowercase().as_str() {
            "" | "b" | "byte" | "bytes" => 1,
            "kib" => 1 << 10,
            "mib" => 1 << 20,
            "gib" => 1 << 30,
            "tib" => 1 << 40,
            _ => return Err(invalid("unknown unit (expected bytes, KiB, MiB, GiB or TiB)")),
        };

        if let Ok(whole) = number.parse::<u64>() {
            return whole
                .checked_mul(scale)
                .map(Self)
                .ok_or_else(|| invalid("too large"));
        }

        let value: f64 = number.parse().map_err(|_| invalid("not a number"))?;
        let bytes = value * scale as f64;
        if !bytes.is_finite() || bytes < 0.0 {
            return Err(invalid("must be a non-negative finite size"));
        }
        if bytes.fract() != 0.0 {
            return Err(invalid("not a whole number of bytes"));
        }
        if bytes >= u64::MAX as f64 {
            return Err(invalid("too large"));
        }
        Ok(Self(bytes as u64))
    }
}

/// Accepts either a plain integer byte count or a string understood by
/// [`FromStr`], so TOML can say `heap = 1073741824` or `heap = "1 GiB"`.
impl<'de> Deserialize<'de> for ByteQuantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bytes(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bytes(bytes) => Ok(Self(bytes)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
