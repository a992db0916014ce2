//! The [`MeshCode`] value type and its resolution tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::MeshError;

/// Number of digits of the finest supported tier.
pub const MAX_DIGITS: u32 = 8;

/// Resolution tier of a mesh code, identified by its digit count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MeshTier {
    /// 4 digits, 1 deg of longitude by 40' of latitude.
    First,
    /// 6 digits, an 8x8 subdivision of a 1st-order cell.
    Second,
    /// 8 digits, a 10x10 subdivision of a 2nd-order cell (~1 km).
    Third,
}

impl MeshTier {
    /// Number of decimal digits of a code at this tier.
    #[must_use]
    pub const fn digits(self) -> u32 {
        match self {
            Self::First => 4,
            Self::Second => 6,
            Self::Third => 8,
        }
    }

    /// Returns the tier with exactly `digits` digits, if any.
    #[must_use]
    pub const fn from_digits(digits: u32) -> Option<Self> {
        match digits {
            4 => Some(Self::First),
            6 => Some(Self::Second),
            8 => Some(Self::Third),
            _ => None,
        }
    }
}

/// A mesh code of at most [`MAX_DIGITS`] decimal digits.
///
/// The digit count carries the resolution: see [`MeshTier`]. Codes with
/// other digit counts are accepted and decode as if right-padded with
/// zeros, which is also how a coarse code resolves to the corner of its
/// cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u32")]
pub struct MeshCode(u32);

impl MeshCode {
    /// Creates a mesh code from its integer value.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshCode`] if the value has more than
    /// [`MAX_DIGITS`] digits.
    pub fn new(value: u64) -> Result<Self, MeshError> {
        if value >= 10u64.pow(MAX_DIGITS) {
            return Err(MeshError::InvalidMeshCode {
                input: value.to_string(),
                reason: "more than 8 digits",
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let value = value as u32;
        Ok(Self(value))
    }

    /// Wraps an encoder result. Values too large for any tier saturate to
    /// the largest 8-digit code; they only arise from out-of-domain input.
    pub(crate) fn saturating(value: i64) -> Self {
        let max = i64::from(10u32.pow(MAX_DIGITS) - 1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value.clamp(0, max) as u32;
        Self(value)
    }

    /// The integer value of the code.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Number of decimal digits (1 for the code `0`).
    #[must_use]
    pub const fn digit_count(self) -> u32 {
        match self.0.checked_ilog10() {
            Some(log) => log + 1,
            None => 1,
        }
    }

    /// Resolution tier, or `None` when the digit count matches no tier.
    #[must_use]
    pub const fn tier(self) -> Option<MeshTier> {
        MeshTier::from_digits(self.digit_count())
    }

    /// The code's digits right-padded with zeros to [`MAX_DIGITS`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn padded_digits(self) -> [u8; 8] {
        let mut padded = self.0 * 10u32.pow(MAX_DIGITS - self.digit_count());
        let mut digits = [0u8; 8];
        let mut i = digits.len();
        while i > 0 {
            i -= 1;
            digits[i] = (padded % 10) as u8;
            padded /= 10;
        }
        digits
    }

    /// Truncates the code to a coarser tier.
    ///
    /// Returns `None` if the code has fewer digits than `tier` requires.
    #[must_use]
    pub const fn truncate(self, tier: MeshTier) -> Option<Self> {
        let digits = self.digit_count();
        let wanted = tier.digits();
        if digits < wanted {
            return None;
        }
        Some(Self(self.0 / 10u32.pow(digits - wanted)))
    }

    /// The enclosing 1st-order code.
    #[must_use]
    pub const fn first_order(self) -> Option<Self> {
        self.truncate(MeshTier::First)
    }

    /// The enclosing 2nd-order code.
    #[must_use]
    pub const fn second_order(self) -> Option<Self> {
        self.truncate(MeshTier::Second)
    }

    /// Whether `self` lies inside the cell of the coarser-or-equal `other`.
    #[must_use]
    pub const fn is_within(self, other: Self) -> bool {
        let digits = self.digit_count();
        let outer = other.digit_count();
        digits >= outer && self.0 / 10u32.pow(digits - outer) == other.0
    }
}

impl fmt::Display for MeshCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MeshCode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason| MeshError::InvalidMeshCode {
            input: s.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("non-numeric"));
        }
        if trimmed.len() > MAX_DIGITS as usize {
            return Err(invalid("more than 8 digits"));
        }

        let value: u64 = trimmed.parse().map_err(|_| invalid("non-numeric"))?;
        Self::new(value)
    }
}

impl TryFrom<u64> for MeshCode {
    type Error = MeshError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MeshCode> for u32 {
    fn from(code: MeshCode) -> Self {
        code.0
    }
}
