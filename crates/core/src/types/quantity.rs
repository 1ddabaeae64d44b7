//! Positive unit counts and parsing of the quantity input.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when a quantity input cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The value parsed to zero or a negative number.
    #[error("quantity must be a positive integer (got {0})")]
    NotPositive(String),

    /// The value does not fit in a `u32`.
    #[error("quantity is too large: {0}")]
    TooLarge(String),
}

/// A number of units, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(units: u32) -> Option<Self> {
        match NonZeroU32::new(units) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Number of units.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// Saturating addition of two quantities.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }

    /// Parse the raw text of a quantity input field.
    ///
    /// Reads an integer prefix the way browsers coerce number inputs: leading
    /// whitespace is skipped, an optional sign is accepted and parsing stops
    /// at the first non-digit (`"3.7"` reads as 3). Input with no digits at all
    /// falls back to a single unit. Zero and negative values are rejected.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for values ≤ 0 and
    /// `QuantityError::TooLarge` when the digits overflow a `u32`.
    pub fn parse_input(raw: &str) -> Result<Self, QuantityError> {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
            Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
            _ => (false, trimmed),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest.get(..digits_end).unwrap_or_default();
        if digits.is_empty() {
            return Ok(Self::ONE);
        }

        let is_zero = digits.bytes().all(|b| b == b'0');
        if negative || is_zero {
            return Err(QuantityError::NotPositive(raw.trim().to_string()));
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| QuantityError::TooLarge(raw.trim().to_string()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
