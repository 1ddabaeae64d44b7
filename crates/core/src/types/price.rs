//! Chilean peso amounts.
//!
//! Prices are whole pesos; CLP has no minor unit, so there is no rounding to
//! worry about. Formatting follows the `es-CL` locale: `.` groups thousands
//! and no fractional part is ever printed.
//!
//! ```rust
//! # use almacen_core::Price;
//! let price = Price::new(1_234_567);
//! assert_eq!(price.to_string(), "1.234.567");
//! assert_eq!(price.display_clp(), "$1.234.567 CLP");
//! ```

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::Quantity;

/// A price in Chilean pesos.
///
/// `Display` renders the es-CL grouped amount without currency decorations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero pesos.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole peso amount.
    #[must_use]
    pub const fn new(pesos: u64) -> Self {
        Self(pesos)
    }

    /// Price of `quantity` units at this unit price. Saturates at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity.get())))
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Format for display with currency, e.g. `$1.000 CLP`.
    #[must_use]
    pub fn display_clp(&self) -> String {
        format!("${self} CLP")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&group_thousands(self.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Insert `.` between every group of three digits, counting from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
