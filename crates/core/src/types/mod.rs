//! Core types for Almacén.
//!
//! This module provides type-safe wrappers for the small set of domain values
//! the cart works with.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::Price;
pub use quantity::{Quantity, QuantityError};
