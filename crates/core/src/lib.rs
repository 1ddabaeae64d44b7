//! Almacén Core - catalog, cart and checkout types.
//!
//! This crate holds everything the storefront knows about products and carts:
//! - [`catalog`] - The fixed product catalog
//! - [`cart`] - Cart lines, merging and totals
//! - [`checkout`] - The summary/confirm checkout state machine
//! - [`persist`] - JSON codec for the per-visitor storage slot
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP. Loading and saving the cart blob is the storefront's job; this
//! crate only decides what the blob looks like.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod persist;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{CATALOG_SIZE, Catalog, Product};
pub use checkout::{CheckoutError, CheckoutSummary, PendingCheckout, Receipt};
pub use types::*;
