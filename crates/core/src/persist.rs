//! JSON codec for the cart storage slot.
//!
//! The slot holds a single JSON array of cart lines, e.g.
//!
//! ```json
//! [{"product_id":1,"name":"Leche","unit_price":1000,"image":"1.png","quantity":2}]
//! ```
//!
//! There is no schema version. Anything that does not decode into valid
//! lines (including a zero quantity) is rejected as a whole, and callers
//! fall back to an empty cart.

use thiserror::Error;

use crate::cart::Cart;

/// Name of the storage slot holding the serialized cart.
pub const CART_SLOT: &str = "carrito";

/// Name of the storage slot holding the pending checkout, if any.
pub const CHECKOUT_SLOT: &str = "checkout_pending";

/// Errors from encoding or decoding the cart slot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cart state is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode cart state: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Serialize the full cart for the storage slot.
///
/// # Errors
///
/// Returns `PersistError::Encode` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, PersistError> {
    serde_json::to_string(cart).map_err(PersistError::Encode)
}

/// Deserialize a cart from the storage slot contents.
///
/// # Errors
///
/// Returns `PersistError::Malformed` if `raw` is not a valid line array.
pub fn decode(raw: &str) -> Result<Cart, PersistError> {
    serde_json::from_str(raw).map_err(PersistError::Malformed)
}

/// Restore a cart from an optional slot value.
///
/// An absent slot yields an empty cart. A malformed slot also yields an empty
/// cart, with the decode error returned alongside so the caller can log it.
#[must_use]
pub fn restore(raw: Option<&str>) -> (Cart, Option<PersistError>) {
    match raw.map(decode) {
        None => (Cart::new(), None),
        Some(Ok(cart)) => (cart, None),
        Some(Err(e)) => (Cart::new(), Some(e)),
    }
}
