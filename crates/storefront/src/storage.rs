//! Per-visitor cart storage.
//!
//! The cart lives in a single session slot as the JSON blob produced by
//! [`almacen_core::persist`]. Each request loads it, mutates it and writes it
//! back in full; there is no shared in-process cart.

use almacen_core::persist::{self, CART_SLOT, CHECKOUT_SLOT};
use almacen_core::{Cart, PendingCheckout};
use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::Result;

/// Handle to the visitor's storage slots.
///
/// Extract it directly in handlers:
///
/// ```ignore
/// async fn handler(storage: CartStorage) -> Result<impl IntoResponse> {
///     let cart = storage.load().await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CartStorage {
    session: Session,
}

impl CartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the cart. An absent or malformed slot yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store cannot be read.
    pub async fn load(&self) -> Result<Cart> {
        let raw = self.session.get::<String>(CART_SLOT).await?;
        let (cart, err) = persist::restore(raw.as_deref());
        if let Some(e) = err {
            tracing::warn!(error = %e, "Discarding unreadable cart state");
        }
        Ok(cart)
    }

    /// Overwrite the slot with the full cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persist` if encoding fails or `AppError::Session`
    /// if the session store cannot be written.
    pub async fn persist(&self, cart: &Cart) -> Result<()> {
        let raw = persist::encode(cart)?;
        self.session.insert(CART_SLOT, raw).await?;
        tracing::debug!(lines = cart.lines().len(), "Cart persisted");
        Ok(())
    }

    /// Record the checkout awaiting confirmation, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store cannot be written.
    pub async fn open_checkout(&self, pending: &PendingCheckout) -> Result<()> {
        self.session.insert(CHECKOUT_SLOT, pending).await?;
        Ok(())
    }

    /// Remove and return the pending checkout, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store cannot be accessed.
    pub async fn take_checkout(&self) -> Result<Option<PendingCheckout>> {
        Ok(self.session.remove::<PendingCheckout>(CHECKOUT_SLOT).await?)
    }
}

impl<S> FromRequestParts<S> for CartStorage
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(Self::new)
    }
}
