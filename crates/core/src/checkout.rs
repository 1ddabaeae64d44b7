//! Checkout state machine.
//!
//! ```text
//! Idle ──add──▶ Populated ──begin──▶ SummaryShown ──confirm──▶ Idle (empty)
//!                   ▲                     │
//!                   └───────cancel────────┘
//! ```
//!
//! [`begin`] refuses an empty cart and issues a [`PendingCheckout`] carrying a
//! fresh token. The summary shown to the visitor embeds that token, and
//! [`PendingCheckout::confirm`] only accepts a matching one. Callers take the
//! pending record out of storage before confirming, so a summary can complete
//! a purchase at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartLine};
use crate::types::{CheckoutToken, Price};

/// Reasons a checkout step is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error("no checkout is awaiting confirmation")]
    NoPendingCheckout,

    #[error("checkout token does not match the pending checkout")]
    TokenMismatch,
}

/// A checkout whose summary has been shown but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub token: CheckoutToken,
}

/// Read-only view of the cart shown before purchase completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub token: CheckoutToken,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// Outcome of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub total: Price,
    pub units: u64,
    pub completed_at: DateTime<Utc>,
}

/// Open a checkout for `cart`.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if the cart has no lines; nothing is
/// issued in that case.
pub fn begin(cart: &Cart) -> Result<(PendingCheckout, CheckoutSummary), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let token = CheckoutToken::generate();
    let pending = PendingCheckout { token };
    let summary = CheckoutSummary {
        token,
        lines: cart.lines().to_vec(),
        total: cart.total(),
    };
    Ok((pending, summary))
}

impl PendingCheckout {
    /// Complete the purchase: record the total and clear the cart.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::TokenMismatch` if `token` belongs to another summary
    /// - `CheckoutError::EmptyCart` if the cart was emptied in the meantime
    ///
    /// The cart is untouched on error.
    pub fn confirm(
        &self,
        token: CheckoutToken,
        cart: &mut Cart,
        now: DateTime<Utc>,
    ) -> Result<Receipt, CheckoutError> {
        if token != self.token {
            return Err(CheckoutError::TokenMismatch);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let receipt = Receipt {
            total: cart.total(),
            units: cart.unit_count(),
            completed_at: now,
        };
        cart.clear();
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn cart_with_two_leche() -> Cart {
        let leche = Catalog::builtin().get(0).cloned().unwrap();
        let mut cart = Cart::new();
        cart.add_one(&leche);
        cart.add_one(&leche);
        cart
    }

    #[test]
    fn test_begin_on_empty_cart_is_refused() {
        let cart = Cart::new();
        let result = begin(&cart);
        assert_eq!(result.unwrap_err(), CheckoutError::EmptyCart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_summary_mirrors_cart() {
        let cart = cart_with_two_leche();
        let (pending, summary) = begin(&cart).unwrap();

        assert_eq!(summary.token, pending.token);
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].quantity.get(), 2);
        assert_eq!(summary.total.to_string(), "2.000");
    }

    #[test]
    fn test_confirm_clears_cart() {
        let mut cart = cart_with_two_leche();
        let (pending, summary) = begin(&cart).unwrap();

        let receipt = pending.confirm(summary.token, &mut cart, Utc::now()).unwrap();

        assert_eq!(receipt.total.to_string(), "2.000");
        assert_eq!(receipt.units, 2);
        assert!(cart.is_empty());
        assert_eq!(cart.total().to_string(), "0");
    }

    #[test]
    fn test_confirm_with_foreign_token_leaves_cart() {
        let mut cart = cart_with_two_leche();
        let (pending, _summary) = begin(&cart).unwrap();

        let err = pending
            .confirm(CheckoutToken::generate(), &mut cart, Utc::now())
            .unwrap_err();

        assert_eq!(err, CheckoutError::TokenMismatch);
        assert_eq!(cart.unit_count(), 2);
    }

    #[test]
    fn test_confirm_on_emptied_cart_is_refused() {
        let mut cart = cart_with_two_leche();
        let (pending, summary) = begin(&cart).unwrap();
        cart.clear();

        let err = pending
            .confirm(summary.token, &mut cart, Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_each_begin_issues_new_token() {
        let cart = cart_with_two_leche();
        let (first, _) = begin(&cart).unwrap();
        let (second, _) = begin(&cart).unwrap();
        assert_ne!(first.token, second.token);
    }
}
