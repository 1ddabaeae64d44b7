//! Checkout route handlers.
//!
//! Checkout is simulated: there is no payment step. Finalizing shows a
//! summary dialog carrying a one-shot token; confirming that dialog completes
//! the purchase and empties the cart. Dismissing it leaves the cart alone.

use almacen_core::{CheckoutError, CheckoutToken, checkout};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use super::CART_UPDATED_EVENT;
use super::alert::AlertTemplate;
use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::storage::CartStorage;

/// Alert for a checkout attempt on an empty cart.
pub const EMPTY_CHECKOUT_MESSAGE: &str =
    "No puedes finalizar la compra sin productos en el carrito.";

/// Confirm checkout form data.
#[derive(Debug, Deserialize)]
pub struct CompleteCheckoutForm {
    pub token: CheckoutToken,
}

/// Checkout summary dialog fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_summary.html")]
pub struct CheckoutSummaryTemplate {
    pub summary: CartView,
    pub token: String,
}

/// Purchase confirmation fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/receipt.html")]
pub struct ReceiptTemplate {
    pub message: String,
    pub completed_at: String,
}

/// Format the purchase confirmation shown to the visitor.
#[must_use]
pub fn receipt_message(total: almacen_core::Price) -> String {
    format!(
        "Compra realizada con éxito. El pago total fue de: {}",
        total.display_clp()
    )
}

/// Finalize the purchase: show the summary dialog (HTMX).
///
/// An empty cart gets an alert instead and no dialog is opened.
#[instrument(skip(storage))]
pub async fn begin(storage: CartStorage) -> Result<Response> {
    let cart = storage.load().await?;

    let (pending, summary) = match checkout::begin(&cart) {
        Ok(opened) => opened,
        Err(CheckoutError::EmptyCart) => {
            tracing::info!("Checkout refused: cart is empty");
            return Ok(AlertTemplate::error(EMPTY_CHECKOUT_MESSAGE).retargeted());
        }
        Err(e) => return Err(e.into()),
    };

    storage.open_checkout(&pending).await?;
    tracing::info!(token = %pending.token, total = %summary.total, "Checkout opened");

    Ok(CheckoutSummaryTemplate {
        summary: CartView::from_lines(&summary.lines),
        token: summary.token.to_string(),
    }
    .into_response())
}

/// Confirm the purchase shown in the summary dialog (HTMX).
///
/// The pending checkout is consumed before anything else, so replaying the
/// same confirmation is rejected with 409 and changes nothing.
#[instrument(skip(storage))]
pub async fn complete(
    storage: CartStorage,
    Form(form): Form<CompleteCheckoutForm>,
) -> Result<Response> {
    let pending = storage
        .take_checkout()
        .await?
        .ok_or(CheckoutError::NoPendingCheckout)?;
    let mut cart = storage.load().await?;

    let receipt = match pending.confirm(form.token, &mut cart, Utc::now()) {
        Ok(receipt) => receipt,
        Err(CheckoutError::TokenMismatch) => {
            // A stale dialog must not cancel the one currently open.
            storage.open_checkout(&pending).await?;
            return Err(CheckoutError::TokenMismatch.into());
        }
        Err(CheckoutError::EmptyCart) => {
            return Ok(AlertTemplate::error(EMPTY_CHECKOUT_MESSAGE).retargeted());
        }
        Err(e) => return Err(e.into()),
    };

    storage.persist(&cart).await?;

    tracing::info!(total = %receipt.total, units = receipt.units, "Checkout completed");
    add_breadcrumb("checkout", "Purchase completed", &[("total", &receipt.total)]);

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        ReceiptTemplate {
            message: receipt_message(receipt.total),
            completed_at: receipt.completed_at.format("%d-%m-%Y %H:%M UTC").to_string(),
        },
    )
        .into_response())
}

/// Dismiss the summary dialog without buying (HTMX).
#[instrument(skip(storage))]
pub async fn cancel(storage: CartStorage) -> Result<Html<&'static str>> {
    if storage.take_checkout().await?.is_some() {
        tracing::info!("Checkout dismissed");
    }
    Ok(Html(""))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use almacen_core::{Cart, Catalog, Price, Quantity};

    use super::*;

    #[test]
    fn test_receipt_message() {
        assert_eq!(
            receipt_message(Price::new(2000)),
            "Compra realizada con éxito. El pago total fue de: $2.000 CLP"
        );
    }

    #[test]
    fn test_summary_renders_lines_and_token() {
        let mut cart = Cart::new();
        cart.add(
            Catalog::builtin().get(0).unwrap(),
            Quantity::new(2).unwrap(),
        );
        let (_, summary) = checkout::begin(&cart).unwrap();
        let token = summary.token.to_string();

        let html = CheckoutSummaryTemplate {
            summary: CartView::from_lines(&summary.lines),
            token: token.clone(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Leche - Cantidad: 2 - Precio: $1.000 CLP - Total: $2.000 CLP"));
        assert!(html.contains("Total: $2.000 CLP"));
        assert!(html.contains(&token));
    }
}
