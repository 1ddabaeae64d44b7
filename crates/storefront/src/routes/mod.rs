//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart lines + total (fragment)
//! GET  /cart/count             - Cart unit count badge (fragment)
//! POST /cart/add               - Add to cart (alert fragment, triggers cart-updated)
//!
//! # Checkout
//! POST /checkout               - Show summary dialog (or empty-cart alert)
//! POST /checkout/complete      - Confirm purchase (receipt, triggers cart-updated)
//! POST /checkout/cancel        - Dismiss summary dialog
//! ```

pub mod alert;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// HTMX event fired whenever the cart contents change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::begin))
        .route("/complete", post(checkout::complete))
        .route("/cancel", post(checkout::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
