//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself is stored in the visitor's session (see [`CartStorage`]).

use almacen_core::{Cart, CartLine, Quantity};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::CART_UPDATED_EVENT;
use super::alert::AlertTemplate;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::storage::CartStorage;

/// Shown instead of rows when the cart has no lines.
pub const EMPTY_CART_MESSAGE: &str = "El carrito está vacío";

/// Alert for a quantity that is not a positive integer.
pub const INVALID_QUANTITY_MESSAGE: &str = "Por favor, ingrese una cantidad válida.";

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }

    /// View over a list of lines, as shown in the cart and the checkout summary.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self::from(&Cart::from_lines(lines.to_vec()))
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().display_clp(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity.get(),
            price: line.unit_price.display_clp(),
            line_price: line.line_total().display_clp(),
        }
    }
}

/// Add to cart form data.
///
/// `quantity` is the raw text of the number input; it is coerced the way the
/// browser would rather than rejected outright.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub index: usize,
    #[serde(default)]
    pub quantity: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub empty_message: &'static str,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub empty_message: &'static str,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Display cart page.
#[instrument(skip(storage))]
pub async fn show(storage: CartStorage) -> Result<CartShowTemplate> {
    let cart = storage.load().await?;
    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        empty_message: EMPTY_CART_MESSAGE,
    })
}

/// Cart lines and total (HTMX).
#[instrument(skip(storage))]
pub async fn items(storage: CartStorage) -> Result<CartItemsTemplate> {
    let cart = storage.load().await?;
    Ok(CartItemsTemplate {
        cart: CartView::from(&cart),
        empty_message: EMPTY_CART_MESSAGE,
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(storage))]
pub async fn count(storage: CartStorage) -> Result<CartCountTemplate> {
    let cart = storage.load().await?;
    Ok(CartCountTemplate {
        count: cart.unit_count(),
    })
}

/// Add a catalog product to the cart (HTMX).
///
/// All requested units are added in one step and persisted once. Responds
/// with an alert and, on success, an HTMX trigger so the cart views refresh.
#[instrument(skip(state, storage))]
pub async fn add(
    State(state): State<AppState>,
    storage: CartStorage,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(form.index)
        .ok_or_else(|| AppError::NotFound(format!("catalog item {}", form.index)))?;

    let quantity = match Quantity::parse_input(&form.quantity) {
        Ok(quantity) => quantity,
        Err(e) => {
            tracing::info!(error = %e, "Rejected add to cart");
            return Ok(AlertTemplate::error(INVALID_QUANTITY_MESSAGE).into_response());
        }
    };

    let mut cart = storage.load().await?;
    cart.add(product, quantity);
    storage.persist(&cart).await?;

    tracing::info!(
        product_id = %product.id,
        quantity = quantity.get(),
        "Added to cart"
    );
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", &product.id), ("quantity", &quantity)],
    );

    let message = format!(
        "Se han agregado {quantity} unidades de {} al carrito.",
        product.name
    );
    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        AlertTemplate::success(message),
    )
        .into_response())
}
