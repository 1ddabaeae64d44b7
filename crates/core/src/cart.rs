//! Cart lines, merging and totals.
//!
//! A cart is an insertion-ordered list of lines keyed by [`ProductId`]. Lines
//! only ever grow: there is no per-line removal, the whole cart is cleared
//! when a purchase completes.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId, Quantity};

/// One product entry in the cart with an aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image: String,
    pub quantity: Quantity,
}

impl CartLine {
    fn from_product(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from already-validated lines.
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) {
        self.add(product, Quantity::ONE);
    }

    /// Add `quantity` units of `product` in one step.
    ///
    /// Equivalent to calling [`Cart::add_one`] `quantity` times: an existing
    /// line for the product is increased, otherwise a new line is appended.
    pub fn add(&mut self, product: &Product, quantity: Quantity) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::from_product(product, quantity)),
        }
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
