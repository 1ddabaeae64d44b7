//! The fixed product catalog.
//!
//! The catalog is compiled into the program; there is no dynamic product
//! source. Catalog cards address products by their position.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Number of products in the catalog.
pub const CATALOG_SIZE: usize = 5;

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    /// Image file name, relative to the storefront's image directory.
    pub image: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(id: u32, name: &str, pesos: u64, image: &str) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.to_string(),
            unit_price: Price::new(pesos),
            image: image.to_string(),
        }
    }
}

/// The set of products known at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Product::new(1, "Leche", 1000, "1.png"),
            Product::new(2, "Pan de molde", 2000, "2.jpg"),
            Product::new(3, "Queso", 1200, "3.png"),
            Product::new(4, "Mermelada", 890, "4.png"),
            Product::new(5, "Azúcar", 1300, "5.png"),
        ])
    }

    /// Product at catalog position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// Iterate products in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), CATALOG_SIZE);

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Leche", "Pan de molde", "Queso", "Mermelada", "Azúcar"]
        );

        let mermelada = catalog.get(3);
        assert_eq!(mermelada.map(|p| p.unit_price), Some(Price::new(890)));
        assert_eq!(mermelada.map(|p| p.image.as_str()), Some("4.png"));
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<ProductId> = catalog.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_lookup_by_index() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get(2).map(|p| p.name.as_str()), Some("Queso"));
        assert!(catalog.get(CATALOG_SIZE).is_none());
    }
}
