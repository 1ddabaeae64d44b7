//! Catalog route handlers.

use almacen_core::Product;
use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::state::AppState;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    /// Catalog position, posted back by the add-to-cart form.
    pub index: usize,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl ProductCardView {
    fn new(index: usize, product: &Product) -> Self {
        Self {
            index,
            name: product.name.clone(),
            price: product.unit_price.display_clp(),
            image_url: format!("/static/img/{}", product.image),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductCardView>,
}

/// Display the product catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> CatalogTemplate {
    let products = state
        .catalog()
        .iter()
        .enumerate()
        .map(|(index, product)| ProductCardView::new(index, product))
        .collect();

    CatalogTemplate { products }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use almacen_core::Catalog;

    use super::*;
    use crate::config::StorefrontConfig;

    #[tokio::test]
    async fn test_catalog_page_lists_every_product() {
        let state = AppState::new(StorefrontConfig::default(), Catalog::builtin());
        let html = index(State(state)).await.render().unwrap();

        for name in ["Leche", "Pan de molde", "Queso", "Mermelada", "Azúcar"] {
            assert!(html.contains(name), "missing {name}");
        }
        assert!(html.contains("$890 CLP"));
        assert!(html.contains("/static/img/3.png"));
        assert!(html.contains(r#"name="index" value="4""#));
    }
}
