//! Catalog view-model.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rustc_hash::FxHashMap;
use tracing::info;

use crate::{
    api::StorefrontApi,
    domain::{
        cart::models::NewCartItem,
        catalog::models::{Product, ProductId},
        quantity::Quantity,
    },
    errors::{ActionError, messages},
    loadable::Loadable,
};

/// Confirmation that the backend accepted an add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedToCart {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Product listing plus the per-product quantity the user has typed.
///
/// The catalog never holds cart state; adding to the cart only reports
/// whether the backend accepted the request.
pub struct CatalogViewModel {
    api: Arc<dyn StorefrontApi>,
    products: Loadable<Vec<Product>>,
    quantities: FxHashMap<ProductId, Quantity>,
}

impl CatalogViewModel {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            products: Loadable::Loading,
            quantities: FxHashMap::default(),
        }
    }

    /// Fetch the product list.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached or rejects the
    /// request; the listing is then empty.
    pub async fn load_products(&mut self) -> Result<&[Product], ActionError> {
        self.products = Loadable::Loading;

        match self.api.list_products().await {
            Ok(products) => {
                self.quantities
                    .retain(|id, _| products.iter().any(|product| product.id == *id));

                self.products = Loadable::Loaded(products);

                Ok(self.products())
            }
            Err(cause) => {
                let error = ActionError::new("load_products", cause, messages::LOAD_PRODUCTS);

                self.products = Loadable::Failed(error.message().to_string());

                Err(error)
            }
        }
    }

    /// Loaded products, empty until a load succeeds.
    pub fn products(&self) -> &[Product] {
        self.products.loaded().map_or(&[], Vec::as_slice)
    }

    pub fn state(&self) -> &Loadable<Vec<Product>> {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products().iter().find(|product| product.id == id)
    }

    /// Store the quantity typed for `product`. Invalid input stores one.
    pub fn set_quantity(&mut self, product: ProductId, raw: &str) -> Quantity {
        let quantity = Quantity::from_input(raw);

        self.quantities.insert(product, quantity);

        quantity
    }

    /// Quantity chosen for `product`, one when nothing was entered.
    pub fn quantity(&self, product: ProductId) -> Quantity {
        self.quantities.get(&product).copied().unwrap_or_default()
    }

    /// Add `product` to the cart using the quantity chosen for it.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the request or cannot be reached.
    pub async fn add_to_cart(&self, product: ProductId) -> Result<AddedToCart, ActionError> {
        self.add_to_cart_with(product, self.quantity(product)).await
    }

    /// Add `product` to the cart with an explicit quantity.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the request or cannot be reached.
    pub async fn add_to_cart_with(
        &self,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<AddedToCart, ActionError> {
        self.api
            .add_to_cart(NewCartItem {
                product_id: product,
                quantity,
            })
            .await
            .map_err(|cause| ActionError::new("add_to_cart", cause, messages::ADD_TO_CART))?;

        info!(product = %product, quantity = %quantity, "added to cart");

        Ok(AddedToCart {
            product_id: product,
            quantity,
        })
    }
}

impl Debug for CatalogViewModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CatalogViewModel")
            .field("products", &self.products)
            .field("quantities", &self.quantities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        api::{MockStorefrontApi, StorefrontError},
        test::{network_error, product},
    };

    use super::*;

    fn view_model(api: MockStorefrontApi) -> CatalogViewModel {
        CatalogViewModel::new(Arc::new(api))
    }

    #[tokio::test]
    async fn load_products_keeps_backend_order() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_list_products()
            .once()
            .return_once(|| Ok(vec![product(2, "Gadget", 550), product(1, "Widget", 1000)]));

        let mut catalog = view_model(api);
        let products = catalog.load_products().await?;

        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Gadget", "Widget"]);
        assert_eq!(catalog.product(ProductId::new(1)).map(|p| p.price), Some(Decimal::new(1000, 2)));

        Ok(())
    }

    #[tokio::test]
    async fn load_failure_leaves_listing_empty() {
        let mut api = MockStorefrontApi::new();

        api.expect_list_products()
            .once()
            .return_once(|| Err(network_error()));

        let mut catalog = view_model(api);
        let result = catalog.load_products().await;

        assert!(
            matches!(&result, Err(error) if error.message() == messages::LOAD_PRODUCTS),
            "expected fallback message, got {result:?}"
        );
        assert!(catalog.products().is_empty());
        assert_eq!(catalog.state().error(), Some(messages::LOAD_PRODUCTS));
    }

    #[test]
    fn quantity_defaults_to_one() {
        let catalog = view_model(MockStorefrontApi::new());

        assert_eq!(catalog.quantity(ProductId::new(9)), Quantity::ONE);
    }

    #[test]
    fn invalid_quantity_input_stores_one() {
        let mut catalog = view_model(MockStorefrontApi::new());

        catalog.set_quantity(ProductId::new(1), "5");
        catalog.set_quantity(ProductId::new(2), "zero");

        assert_eq!(catalog.quantity(ProductId::new(1)).get(), 5);
        assert_eq!(catalog.quantity(ProductId::new(2)), Quantity::ONE);
    }

    #[tokio::test]
    async fn add_to_cart_sends_chosen_quantity() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_add_to_cart()
            .once()
            .withf(|item| item.product_id == ProductId::new(4) && item.quantity.get() == 3)
            .return_once(|_| Ok(()));

        let mut catalog = view_model(api);

        catalog.set_quantity(ProductId::new(4), "3");

        let added = catalog.add_to_cart(ProductId::new(4)).await?;

        assert_eq!(added.quantity.get(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn add_to_cart_failure_surfaces_backend_message() {
        let mut api = MockStorefrontApi::new();

        api.expect_add_to_cart().once().return_once(|_| {
            Err(StorefrontError::Api {
                status: 409,
                message: Some("Estoque insuficiente".to_string()),
            })
        });

        let catalog = view_model(api);
        let result = catalog.add_to_cart(ProductId::new(1)).await;

        assert!(
            matches!(&result, Err(error) if error.message() == "Estoque insuficiente"),
            "expected backend message, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reload_forgets_quantities_of_removed_products() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_list_products()
            .once()
            .return_once(|| Ok(vec![product(1, "Widget", 1000)]));

        let mut catalog = view_model(api);

        catalog.set_quantity(ProductId::new(1), "2");
        catalog.set_quantity(ProductId::new(8), "6");
        catalog.load_products().await?;

        assert_eq!(catalog.quantity(ProductId::new(1)).get(), 2);
        assert_eq!(catalog.quantity(ProductId::new(8)), Quantity::ONE);

        Ok(())
    }
}
