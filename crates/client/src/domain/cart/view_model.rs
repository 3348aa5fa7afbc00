//! Cart view-model.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    api::StorefrontApi,
    domain::cart::models::{self, CartItem, CartItemId},
    errors::{ActionError, messages},
    loadable::Loadable,
};

/// What the cart screen should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CartView<'a> {
    Loading,
    Empty,
    Items(&'a [CartItem]),
    Failed(&'a str),
}

/// Current cart contents for the session.
///
/// Local state only changes after the backend confirms a mutation.
pub struct CartViewModel {
    api: Arc<dyn StorefrontApi>,
    state: Loadable<Vec<CartItem>>,
}

impl CartViewModel {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            state: Loadable::Loading,
        }
    }

    /// Fetch the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart cannot be fetched; the view then shows
    /// the failure, which is distinct from an empty cart.
    pub async fn load(&mut self) -> Result<&[CartItem], ActionError> {
        self.state = Loadable::Loading;

        match self.api.get_cart().await {
            Ok(items) => {
                debug!(items = items.len(), "cart loaded");

                self.state = Loadable::Loaded(items);

                Ok(self.items())
            }
            Err(cause) => {
                let error = ActionError::new("load_cart", cause, messages::LOAD_CART);

                self.state = Loadable::Failed(error.message().to_string());

                Err(error)
            }
        }
    }

    /// Remove one item, dropping it locally once the backend confirms.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend refuses or cannot be reached; the
    /// local cart is left untouched.
    pub async fn remove_item(&mut self, item: CartItemId) -> Result<(), ActionError> {
        self.api
            .remove_cart_item(item)
            .await
            .map_err(|cause| {
                ActionError::new("remove_cart_item", cause, messages::REMOVE_CART_ITEM)
            })?;

        if let Some(items) = self.state.loaded_mut() {
            items.retain(|existing| existing.id != item);
        }

        info!(item = %item, "cart item removed");

        Ok(())
    }

    /// Loaded items, empty unless a load succeeded.
    pub fn items(&self) -> &[CartItem] {
        self.state.loaded().map_or(&[], Vec::as_slice)
    }

    pub fn state(&self) -> &Loadable<Vec<CartItem>> {
        &self.state
    }

    pub fn view(&self) -> CartView<'_> {
        match &self.state {
            Loadable::Loading => CartView::Loading,
            Loadable::Failed(message) => CartView::Failed(message),
            Loadable::Loaded(items) if items.is_empty() => CartView::Empty,
            Loadable::Loaded(items) => CartView::Items(items),
        }
    }

    /// Sum of the loaded line subtotals. `None` when it overflows.
    pub fn total(&self) -> Option<Decimal> {
        models::cart_total(self.items())
    }

    /// Checkout is only offered for a loaded, non-empty cart.
    pub fn can_checkout(&self) -> bool {
        matches!(self.view(), CartView::Items(_))
    }

    /// Reflect a confirmed checkout: the backend turned the cart into an order.
    pub(crate) fn mark_checked_out(&mut self) {
        if let Some(items) = self.state.loaded_mut() {
            items.clear();
        }
    }
}

impl Debug for CartViewModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartViewModel")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
