//! Product detail overlay state.
//!
//! Tracks which product the overlay shows and which color swatch is active.
//! Confirming an add does not touch the cart directly; [`DetailState::apply`]
//! hands back the [`CartAction`] for the caller to dispatch.

use serde::{Deserialize, Serialize};

use crate::cart::CartAction;
use crate::types::Product;

/// User intents on the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    Open(Product),
    SelectColor(String),
    ConfirmAdd,
    Close,
}

/// State of the detail overlay. The default value is a closed overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailState {
    product: Option<Product>,
    selected_color: Option<String>,
    /// Set once the current product has been added, until the overlay closes.
    #[serde(default)]
    confirmed: bool,
}

impl DetailState {
    /// The product being shown, if the overlay is open.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    /// The active color swatch.
    #[must_use]
    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.product.is_some()
    }

    /// Whether the current product was just added to the cart.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Apply an action. Returns the cart change to dispatch, if any.
    pub fn apply(&mut self, action: DetailAction) -> Option<CartAction> {
        match action {
            DetailAction::Open(product) => {
                self.selected_color = product.default_color().map(str::to_string);
                self.product = Some(product);
                self.confirmed = false;
                None
            }
            DetailAction::SelectColor(hex) => {
                if self.product.as_ref().is_some_and(|p| p.color(&hex).is_some()) {
                    self.selected_color = Some(hex);
                }
                None
            }
            DetailAction::ConfirmAdd => {
                let product = self.product.clone()?;
                self.confirmed = true;
                Some(CartAction::add_one(product, self.selected_color.clone()))
            }
            DetailAction::Close => {
                *self = Self::default();
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{Cart, LineKey};
    use crate::types::{Category, ColorVariant, Price, ProductId};

    fn jacket() -> Product {
        Product {
            id: ProductId::new("J1"),
            title: "Campera Running".to_string(),
            price: Price::new(Decimal::new(45000, 0)),
            category: Category::Women,
            image: "images/jacket.jpg".to_string(),
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec![
                ColorVariant {
                    name: "Rojo".to_string(),
                    hex: "#c00".to_string(),
                },
                ColorVariant {
                    name: "Azul".to_string(),
                    hex: "#00c".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_open_selects_first_color() {
        let mut state = DetailState::default();
        assert!(!state.is_open());

        assert_eq!(state.apply(DetailAction::Open(jacket())), None);
        assert!(state.is_open());
        assert_eq!(state.selected_color(), Some("#c00"));
        assert!(!state.is_confirmed());
    }

    #[test]
    fn test_open_product_without_colors() {
        let mut product = jacket();
        product.colors.clear();
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(product));
        assert_eq!(state.selected_color(), None);
    }

    #[test]
    fn test_select_color_keeps_overlay_open() {
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(jacket()));

        assert_eq!(state.apply(DetailAction::SelectColor("#00c".to_string())), None);
        assert!(state.is_open());
        assert_eq!(state.selected_color(), Some("#00c"));

        // Undeclared colors are ignored.
        state.apply(DetailAction::SelectColor("#0f0".to_string()));
        assert_eq!(state.selected_color(), Some("#00c"));
    }

    #[test]
    fn test_confirm_add_emits_cart_action_with_selected_color() {
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(jacket()));
        state.apply(DetailAction::SelectColor("#00c".to_string()));

        let action = state.apply(DetailAction::ConfirmAdd).unwrap();
        assert!(state.is_confirmed());
        assert!(state.is_open());

        let cart = Cart::new().reduce(action);
        let line = cart.line(&LineKey::new("J1", Some("#00c"))).unwrap();
        assert_eq!(line.quantity, NonZeroU32::MIN);
    }

    #[test]
    fn test_confirm_and_select_without_product_are_noops() {
        let mut state = DetailState::default();
        assert_eq!(state.apply(DetailAction::ConfirmAdd), None);
        assert_eq!(state.apply(DetailAction::SelectColor("#c00".to_string())), None);
        assert_eq!(state, DetailState::default());
    }

    #[test]
    fn test_close_clears_everything() {
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(jacket()));
        state.apply(DetailAction::ConfirmAdd);
        state.apply(DetailAction::Close);

        assert_eq!(state, DetailState::default());
        assert_eq!(state.product(), None);
        assert_eq!(state.selected_color(), None);
    }

    #[test]
    fn test_reopen_resets_selection() {
        let mut state = DetailState::default();
        state.apply(DetailAction::Open(jacket()));
        state.apply(DetailAction::SelectColor("#00c".to_string()));
        state.apply(DetailAction::ConfirmAdd);

        state.apply(DetailAction::Open(jacket()));
        assert_eq!(state.selected_color(), Some("#c00"));
        assert!(!state.is_confirmed());
    }
}
