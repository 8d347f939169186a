//! Cart state and its reducer.
//!
//! The cart is a sequence of [`CartLine`]s keyed by (product id, color).
//! Every change goes through [`Cart::apply`] so that the merge, clamp and
//! remove rules live in one place; persistence is layered on top by the
//! caller.
//!
//! # Invariants
//!
//! - No two lines share the same [`LineKey`].
//! - Every line's quantity is at least 1 (enforced by `NonZeroU32`).
//! - Lines keep the title, price and image captured when they were added.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// Resolve the color a cart line should carry.
///
/// An explicit, non-empty color wins; otherwise the product's first declared
/// color is used; a product without colors resolves to `None`. This is the
/// only place the "first color" default is computed.
#[must_use]
pub fn resolve_color(product: &Product, requested: Option<&str>) -> Option<String> {
    requested
        .filter(|color| !color.is_empty())
        .or_else(|| product.default_color())
        .map(str::to_string)
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub color: Option<String>,
}

impl LineKey {
    /// Create a key. An empty color string means "no color".
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, color: Option<impl Into<String>>) -> Self {
        Self {
            product_id: product_id.into(),
            color: color.map(Into::into).filter(|c: &String| !c.is_empty()),
        }
    }
}

/// One entry in the cart.
///
/// The serialized field names (`id`, `qty`, ...) are the stored cart format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    /// Unit price at the time the line was created.
    pub price: Price,
    #[serde(rename = "qty")]
    pub quantity: NonZeroU32,
    pub image: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CartLine {
    /// This line's key.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.id.clone(),
            color: self.color.clone(),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.id == key.product_id && self.color == key.color
    }
}

/// A change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `quantity` units of `product`. `color` is resolved with
    /// [`resolve_color`].
    Add {
        product: Product,
        quantity: NonZeroU32,
        color: Option<String>,
    },
    /// Move a line's quantity by `delta`, never below 1.
    ChangeQuantity { key: LineKey, delta: i64 },
    /// Remove every line with this key.
    Remove { key: LineKey },
}

impl CartAction {
    /// Add a single unit.
    #[must_use]
    pub const fn add_one(product: Product, color: Option<String>) -> Self {
        Self::Add {
            product,
            quantity: NonZeroU32::MIN,
            color,
        }
    }
}

/// A stored cart contained the same line key twice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate cart line for product {product_id} (color {color:?})")]
pub struct DuplicateLine {
    pub product_id: ProductId,
    pub color: Option<String>,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find the line with `key`.
    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity.get())).sum()
    }

    /// Apply an action to the cart.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add {
                product,
                quantity,
                color,
            } => self.add_item(&product, quantity, color.as_deref()),
            CartAction::ChangeQuantity { key, delta } => self.change_quantity(&key, delta),
            CartAction::Remove { key } => self.remove_item(&key),
        }
    }

    /// Apply an action, returning the resulting cart.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        self.apply(action);
        self
    }

    fn add_item(&mut self, product: &Product, quantity: NonZeroU32, color: Option<&str>) {
        let key = LineKey {
            product_id: product.id.clone(),
            color: resolve_color(product, color),
        };

        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line.quantity.saturating_add(quantity.get());
            return;
        }

        self.lines.push(CartLine {
            id: key.product_id,
            title: product.title.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
            color: key.color,
        });
    }

    fn change_quantity(&mut self, key: &LineKey, delta: i64) {
        let Some(line) = self.lines.iter_mut().find(|line| line.matches(key)) else {
            return;
        };

        let target = i64::from(line.quantity.get())
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(target)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MIN);
    }

    fn remove_item(&mut self, key: &LineKey) {
        self.lines.retain(|line| !line.matches(key));
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = DuplicateLine;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        // "" and absent are the same key everywhere else
        let lines: Vec<CartLine> = lines
            .into_iter()
            .map(|mut line| {
                line.color = line.color.filter(|color| !color.is_empty());
                line
            })
            .collect();

        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if !seen.insert(line.key()) {
                return Err(DuplicateLine {
                    product_id: line.id.clone(),
                    color: line.color.clone(),
                });
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
