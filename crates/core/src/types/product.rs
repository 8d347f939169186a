//! Catalog product types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as published in the catalog feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub category: Category,
    pub image: String,
    /// Size labels in display order.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Color variants in display order. The first one is the default.
    #[serde(default)]
    pub colors: Vec<ColorVariant>,
}

impl Product {
    /// The color value used when none is chosen explicitly.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(|c| c.hex.as_str())
    }

    /// Look up one of this product's declared color variants by value.
    #[must_use]
    pub fn color(&self, hex: &str) -> Option<&ColorVariant> {
        self.colors.iter().find(|c| c.hex == hex)
    }
}

/// A color option for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVariant {
    /// Display name, e.g. "Negro".
    #[serde(default)]
    pub name: String,
    /// CSS color value, e.g. `#111111`.
    pub hex: String,
}

/// Catalog grouping used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Kids,
    /// Any category the storefront has no filter for.
    #[serde(other)]
    Other,
}

impl Category {
    /// Categories that get their own filter button.
    pub const FILTERABLE: [Self; 3] = [Self::Men, Self::Women, Self::Kids];

    /// The feed/query-string value for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kids" => Ok(Self::Kids),
            "other" => Ok(Self::Other),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feed_product() {
        let json = r##"{
            "id": 3,
            "title": "Remera Dry Fit",
            "price": 15999,
            "category": "women",
            "image": "images/tee.jpg",
            "sizes": ["S", "M"],
            "colors": [{"name": "Negro", "hex": "#111"}, {"name": "Blanco", "hex": "#fff"}]
        }"##;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "3");
        assert_eq!(product.category, Category::Women);
        assert_eq!(product.sizes, vec!["S", "M"]);
        assert_eq!(product.default_color(), Some("#111"));
        assert_eq!(product.color("#fff").unwrap().name, "Blanco");
        assert!(product.color("#000").is_none());
    }

    #[test]
    fn test_missing_sizes_and_colors_default_to_empty() {
        let json = r#"{"id":"x","title":"Gorra","price":10,"category":"kids","image":"g.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.sizes.is_empty());
        assert!(product.colors.is_empty());
        assert_eq!(product.default_color(), None);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let json = r#"{"id":"x","title":"Bolso","price":10,"category":"unisex","image":"b.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, Category::Other);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("men".parse::<Category>().unwrap(), Category::Men);
        assert_eq!("kids".parse::<Category>().unwrap(), Category::Kids);
        assert!("Men".parse::<Category>().is_err());
    }
}
