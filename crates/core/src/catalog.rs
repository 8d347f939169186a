//! The product catalog and its category filter.
//!
//! A [`Catalog`] is immutable once built. Filtering never touches the
//! underlying product list; it only selects which products are displayed.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Category, Product, ProductId, UnknownCategory};

/// Top-level shape of the catalog feed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFeed {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A feed product that was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The product's price is below zero.
    NegativePrice(ProductId),
    /// An earlier product already uses this identifier.
    DuplicateId(ProductId),
}

/// The loaded product catalog, in feed order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from feed products.
    ///
    /// Products with a negative price, and any product whose identifier was
    /// already seen, are dropped and reported back. The first occurrence of a
    /// duplicated identifier wins.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> (Self, Vec<Rejection>) {
        let mut seen = HashSet::with_capacity(products.len());
        let mut rejected = Vec::new();
        let mut kept = Vec::with_capacity(products.len());

        for product in products {
            if product.price.is_negative() {
                rejected.push(Rejection::NegativePrice(product.id));
            } else if !seen.insert(product.id.clone()) {
                rejected.push(Rejection::DuplicateId(product.id));
            } else {
                kept.push(product);
            }
        }

        (Self { products: kept }, rejected)
    }

    /// All products in feed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by identifier.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products visible under `filter`, in feed order.
    #[must_use]
    pub fn filtered(&self, filter: CatalogFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }
}

/// Which products the grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CatalogFilter {
    #[default]
    All,
    Category(Category),
}

impl CatalogFilter {
    /// Whether `product` is visible under this filter.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == category,
        }
    }

    /// The query-string value for this filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category(category) => category.as_str(),
        }
    }
}

impl FromStr for CatalogFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::Price;

    fn product(id: &str, category: Category, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::new(price, 0)),
            category,
            image: format!("images/{id}.jpg"),
            sizes: vec!["M".to_string()],
            colors: Vec::new(),
        }
    }

    fn sample() -> Catalog {
        let (catalog, rejected) = Catalog::from_products(vec![
            product("1", Category::Men, 100),
            product("2", Category::Women, 200),
            product("3", Category::Men, 300),
            product("4", Category::Kids, 400),
        ]);
        assert!(rejected.is_empty());
        catalog
    }

    #[test]
    fn test_filter_all_keeps_feed_order() {
        let catalog = sample();
        let ids: Vec<_> = catalog
            .filtered(CatalogFilter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = sample();
        let men: Vec<_> = catalog
            .filtered(CatalogFilter::Category(Category::Men))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(men, vec!["1", "3"]);

        assert!(
            catalog
                .filtered(CatalogFilter::Category(Category::Other))
                .is_empty()
        );
        // Filtering is a view; the catalog itself is untouched.
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_rejects_negative_price_and_duplicates() {
        let (catalog, rejected) = Catalog::from_products(vec![
            product("1", Category::Men, 100),
            product("2", Category::Men, -5),
            product("1", Category::Women, 999),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.find(&ProductId::new("1")).unwrap().category,
            Category::Men
        );
        assert_eq!(
            rejected,
            vec![
                Rejection::NegativePrice(ProductId::new("2")),
                Rejection::DuplicateId(ProductId::new("1")),
            ]
        );
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all".parse::<CatalogFilter>().unwrap(), CatalogFilter::All);
        assert_eq!(
            "women".parse::<CatalogFilter>().unwrap(),
            CatalogFilter::Category(Category::Women)
        );
        assert!("shoes".parse::<CatalogFilter>().is_err());
        assert_eq!(CatalogFilter::Category(Category::Kids).as_str(), "kids");
    }

    #[test]
    fn test_feed_without_products_key_is_empty() {
        let feed: CatalogFeed = serde_json::from_str("{}").unwrap();
        assert!(feed.products.is_empty());
    }
}
