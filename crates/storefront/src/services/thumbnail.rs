//! Model thumbnail URLs for product cards.
//!
//! Each card shows a lifestyle photo found by keyword search on a remote
//! image service. When remote images are disabled, a static local image per
//! category is used instead.

use ticket_core::{Category, Product};
use url::Url;

const REMOTE_SEARCH_BASE: &str = "https://source.unsplash.com/600x400/";

/// Local fallback images.
pub const FALLBACK_MEN: &str = "/static/images/model-men.svg";
pub const FALLBACK_WOMEN: &str = "/static/images/model-women.svg";
pub const FALLBACK_KID: &str = "/static/images/model-kid.svg";

/// Number of title words used as search keywords.
const TITLE_KEYWORDS: usize = 3;

/// Thumbnail URL for `product`.
///
/// With `remote` set, returns a keyword search URL built from the product's
/// category and title. Otherwise returns the local image for its category.
/// If the remote URL cannot be built, the men's fallback image is used.
#[must_use]
pub fn model_thumbnail(product: &Product, remote: bool) -> String {
    if !remote {
        return local_fallback(product.category).to_string();
    }

    remote_search_url(product).map_or_else(|| FALLBACK_MEN.to_string(), |url| url.to_string())
}

/// Local image for a category.
#[must_use]
pub const fn local_fallback(category: Category) -> &'static str {
    match category {
        Category::Men => FALLBACK_MEN,
        Category::Women => FALLBACK_WOMEN,
        Category::Kids | Category::Other => FALLBACK_KID,
    }
}

const fn category_terms(category: Category) -> [&'static str; 3] {
    match category {
        Category::Men => ["man", "male", "athlete"],
        Category::Women => ["woman", "female", "athlete"],
        Category::Kids | Category::Other => ["child", "kid", "athlete"],
    }
}

/// Up to three title words, stripped to `[A-Za-z0-9-]`.
fn title_keywords(title: &str) -> impl Iterator<Item = String> + '_ {
    title
        .split_whitespace()
        .take(TITLE_KEYWORDS)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}

fn remote_search_url(product: &Product) -> Option<Url> {
    let terms: Vec<String> = category_terms(product.category)
        .iter()
        .map(|t| (*t).to_string())
        .chain(title_keywords(&product.title))
        .collect();
    let joined = terms.join(",");
    let query = urlencoding::encode(&joined);

    Url::parse(&format!("{REMOTE_SEARCH_BASE}?{query}")).ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use ticket_core::{Price, ProductId};

    use super::*;

    fn product(title: &str, category: Category) -> Product {
        Product {
            id: ProductId::new("1"),
            title: title.to_string(),
            price: Price::new(Decimal::ONE),
            category,
            image: "images/p.jpg".to_string(),
            sizes: Vec::new(),
            colors: Vec::new(),
        }
    }

    #[test]
    fn test_remote_url_uses_category_terms_and_title() {
        let url = model_thumbnail(&product("Zapatilla Runner Pro X", Category::Women), true);
        assert_eq!(
            url,
            "https://source.unsplash.com/600x400/?woman%2Cfemale%2Cathlete%2CZapatilla%2CRunner%2CPro"
        );
    }

    #[test]
    fn test_title_keywords_are_sanitized() {
        let url = model_thumbnail(&product("Buzo (edición) t-shirt!", Category::Men), true);
        assert!(url.ends_with("?man%2Cmale%2Cathlete%2CBuzo%2Cedicin%2Ct-shirt"));

        let url = model_thumbnail(&product("¡¡ ??", Category::Kids), true);
        assert!(url.ends_with("?child%2Ckid%2Cathlete"));
    }

    #[test]
    fn test_local_fallbacks_by_category() {
        assert_eq!(model_thumbnail(&product("a", Category::Men), false), FALLBACK_MEN);
        assert_eq!(model_thumbnail(&product("a", Category::Women), false), FALLBACK_WOMEN);
        assert_eq!(model_thumbnail(&product("a", Category::Kids), false), FALLBACK_KID);
        assert_eq!(model_thumbnail(&product("a", Category::Other), false), FALLBACK_KID);
    }
}
