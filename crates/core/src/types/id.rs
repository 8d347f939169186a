//! Product identifiers.
//!
//! The catalog feed is hand-written JSON, so an `id` may arrive either as a
//! string (`"A"`) or as a number (`12`). Both are normalized to their string
//! form so that cart lines, form fields and session payloads all compare the
//! same way.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a catalog product.
///
/// Serializes as a plain string. Deserializes from a string or a JSON number.
///
/// ```
/// use ticket_core::ProductId;
///
/// let from_text: ProductId = serde_json::from_str("\"12\"").unwrap();
/// let from_number: ProductId = serde_json::from_str("12").unwrap();
/// assert_eq!(from_text, from_number);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}
