use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A digital product sold through the external provider.
///
/// Records are defined once at startup and never mutated; the detail screen
/// carries a copy of the record rather than re-reading the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    pub checkout_url: String,
    pub short_description: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Long copy for the detail screen, falling back to the card text.
    pub fn detail_description(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.short_description)
    }
}
