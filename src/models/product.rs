//! Product records.

use serde::{Deserialize, Serialize};

/// A product listed in the store catalog.
///
/// `name` is the identity key across a collection; `price` is kept exactly as
/// rendered (currency symbol included) and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
}

impl Product {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}
