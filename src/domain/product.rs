use serde::{Deserialize, Serialize};

/// Catalog-wide product identifier.
pub type ProductId = u32;

/// Represents a product listed in the storefront catalog.
///
/// Prices are whole naira. `slashed_price` is the live selling price and only
/// ever moves down; `original_price` is the price it was struck through from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Vec<String>,
    pub image_url: String,
    pub original_price: u64,
    pub slashed_price: u64,
    pub category: String,
}

impl Product {
    /// Creates a new Product with no description lines and no image.
    ///
    /// # Arguments
    /// * `id` - Unique catalog identifier
    /// * `name` - Display name
    /// * `category` - Lowercase category key used by filters
    /// * `original_price` - Struck-through price
    /// * `slashed_price` - Current selling price
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        original_price: u64,
        slashed_price: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: Vec::new(),
            image_url: String::new(),
            original_price,
            slashed_price,
            category: category.into(),
        }
    }

    pub fn with_description<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}
