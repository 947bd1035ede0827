//! The authoritative product list and the filtered views derived from it.

pub mod seed;

use tracing::debug;

use crate::domain::{Product, ProductId};
use crate::simulator::PriceDrop;

/// Category key that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Holds the session's products, in display order.
///
/// Products are never added or removed after seeding; the only mutation is
/// [`Catalog::apply_price_drop`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Catalog loaded with the built-in seed products.
    pub fn seeded() -> Self {
        Self::new(seed::products())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product_at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Commits a price drop computed by [`crate::simulator::tick`].
    ///
    /// The previous selling price becomes the struck-through price. A drop whose
    /// `previous_price` no longer matches the product is stale and ignored.
    pub fn apply_price_drop(&mut self, drop: &PriceDrop) -> Option<&Product> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == drop.product_id)?;

        if product.slashed_price != drop.previous_price || drop.new_price >= drop.previous_price {
            debug!(product_id = drop.product_id, "Ignoring stale price drop");
            return None;
        }

        product.original_price = product.slashed_price;
        product.slashed_price = drop.new_price;
        Some(product)
    }

    /// `"all"` followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    pub fn filtered(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }
}

/// Shopper-entered filter over the catalog. `Default` is the reset state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub search_term: String,
    pub category: String,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: ALL_CATEGORIES.to_string(),
            min_price: None,
            max_price: None,
        }
    }
}

impl ProductFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn priced_between(mut self, min_price: Option<u64>, max_price: Option<u64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    /// Name substring (case-insensitive), exact category, and inclusive bounds
    /// on the current selling price.
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if !term.is_empty() && !product.name.to_lowercase().contains(&term) {
            return false;
        }

        if !self.category.is_empty()
            && self.category != ALL_CATEGORIES
            && self.category != product.category
        {
            return false;
        }

        if self.min_price.is_some_and(|min| product.slashed_price < min) {
            return false;
        }

        !self.max_price.is_some_and(|max| product.slashed_price > max)
    }
}
