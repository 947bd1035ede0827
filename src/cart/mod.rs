//! Quantity-merging cart with write-through persistence.

pub mod storage;

use tracing::{debug, info, warn};

pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage, CART_STORAGE_KEY};

use crate::domain::{CartItem, CartSnapshot, Product, ProductId};
use crate::error::StorageError;

/// Shopper-facing outcome of a cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    Added { name: String },
    IncreasedQuantity { name: String, quantity: u32 },
    Removed { name: String },
}

impl CartNotice {
    pub fn message(&self) -> String {
        match self {
            CartNotice::Added { name } => format!("Added {name} to cart!"),
            CartNotice::IncreasedQuantity { name, .. } => {
                format!("Increased quantity of {name} in cart")
            }
            CartNotice::Removed { name } => format!("Removed {name} from cart"),
        }
    }
}

/// Serializes cart entries as the JSON array stored under [`CART_STORAGE_KEY`].
pub fn encode_cart(items: &[CartItem]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(items)?)
}

/// Parses a stored cart record. Entries without a usable quantity load as one
/// unit, and repeated product ids merge into the first entry.
pub fn decode_cart(raw: &str) -> Result<Vec<CartItem>, StorageError> {
    let stored: Vec<CartItem> = serde_json::from_str(raw)?;
    let mut items: Vec<CartItem> = Vec::with_capacity(stored.len());
    for entry in stored {
        match items.iter_mut().find(|item| item.product.id == entry.product.id) {
            Some(item) => {
                debug!(product_id = entry.product.id, "Merging repeated cart entry");
                item.quantity = item.quantity.saturating_add(entry.quantity.max(1));
            }
            None => items.push(CartItem {
                quantity: entry.quantity.max(1),
                ..entry
            }),
        }
    }
    Ok(items)
}

/// The shopper's cart: at most one entry per product id.
///
/// Every mutation writes the whole ledger through to storage. Storage failures
/// are logged and otherwise ignored; the in-memory ledger stays authoritative.
#[derive(Debug)]
pub struct CartLedger {
    items: Vec<CartItem>,
    storage: Box<dyn CartStorage>,
}

impl CartLedger {
    /// Restores the ledger from `storage`, starting empty if the record is
    /// missing or unreadable.
    pub fn load(storage: Box<dyn CartStorage>) -> Self {
        let items = match storage.read() {
            Ok(Some(raw)) => decode_cart(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable cart record");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read cart record");
                Vec::new()
            }
        };

        info!(entries = items.len(), "Cart restored");
        Self { items, storage }
    }

    /// Adds one unit of `product`, merging into an existing entry.
    pub fn add(&mut self, product: &Product) -> CartNotice {
        let notice = match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                CartNotice::IncreasedQuantity {
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                }
            }
            None => {
                self.items.push(CartItem::new(product.clone()));
                CartNotice::Added {
                    name: product.name.clone(),
                }
            }
        };
        self.persist();
        notice
    }

    /// Sets an entry's quantity exactly. Quantities below one, and unknown ids,
    /// are rejected with `false` and change nothing.
    pub fn update_quantity(&mut self, product_id: ProductId, new_quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(new_quantity) else {
            debug!(product_id, new_quantity, "Rejecting out of range quantity");
            return false;
        };
        if quantity < 1 {
            debug!(product_id, new_quantity, "Rejecting quantity below one");
            return false;
        }

        let Some(item) = self.items.iter_mut().find(|item| item.product.id == product_id) else {
            return false;
        };
        item.quantity = quantity;
        self.persist();
        true
    }

    /// Deletes the entry for `product_id` regardless of its quantity.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartNotice> {
        let index = self
            .items
            .iter()
            .position(|item| item.product.id == product_id)?;
        let removed = self.items.remove(index);
        self.persist();
        Some(CartNotice::Removed {
            name: removed.product.name,
        })
    }

    /// Empties the ledger and returns what it held.
    pub fn clear(&mut self) -> Vec<CartItem> {
        let items = std::mem::take(&mut self.items);
        self.persist();
        items
    }

    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(item.subtotal()))
    }

    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            count: self.count(),
        }
    }

    fn persist(&mut self) {
        let result = encode_cart(&self.items).and_then(|raw| self.storage.write(&raw));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn write(&mut self, _contents: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    fn product(id: ProductId, slashed_price: u64) -> Product {
        Product::new(id, format!("Product {id}"), "misc", slashed_price + 100, slashed_price)
    }

    fn empty_ledger() -> (CartLedger, MemoryCartStorage) {
        let storage = MemoryCartStorage::new();
        (CartLedger::load(Box::new(storage.clone())), storage)
    }

    #[test]
    fn test_adding_same_product_twice_merges() {
        let (mut cart, _) = empty_ledger();
        let rice = product(1, 1000);

        assert_eq!(cart.add(&rice), CartNotice::Added { name: "Product 1".into() });
        assert_eq!(
            cart.add(&rice),
            CartNotice::IncreasedQuantity { name: "Product 1".into(), quantity: 2 }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 2);
    }

    #[test]
    fn test_notices_are_distinguishable() {
        let added = CartNotice::Added { name: "Milo".into() }.message();
        let increased = CartNotice::IncreasedQuantity { name: "Milo".into(), quantity: 2 }.message();
        assert_ne!(added, increased);
        assert!(added.contains("Milo"));
        assert!(increased.contains("Increased"));
    }

    #[test]
    fn test_update_quantity_rejects_below_one() {
        let (mut cart, _) = empty_ledger();
        cart.add(&product(1, 1000));
        let before = cart.snapshot();

        assert!(!cart.update_quantity(1, 0));
        assert!(!cart.update_quantity(1, -1));
        assert_eq!(cart.snapshot(), before);

        assert!(cart.update_quantity(1, 5));
        assert_eq!(cart.get(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_unknown_product_is_noop() {
        let (mut cart, _) = empty_ledger();
        assert!(!cart.update_quantity(42, 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let (mut cart, _) = empty_ledger();
        let milk = product(5, 3850);
        cart.add(&milk);
        cart.add(&milk);
        cart.add(&milk);

        assert_eq!(cart.remove(5), Some(CartNotice::Removed { name: "Product 5".into() }));
        assert!(cart.is_empty());
        assert_eq!(cart.remove(5), None);
    }

    #[test]
    fn test_total_and_count() {
        let (mut cart, _) = empty_ledger();
        cart.add(&product(1, 1000));
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));

        assert_eq!(cart.total(), 2500);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let (mut cart, storage) = empty_ledger();
        cart.add(&product(1, 1000));
        let stored = decode_cart(&storage.contents().unwrap()).unwrap();
        assert_eq!(stored, cart.items());

        cart.update_quantity(1, 4);
        let stored = decode_cart(&storage.contents().unwrap()).unwrap();
        assert_eq!(stored[0].quantity, 4);

        cart.clear();
        assert_eq!(storage.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_restores_ledger() {
        let (mut cart, storage) = empty_ledger();
        cart.add(&product(1, 1000));
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));

        let reloaded = CartLedger::load(Box::new(storage.clone()));
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_legacy_record_without_quantity_loads_as_one() {
        let legacy = r#"[
            {"id":1,"name":"Poundo Yam","description":["Smooth"],"imageUrl":"a.jpg","originalPrice":7500,"slashedPrice":6200,"category":"grains"},
            {"id":2,"name":"Milo","description":[],"imageUrl":"b.jpg","originalPrice":3600,"slashedPrice":3300,"category":"beverages"}
        ]"#;
        let cart = CartLedger::load(Box::new(MemoryCartStorage::with_contents(legacy)));

        assert_eq!(cart.len(), 2);
        assert!(cart.items().iter().all(|item| item.quantity == 1));
        assert_eq!(cart.get(1).unwrap().product.image_url, "a.jpg");
    }

    #[test]
    fn test_repeated_ids_merge_on_load() {
        let raw = r#"[
            {"id":1,"name":"Poundo Yam","description":[],"imageUrl":"a.jpg","originalPrice":7500,"slashedPrice":6200,"category":"grains","quantity":2},
            {"id":2,"name":"Milo","description":[],"imageUrl":"b.jpg","originalPrice":3600,"slashedPrice":3300,"category":"beverages"},
            {"id":1,"name":"Poundo Yam","description":[],"imageUrl":"a.jpg","originalPrice":7500,"slashedPrice":6200,"category":"grains","quantity":3}
        ]"#;
        let cart = CartLedger::load(Box::new(MemoryCartStorage::with_contents(raw)));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(1).unwrap().quantity, 5);
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn test_odd_quantities_load_per_entry() {
        let raw = r#"[
            {"id":1,"name":"A","description":[],"imageUrl":"","originalPrice":10,"slashedPrice":10,"category":"x","quantity":-4},
            {"id":2,"name":"B","description":[],"imageUrl":"","originalPrice":10,"slashedPrice":10,"category":"x","quantity":2.7},
            {"id":3,"name":"C","description":[],"imageUrl":"","originalPrice":10,"slashedPrice":10,"category":"x","quantity":"3"},
            {"id":4,"name":"D","description":[],"imageUrl":"","originalPrice":10,"slashedPrice":10,"category":"x","quantity":0}
        ]"#;
        let items = decode_cart(raw).unwrap();
        let quantities: Vec<u32> = items.iter().map(|item| item.quantity).collect();
        assert_eq!(quantities, vec![1, 2, 1, 1]);
    }

    #[test]
    fn test_corrupt_record_degrades_to_empty() {
        let cart = CartLedger::load(Box::new(MemoryCartStorage::with_contents("{not json")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_storage_failures_do_not_affect_memory_state() {
        let mut cart = CartLedger::load(Box::new(BrokenStorage));
        assert!(cart.is_empty());

        cart.add(&product(1, 1000));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_record_uses_camel_case_fields() {
        let raw = encode_cart(&[CartItem::new(product(1, 1000))]).unwrap();
        assert!(raw.contains("\"slashedPrice\":1000"));
        assert!(raw.contains("\"quantity\":1"));
    }

    proptest! {
        #[test]
        fn adds_merge_into_one_entry_per_id(ids in proptest::collection::vec(1_u32..6, 0..40)) {
            let (mut cart, storage) = empty_ledger();
            for id in &ids {
                cart.add(&product(*id, 100));
            }

            let mut distinct = ids.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(cart.len(), distinct.len());
            prop_assert_eq!(cart.count() as usize, ids.len());
            prop_assert_eq!(cart.total(), 100 * ids.len() as u64);

            let reloaded = CartLedger::load(Box::new(storage));
            prop_assert_eq!(reloaded.items(), cart.items());
        }
    }
}
