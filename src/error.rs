use thiserror::Error;

use crate::domain::ProductId;
use crate::navigator::Page;

/// Errors raised while turning a cart into an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Please select a store for pickup.")]
    StoreNotSelected,
    #[error("A payment is already being processed")]
    InProgress,
    #[error("Payment was cancelled")]
    Cancelled,
}

/// Rejected page transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NavigationError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("No order has been placed yet, cannot open {0:?}")]
    NoOrder(Page),
}

/// Failures of the durable cart record. Logged, never shown to the shopper.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cart record is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures of device location and geocoding lookups.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocatorError {
    #[error("Geolocation is not supported on this device.")]
    Unsupported,
    #[error("Lookup failed: {0}")]
    LookupFailed(String),
}

/// Errors returned by the storefront service and its client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorefrontError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
