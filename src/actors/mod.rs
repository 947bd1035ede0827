//! Service actors. A single storefront service owns the whole session.

mod storefront_service;

pub use storefront_service::StorefrontService;
