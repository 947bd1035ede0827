//! Terminal transition from a cart to an order.
//!
//! Validation happens synchronously before the simulated payment delay; the
//! commit afterwards either replaces the whole cart with one order or, when
//! validation fails or the payment is cancelled, changes nothing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::oneshot;
use tracing::{info, instrument};

use crate::cart::CartLedger;
use crate::domain::{FulfillmentType, Order, OrderId, StoreId};
use crate::error::CheckoutError;

/// Default length of the simulated payment step.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_secs(2);

const ORDER_ID_MIN: u32 = 100_000;
const ORDER_ID_MAX: u32 = 999_999;

/// Contact fields collected on the checkout form. Display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub delivery_address: Option<String>,
}

/// Everything the checkout form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub fulfillment: FulfillmentType,
    pub email: String,
    /// Required for pickup.
    pub store_id: Option<StoreId>,
    pub contact: ContactDetails,
}

impl CheckoutRequest {
    pub fn pickup(email: impl Into<String>, store_id: Option<StoreId>) -> Self {
        Self {
            fulfillment: FulfillmentType::Pickup,
            email: email.into(),
            store_id,
            contact: ContactDetails::default(),
        }
    }

    pub fn delivery(email: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            fulfillment: FulfillmentType::Delivery,
            email: email.into(),
            store_id: None,
            contact: ContactDetails {
                delivery_address: Some(address.into()),
                ..ContactDetails::default()
            },
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.contact.first_name = first_name.into();
        self.contact.last_name = last_name.into();
        self
    }
}

/// Checks the preconditions that must hold before payment starts and again
/// at the commit point.
pub fn validate(request: &CheckoutRequest, cart: &CartLedger) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if request.fulfillment == FulfillmentType::Pickup && request.store_id.is_none() {
        return Err(CheckoutError::StoreNotSelected);
    }
    Ok(())
}

/// Uniform six-digit order number in `[100000, 999999]`.
pub fn generate_order_id<R: Rng + ?Sized>(rng: &mut R) -> OrderId {
    OrderId(rng.gen_range(ORDER_ID_MIN..=ORDER_ID_MAX).to_string())
}

/// Waits out the simulated payment.
///
/// Resolves to [`CheckoutError::Cancelled`] if `cancel` fires or its sender is
/// dropped first.
pub async fn simulate_payment(
    delay: Duration,
    cancel: oneshot::Receiver<()>,
) -> Result<(), CheckoutError> {
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancel => Err(CheckoutError::Cancelled),
    }
}

/// Commit point: snapshots the cart into an order and empties the cart.
#[instrument(skip(cart, request, rng), fields(fulfillment = %request.fulfillment))]
pub fn finalize<R: Rng + ?Sized>(
    cart: &mut CartLedger,
    request: CheckoutRequest,
    rng: &mut R,
    placed_at: DateTime<Utc>,
) -> Order {
    let order = Order {
        order_id: generate_order_id(rng),
        fulfillment: request.fulfillment,
        email: request.email,
        store_id: match request.fulfillment {
            FulfillmentType::Pickup => request.store_id,
            FulfillmentType::Delivery => None,
        },
        total: cart.total(),
        item_count: cart.count(),
        placed_at,
    };

    cart.clear();
    info!(order_id = %order.order_id, total = order.total, "Order placed");
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryCartStorage;
    use crate::domain::Product;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled_cart() -> CartLedger {
        let mut cart = CartLedger::load(Box::new(MemoryCartStorage::new()));
        let rice = Product::new(1, "Rice", "grains", 1_100, 1_000);
        cart.add(&rice);
        cart.add(&rice);
        cart.add(&Product::new(2, "Sugar", "cooking", 600, 500));
        cart
    }

    fn is_six_digit(id: &OrderId) -> bool {
        let s = id.as_str();
        s.len() == 6
            && s.chars().all(|c| c.is_ascii_digit())
            && !s.starts_with('0')
            && s.parse::<u32>().is_ok_and(|n| (100_000..=999_999).contains(&n))
    }

    #[test]
    fn test_pickup_without_store_is_rejected() {
        let request = CheckoutRequest::pickup("ada@example.com", None);
        assert_eq!(validate(&request, &filled_cart()), Err(CheckoutError::StoreNotSelected));
        assert_eq!(
            CheckoutError::StoreNotSelected.to_string(),
            "Please select a store for pickup."
        );
    }

    #[test]
    fn test_delivery_and_pickup_with_store_are_valid() {
        let cart = filled_cart();
        assert!(validate(&CheckoutRequest::pickup("ada@example.com", Some(3)), &cart).is_ok());
        assert!(validate(&CheckoutRequest::delivery("ada@example.com", "12 Admiralty Way"), &cart).is_ok());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let cart = CartLedger::load(Box::new(MemoryCartStorage::new()));
        let request = CheckoutRequest::delivery("ada@example.com", "12 Admiralty Way");
        assert_eq!(validate(&request, &cart), Err(CheckoutError::EmptyCart));

        // Emptiness is checked before the store selection
        let request = CheckoutRequest::pickup("ada@example.com", None);
        assert_eq!(validate(&request, &cart), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_order_ids_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            assert!(is_six_digit(&generate_order_id(&mut rng)));
        }
    }

    #[test]
    fn test_finalize_empties_cart_and_records_totals() {
        let mut cart = filled_cart();
        let mut rng = StdRng::seed_from_u64(3);
        let request = CheckoutRequest::pickup("ada@example.com", Some(2)).with_name("Ada", "Obi");

        let order = finalize(&mut cart, request, &mut rng, Utc::now());

        assert!(cart.is_empty());
        assert!(is_six_digit(&order.order_id));
        assert_eq!(order.fulfillment, FulfillmentType::Pickup);
        assert_eq!(order.email, "ada@example.com");
        assert_eq!(order.store_id, Some(2));
        assert_eq!(order.total, 2500);
        assert_eq!(order.item_count, 3);
    }

    #[test]
    fn test_delivery_order_drops_store() {
        let mut cart = filled_cart();
        let mut rng = StdRng::seed_from_u64(3);
        let mut request = CheckoutRequest::delivery("ada@example.com", "Lekki");
        request.store_id = Some(9);

        let order = finalize(&mut cart, request, &mut rng, Utc::now());
        assert_eq!(order.store_id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_completes_after_delay() {
        let (_cancel, cancel_rx) = oneshot::channel();
        let started = tokio::time::Instant::now();
        assert!(simulate_payment(DEFAULT_PAYMENT_DELAY, cancel_rx).await.is_ok());
        assert!(started.elapsed() >= DEFAULT_PAYMENT_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_cancelled() {
        let (cancel, cancel_rx) = oneshot::channel();
        let payment = tokio::spawn(simulate_payment(DEFAULT_PAYMENT_DELAY, cancel_rx));
        cancel.send(()).unwrap();
        assert_eq!(payment.await.unwrap(), Err(CheckoutError::Cancelled));
    }
}
