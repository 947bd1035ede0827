//! # Mock Framework
//!
//! Utilities for testing code that talks to the storefront service without
//! spinning up the service itself.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! channel, then helpers like [`expect_price_drop_tick`] to assert what was
//! sent and answer it.

use tokio::sync::mpsc;

use crate::clients::StorefrontClient;
use crate::cart::CartNotice;
use crate::domain::{Notification, ProductId};
use crate::messages::{ServiceResponse, StorefrontRequest};

/// Creates a client whose requests land on the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (StorefrontClient, mpsc::Receiver<StorefrontRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StorefrontClient::new(sender), receiver)
}

/// Helper to verify that the next message is a price drop tick
pub async fn expect_price_drop_tick(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<ServiceResponse<Option<Notification>>> {
    match receiver.recv().await {
        Some(StorefrontRequest::PriceDropTick { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an add-to-cart request
pub async fn expect_add_to_cart(
    receiver: &mut mpsc::Receiver<StorefrontRequest>,
) -> Option<(ProductId, ServiceResponse<CartNotice>)> {
    match receiver.recv().await {
        Some(StorefrontRequest::AddToCart { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorefrontError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move { client.add_to_cart(3).await });

        let (product_id, responder) = expect_add_to_cart(&mut receiver)
            .await
            .expect("Expected AddToCart request");
        assert_eq!(product_id, 3);
        responder
            .send(Ok(CartNotice::Added {
                name: "Golden Penny Spaghetti".to_string(),
            }))
            .unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(
            result.unwrap().message(),
            "Added Golden Penny Spaghetti to cart!"
        );
    }

    #[tokio::test]
    async fn test_dropped_responder_surfaces_as_error() {
        let (client, mut receiver) = create_mock_client(10);
        let tick = tokio::spawn(async move { client.price_drop_tick().await });

        let responder = expect_price_drop_tick(&mut receiver).await.unwrap();
        drop(responder);

        assert!(matches!(
            tick.await.unwrap(),
            Err(StorefrontError::ActorCommunicationError(_))
        ));
    }
}
