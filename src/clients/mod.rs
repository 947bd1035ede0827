use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::cart::CartNotice;
use crate::catalog::ProductFilter;
use crate::checkout::CheckoutRequest;
use crate::domain::{CartSnapshot, Notification, Order, OrderTracking, Product, ProductId, Toast};
use crate::error::StorefrontError;
use crate::messages::{NotificationSummary, StorefrontRequest};
use crate::navigator::Page;

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, StorefrontError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| StorefrontError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| StorefrontError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to the storefront service. Cheap to clone; every clone talks to the
/// same service task.
#[derive(Clone, Debug)]
pub struct StorefrontClient {
    sender: mpsc::Sender<StorefrontRequest>,
}

impl StorefrontClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self { sender }
    }

    /// Manual method for special cases (no response needed)
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), StorefrontError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StorefrontRequest::Shutdown)
            .await
            .map_err(|_| StorefrontError::ActorCommunicationError("Actor closed".to_string()))
    }

    /// Resolves once the service has stopped receiving.
    pub async fn closed(&self) {
        self.sender.closed().await;
    }
}

client_method!(StorefrontClient => fn list_products(filter: ProductFilter) -> Vec<Product> as StorefrontRequest::ListProducts);
client_method!(StorefrontClient => fn categories() -> Vec<String> as StorefrontRequest::Categories);
client_method!(StorefrontClient => fn quick_view(product_id: ProductId) -> Option<Product> as StorefrontRequest::QuickView);

client_method!(StorefrontClient => fn price_drop_tick() -> Option<Notification> as StorefrontRequest::PriceDropTick);
client_method!(StorefrontClient => fn toggle_notifications() -> bool as StorefrontRequest::ToggleNotifications);
client_method!(StorefrontClient => fn toggle_notifications_panel() -> bool as StorefrontRequest::ToggleNotificationsPanel);
client_method!(StorefrontClient => fn close_notifications_panel() -> () as StorefrontRequest::CloseNotificationsPanel);
client_method!(StorefrontClient => fn clear_notifications() -> () as StorefrontRequest::ClearNotifications);
client_method!(StorefrontClient => fn notifications(filter: String) -> Vec<Notification> as StorefrontRequest::Notifications);
client_method!(StorefrontClient => fn notification_summary() -> NotificationSummary as StorefrontRequest::NotificationSummary);
client_method!(StorefrontClient => fn current_toast() -> Option<Toast> as StorefrontRequest::CurrentToast);
client_method!(StorefrontClient => fn dismiss_toast() -> () as StorefrontRequest::DismissToast);

client_method!(StorefrontClient => fn add_to_cart(product_id: ProductId) -> CartNotice as StorefrontRequest::AddToCart);
client_method!(StorefrontClient => fn update_cart_quantity(product_id: ProductId, quantity: i64) -> bool as StorefrontRequest::UpdateCartQuantity);
client_method!(StorefrontClient => fn remove_from_cart(product_id: ProductId) -> Option<CartNotice> as StorefrontRequest::RemoveFromCart);
client_method!(StorefrontClient => fn cart() -> CartSnapshot as StorefrontRequest::Cart);

client_method!(StorefrontClient => fn navigate(page: Page) -> Page as StorefrontRequest::Navigate);
client_method!(StorefrontClient => fn current_page() -> Page as StorefrontRequest::CurrentPage);
client_method!(StorefrontClient => fn finalize_checkout(request: CheckoutRequest) -> Order as StorefrontRequest::FinalizeCheckout);
client_method!(StorefrontClient => fn cancel_checkout() -> bool as StorefrontRequest::CancelCheckout);
client_method!(StorefrontClient => fn last_order() -> Option<Order> as StorefrontRequest::LastOrder);
client_method!(StorefrontClient => fn order_tracking() -> Option<OrderTracking> as StorefrontRequest::OrderTracking);
