use tokio::sync::oneshot;

use crate::cart::CartNotice;
use crate::catalog::ProductFilter;
use crate::checkout::CheckoutRequest;
use crate::domain::{CartSnapshot, Notification, Order, OrderTracking, Product, ProductId, Toast};
use crate::error::StorefrontError;
use crate::navigator::Page;

/// Generic type aliases for service communication
pub type ServiceResult<T> = std::result::Result<T, StorefrontError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Bell badge and panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSummary {
    pub enabled: bool,
    pub panel_open: bool,
    pub unread: usize,
    pub total: usize,
}

/// Typed messages for the storefront service. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum StorefrontRequest {
    // catalog
    ListProducts {
        filter: ProductFilter,
        respond_to: ServiceResponse<Vec<Product>>,
    },
    Categories {
        respond_to: ServiceResponse<Vec<String>>,
    },
    QuickView {
        product_id: ProductId,
        respond_to: ServiceResponse<Option<Product>>,
    },

    // price drops and notifications
    PriceDropTick {
        respond_to: ServiceResponse<Option<Notification>>,
    },
    ToggleNotifications {
        respond_to: ServiceResponse<bool>,
    },
    ToggleNotificationsPanel {
        respond_to: ServiceResponse<bool>,
    },
    CloseNotificationsPanel {
        respond_to: ServiceResponse<()>,
    },
    ClearNotifications {
        respond_to: ServiceResponse<()>,
    },
    Notifications {
        filter: String,
        respond_to: ServiceResponse<Vec<Notification>>,
    },
    NotificationSummary {
        respond_to: ServiceResponse<NotificationSummary>,
    },
    CurrentToast {
        respond_to: ServiceResponse<Option<Toast>>,
    },
    DismissToast {
        respond_to: ServiceResponse<()>,
    },

    // cart
    AddToCart {
        product_id: ProductId,
        respond_to: ServiceResponse<CartNotice>,
    },
    UpdateCartQuantity {
        product_id: ProductId,
        quantity: i64,
        respond_to: ServiceResponse<bool>,
    },
    RemoveFromCart {
        product_id: ProductId,
        respond_to: ServiceResponse<Option<CartNotice>>,
    },
    Cart {
        respond_to: ServiceResponse<CartSnapshot>,
    },

    // pages and checkout
    Navigate {
        page: Page,
        respond_to: ServiceResponse<Page>,
    },
    CurrentPage {
        respond_to: ServiceResponse<Page>,
    },
    FinalizeCheckout {
        request: CheckoutRequest,
        respond_to: ServiceResponse<Order>,
    },
    CancelCheckout {
        respond_to: ServiceResponse<bool>,
    },
    /// Sent by the payment task once its delay has elapsed.
    CompletePayment {
        checkout_id: u64,
    },
    LastOrder {
        respond_to: ServiceResponse<Option<Order>>,
    },
    OrderTracking {
        respond_to: ServiceResponse<Option<OrderTracking>>,
    },

    Shutdown,
}
