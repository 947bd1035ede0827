use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, instrument, warn, Instrument, Span};

use crate::cart::{CartLedger, CartNotice};
use crate::catalog::{Catalog, ProductFilter};
use crate::checkout::{self, CheckoutRequest};
use crate::clients::StorefrontClient;
use crate::config::StorefrontConfig;
use crate::domain::{time_derived_id, Notification, Order, OrderTracking, Product, ProductId, Toast};
use crate::error::{CheckoutError, StorefrontError};
use crate::messages::{NotificationSummary, ServiceResponse, StorefrontRequest};
use crate::navigator::{NavigationContext, Navigator, Page};
use crate::notifications::NotificationLog;
use crate::simulator;

const NOTIFICATIONS_ON: &str = "Price slash notifications enabled!";
const NOTIFICATIONS_OFF: &str = "Price slash notifications disabled.";

/// A checkout waiting for its payment delay to run out.
struct PendingCheckout {
    id: u64,
    request: CheckoutRequest,
    respond_to: ServiceResponse<Order>,
    cancel: oneshot::Sender<()>,
}

/// Owns every piece of mutable session state and applies requests to it one
/// at a time.
///
/// Price-drop ticks arrive as ordinary requests, so a tick and a cart edit can
/// never interleave.
pub struct StorefrontService {
    receiver: mpsc::Receiver<StorefrontRequest>,
    sender: mpsc::WeakSender<StorefrontRequest>,
    catalog: Catalog,
    notifications: NotificationLog,
    notifications_enabled: bool,
    cart: CartLedger,
    navigator: Navigator,
    pending_checkout: Option<PendingCheckout>,
    next_checkout_id: u64,
    last_order: Option<Order>,
    toast: Option<Toast>,
    last_toast_id: u64,
    payment_delay: Duration,
    rng: StdRng,
}

impl StorefrontService {
    pub fn new(config: &StorefrontConfig, catalog: Catalog, cart: CartLedger) -> (Self, StorefrontClient) {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);
        let service = Self {
            receiver,
            sender: sender.downgrade(),
            catalog,
            notifications: NotificationLog::new(),
            notifications_enabled: config.notifications_enabled,
            cart,
            navigator: Navigator::new(),
            pending_checkout: None,
            next_checkout_id: 0,
            last_order: None,
            toast: None,
            last_toast_id: 0,
            payment_delay: config.payment_delay,
            rng: StdRng::from_entropy(),
        };
        let client = StorefrontClient::new(sender);
        (service, client)
    }

    /// Replaces the entropy-seeded generator, for reproducible sessions.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[instrument(name = "storefront_service", skip(self))]
    pub async fn run(mut self) {
        info!("StorefrontService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StorefrontRequest::ListProducts { filter, respond_to } => {
                    self.handle_list_products(filter, respond_to);
                }
                StorefrontRequest::Categories { respond_to } => {
                    let _ = respond_to.send(Ok(self.catalog.categories()));
                }
                StorefrontRequest::QuickView { product_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.catalog.get(product_id).cloned()));
                }
                StorefrontRequest::PriceDropTick { respond_to } => {
                    self.handle_price_drop_tick(respond_to);
                }
                StorefrontRequest::ToggleNotifications { respond_to } => {
                    self.handle_toggle_notifications(respond_to);
                }
                StorefrontRequest::ToggleNotificationsPanel { respond_to } => {
                    let open = self.notifications.toggle_panel();
                    debug!(open, "Notifications panel toggled");
                    let _ = respond_to.send(Ok(open));
                }
                StorefrontRequest::CloseNotificationsPanel { respond_to } => {
                    self.notifications.close_panel();
                    let _ = respond_to.send(Ok(()));
                }
                StorefrontRequest::ClearNotifications { respond_to } => {
                    self.notifications.clear();
                    info!("Notifications cleared");
                    let _ = respond_to.send(Ok(()));
                }
                StorefrontRequest::Notifications { filter, respond_to } => {
                    self.handle_notifications(filter, respond_to);
                }
                StorefrontRequest::NotificationSummary { respond_to } => {
                    let _ = respond_to.send(Ok(self.notification_summary()));
                }
                StorefrontRequest::CurrentToast { respond_to } => {
                    let _ = respond_to.send(Ok(self.toast.clone()));
                }
                StorefrontRequest::DismissToast { respond_to } => {
                    self.toast = None;
                    let _ = respond_to.send(Ok(()));
                }
                StorefrontRequest::AddToCart { product_id, respond_to } => {
                    self.handle_add_to_cart(product_id, respond_to);
                }
                StorefrontRequest::UpdateCartQuantity {
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_update_cart_quantity(product_id, quantity, respond_to);
                }
                StorefrontRequest::RemoveFromCart { product_id, respond_to } => {
                    self.handle_remove_from_cart(product_id, respond_to);
                }
                StorefrontRequest::Cart { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.snapshot()));
                }
                StorefrontRequest::Navigate { page, respond_to } => {
                    self.handle_navigate(page, respond_to);
                }
                StorefrontRequest::CurrentPage { respond_to } => {
                    let _ = respond_to.send(Ok(self.navigator.current()));
                }
                StorefrontRequest::FinalizeCheckout { request, respond_to } => {
                    self.handle_finalize_checkout(request, respond_to);
                }
                StorefrontRequest::CancelCheckout { respond_to } => {
                    let _ = respond_to.send(Ok(self.cancel_pending_checkout()));
                }
                StorefrontRequest::CompletePayment { checkout_id } => {
                    self.handle_complete_payment(checkout_id);
                }
                StorefrontRequest::LastOrder { respond_to } => {
                    let _ = respond_to.send(Ok(self.last_order.clone()));
                }
                StorefrontRequest::OrderTracking { respond_to } => {
                    let tracking = self.last_order.as_ref().map(OrderTracking::for_order);
                    let _ = respond_to.send(Ok(tracking));
                }
                StorefrontRequest::Shutdown => {
                    info!("StorefrontService shutting down");
                    break;
                }
            }
        }

        self.cancel_pending_checkout();
        info!("StorefrontService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_products(&self, filter: ProductFilter, respond_to: ServiceResponse<Vec<Product>>) {
        let products: Vec<_> = self.catalog.filtered(&filter).into_iter().cloned().collect();
        debug!(matched = products.len(), "Listed products");
        let _ = respond_to.send(Ok(products));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_price_drop_tick(&mut self, respond_to: ServiceResponse<Option<Notification>>) {
        let notification = if self.notifications_enabled {
            self.apply_price_drop()
        } else {
            debug!("Notifications disabled, skipping tick");
            None
        };
        let _ = respond_to.send(Ok(notification));
    }

    /// One simulator step: compute, commit to the catalog, then feed the log,
    /// the unread counter and the toast.
    fn apply_price_drop(&mut self) -> Option<Notification> {
        let drop = simulator::tick(&self.catalog, &mut self.rng)?;
        self.catalog.apply_price_drop(&drop)?;

        let message = drop.message();
        let notification = self
            .notifications
            .compose(drop.product_id, message.clone(), Utc::now());
        self.notifications.append(notification.clone());
        self.notifications.register_arrival();
        self.raise_toast(message);

        info!(
            product_id = drop.product_id,
            previous_price = drop.previous_price,
            new_price = drop.new_price,
            "Price dropped"
        );
        Some(notification)
    }

    #[instrument(skip(self, respond_to))]
    fn handle_toggle_notifications(&mut self, respond_to: ServiceResponse<bool>) {
        self.notifications_enabled = !self.notifications_enabled;
        let message = if self.notifications_enabled {
            NOTIFICATIONS_ON
        } else {
            NOTIFICATIONS_OFF
        };
        info!(enabled = self.notifications_enabled, "Price drop notifications toggled");
        self.raise_toast(message);
        let _ = respond_to.send(Ok(self.notifications_enabled));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_notifications(&self, filter: String, respond_to: ServiceResponse<Vec<Notification>>) {
        let entries = self
            .notifications
            .filter(&filter, &self.catalog)
            .into_iter()
            .cloned()
            .collect();
        let _ = respond_to.send(Ok(entries));
    }

    fn notification_summary(&self) -> NotificationSummary {
        NotificationSummary {
            enabled: self.notifications_enabled,
            panel_open: self.notifications.is_panel_open(),
            unread: self.notifications.unread_count(),
            total: self.notifications.len(),
        }
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_add_to_cart(&mut self, product_id: ProductId, respond_to: ServiceResponse<CartNotice>) {
        let Some(product) = self.catalog.get(product_id) else {
            warn!("Product not found");
            let _ = respond_to.send(Err(StorefrontError::ProductNotFound(product_id)));
            return;
        };

        let notice = self.cart.add(product);
        info!(cart_count = self.cart.count(), "Cart updated");
        self.cancel_for_cart_change();
        self.raise_toast(notice.message());
        let _ = respond_to.send(Ok(notice));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_update_cart_quantity(&mut self, product_id: ProductId, quantity: i64, respond_to: ServiceResponse<bool>) {
        let updated = self.cart.update_quantity(product_id, quantity);
        if updated {
            self.cancel_for_cart_change();
        } else {
            debug!("Quantity update rejected");
        }
        let _ = respond_to.send(Ok(updated));
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_remove_from_cart(
        &mut self,
        product_id: ProductId,
        respond_to: ServiceResponse<Option<CartNotice>>,
    ) {
        let notice = self.cart.remove(product_id);
        if let Some(notice) = &notice {
            info!("Removed from cart");
            self.raise_toast(notice.message());
            self.cancel_for_cart_change();
        }
        let _ = respond_to.send(Ok(notice));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_navigate(&mut self, page: Page, respond_to: ServiceResponse<Page>) {
        let context = NavigationContext {
            cart_is_empty: self.cart.is_empty(),
            has_order: self.last_order.is_some(),
        };

        match self.navigator.navigate(page, context) {
            Ok(from) => {
                if from != page && self.cancel_pending_checkout() {
                    info!(?from, "Left the page while payment was pending");
                }
                let _ = respond_to.send(Ok(page));
            }
            Err(e) => {
                debug!(error = %e, "Navigation rejected");
                let _ = respond_to.send(Err(e.into()));
            }
        }
    }

    /// Validates synchronously, then starts the payment delay in a background
    /// task that reports back with [`StorefrontRequest::CompletePayment`]. The
    /// response is sent once the order commits or the payment is cancelled.
    #[instrument(fields(fulfillment = %request.fulfillment), skip(self, request, respond_to))]
    fn handle_finalize_checkout(&mut self, request: CheckoutRequest, respond_to: ServiceResponse<Order>) {
        if let Err(e) = checkout::validate(&request, &self.cart) {
            warn!(error = %e, "Checkout rejected");
            self.raise_toast(e.to_string());
            let _ = respond_to.send(Err(e.into()));
            return;
        }

        if self.pending_checkout.is_some() {
            let _ = respond_to.send(Err(CheckoutError::InProgress.into()));
            return;
        }

        let Some(sender) = self.sender.upgrade() else {
            let _ = respond_to.send(Err(StorefrontError::ActorCommunicationError(
                "Service is shutting down".to_string(),
            )));
            return;
        };

        self.next_checkout_id += 1;
        let checkout_id = self.next_checkout_id;
        let (cancel, cancel_rx) = oneshot::channel();
        let delay = self.payment_delay;

        tokio::spawn(
            async move {
                match checkout::simulate_payment(delay, cancel_rx).await {
                    Ok(()) => {
                        let _ = sender
                            .send(StorefrontRequest::CompletePayment { checkout_id })
                            .await;
                    }
                    Err(e) => debug!(error = %e, "Payment stopped"),
                }
            }
            .instrument(info_span!("payment", checkout_id)),
        );

        info!(checkout_id, "Processing payment");
        self.pending_checkout = Some(PendingCheckout {
            id: checkout_id,
            request,
            respond_to,
            cancel,
        });
    }

    #[instrument(fields(order_id = tracing::field::Empty), skip(self))]
    fn handle_complete_payment(&mut self, checkout_id: u64) {
        let pending = match self.pending_checkout.take() {
            Some(pending) if pending.id == checkout_id => pending,
            other => {
                debug!("Ignoring stale payment completion");
                self.pending_checkout = other;
                return;
            }
        };

        if let Err(e) = checkout::validate(&pending.request, &self.cart) {
            warn!(error = %e, "Cart no longer valid at commit");
            let _ = pending.respond_to.send(Err(e.into()));
            return;
        }

        let order = checkout::finalize(&mut self.cart, pending.request, &mut self.rng, Utc::now());
        Span::current().record("order_id", order.order_id.as_str());
        self.last_order = Some(order.clone());

        let context = NavigationContext {
            cart_is_empty: true,
            has_order: true,
        };
        if let Err(e) = self.navigator.navigate(Page::Confirmation, context) {
            warn!(error = %e, "Could not show confirmation page");
        }

        let _ = pending.respond_to.send(Ok(order));
    }

    /// Cancels the pending payment, if any, answering its caller with
    /// [`CheckoutError::Cancelled`]. The cart is left as it was.
    fn cancel_pending_checkout(&mut self) -> bool {
        let Some(pending) = self.pending_checkout.take() else {
            return false;
        };
        let _ = pending.cancel.send(());
        let _ = pending
            .respond_to
            .send(Err(CheckoutError::Cancelled.into()));
        info!(checkout_id = pending.id, "Payment cancelled");
        true
    }

    /// The order snapshots the cart at commit, so a cart edit during payment
    /// voids the payment.
    fn cancel_for_cart_change(&mut self) {
        if self.cancel_pending_checkout() {
            info!("Cart changed while payment was pending");
        }
    }

    fn raise_toast(&mut self, message: impl Into<String>) {
        let id = time_derived_id(Utc::now(), self.last_toast_id);
        self.last_toast_id = id;
        self.toast = Some(Toast {
            id,
            message: message.into(),
        });
    }
}
