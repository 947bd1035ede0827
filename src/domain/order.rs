use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::StoreId;

/// Six-digit order number shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentType {
    Pickup,
    Delivery,
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentType::Pickup => f.write_str("pickup"),
            FulfillmentType::Delivery => f.write_str("delivery"),
        }
    }
}

/// Represents a completed checkout.
///
/// Created exactly once per successful checkout; lives only for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub fulfillment: FulfillmentType,
    pub email: String,
    /// Store chosen for pickup; `None` for delivery.
    pub store_id: Option<StoreId>,
    /// Cart total at the moment of commit.
    pub total: u64,
    /// Units in the cart at the moment of commit.
    pub item_count: u32,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Text shown under the order number on the confirmation page.
    pub fn confirmation_message(&self) -> &'static str {
        match self.fulfillment {
            FulfillmentType::Pickup => {
                "Please present this number at the store counter to collect your items."
            }
            FulfillmentType::Delivery => {
                "Your items are on their way! You will receive a dispatch notification shortly."
            }
        }
    }
}

/// Steps on the order tracking page, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrackingStage {
    OrderPlaced,
    Processing,
    OutForDelivery,
    Delivered,
}

impl TrackingStage {
    pub const ALL: [TrackingStage; 4] = [
        TrackingStage::OrderPlaced,
        TrackingStage::Processing,
        TrackingStage::OutForDelivery,
        TrackingStage::Delivered,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TrackingStage::OrderPlaced => "Order Placed",
            TrackingStage::Processing => "Processing",
            TrackingStage::OutForDelivery => "Out for Delivery",
            TrackingStage::Delivered => "Delivered",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            TrackingStage::OrderPlaced => "Your order has been received.",
            TrackingStage::Processing => "We are packing your items.",
            TrackingStage::OutForDelivery => "Rider is on the way.",
            TrackingStage::Delivered => "Package delivered successfully.",
        }
    }

    pub fn progress_percent(self) -> u8 {
        match self {
            TrackingStage::OrderPlaced => 25,
            TrackingStage::Processing => 50,
            TrackingStage::OutForDelivery => 75,
            TrackingStage::Delivered => 100,
        }
    }
}

/// Tracking view of an order. There is no dispatch backend, so every order
/// sits at `Processing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTracking {
    pub order_id: OrderId,
    pub current: TrackingStage,
}

impl OrderTracking {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            current: TrackingStage::Processing,
        }
    }

    /// Every stage paired with whether it has been reached.
    pub fn stages(&self) -> Vec<(TrackingStage, bool)> {
        TrackingStage::ALL
            .iter()
            .map(|stage| (*stage, *stage <= self.current))
            .collect()
    }

    pub fn progress_percent(&self) -> u8 {
        self.current.progress_percent()
    }
}
