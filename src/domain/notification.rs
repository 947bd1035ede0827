use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;

pub type NotificationId = u64;

/// A price-drop event kept in the notification history.
///
/// `product_id` is a weak reference: the product is looked up in the catalog
/// when needed and may no longer resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub product_id: ProductId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Transient pop-up message. Only the latest one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// Derives an id from a timestamp in milliseconds, bumped past `last` so ids
/// issued within the same millisecond stay distinct and increasing.
pub fn time_derived_id(timestamp: DateTime<Utc>, last: u64) -> u64 {
    let millis = u64::try_from(timestamp.timestamp_millis()).unwrap_or(0);
    millis.max(last.saturating_add(1))
}
