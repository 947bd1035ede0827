//! Bounded price-drop history with unread bookkeeping.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::domain::{time_derived_id, Notification, ProductId};

/// Most recent notifications kept; older ones fall off the end.
pub const NOTIFICATION_HISTORY_LIMIT: usize = 20;

/// Newest-first notification history plus the panel/unread state around it.
///
/// The unread counter only resets when the panel is opened; clearing the
/// history leaves it alone.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    unread: usize,
    panel_open: bool,
    last_id: u64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a notification with a fresh time-derived id.
    pub fn compose(
        &mut self,
        product_id: ProductId,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Notification {
        let id = time_derived_id(timestamp, self.last_id);
        self.last_id = id;
        Notification {
            id,
            product_id,
            message: message.into(),
            timestamp,
        }
    }

    /// Prepends `notification`, dropping the oldest past the history limit.
    pub fn append(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(NOTIFICATION_HISTORY_LIMIT);
    }

    /// Counts a new arrival as unread unless the panel is showing it.
    pub fn register_arrival(&mut self) {
        if !self.panel_open {
            self.unread += 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
        self.unread = 0;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Flips the panel and returns whether it is now open.
    pub fn toggle_panel(&mut self) -> bool {
        if self.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
        self.panel_open
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Entries whose message, or whose product's current name, contains
    /// `text` case-insensitively. Products no longer in the catalog only match
    /// on the message.
    pub fn filter<'a>(&'a self, text: &str, catalog: &Catalog) -> Vec<&'a Notification> {
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(|notification| {
                notification.message.to_lowercase().contains(&needle)
                    || catalog
                        .get(notification.product_id)
                        .is_some_and(|product| product.name.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const MONTH: i64 = 2_592_000;
const YEAR: i64 = 31_536_000;

/// Human age of `timestamp` relative to `now`, e.g. `just now`, `42s ago`,
/// `7m ago`, `5h ago`, `4d ago`, `2mo ago`, `3y ago`.
///
/// A unit is used only once the age is strictly past one whole unit, so
/// exactly 60 seconds still reads `60s ago`.
pub fn format_relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);

    let units = [(YEAR, "y"), (MONTH, "mo"), (DAY, "d"), (HOUR, "h"), (MINUTE, "m")];
    for (length, suffix) in units {
        if seconds > length {
            return format!("{}{suffix} ago", seconds / length);
        }
    }

    if seconds < 10 {
        "just now".to_string()
    } else {
        format!("{seconds}s ago")
    }
}
