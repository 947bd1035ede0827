use std::path::PathBuf;
use std::time::Duration;

use crate::checkout::DEFAULT_PAYMENT_DELAY;
use crate::domain::GeoLocation;
use crate::simulator::DEFAULT_TICK_INTERVAL;

/// Runtime settings for a storefront session.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Period between simulated price drops.
    pub tick_interval: Duration,
    /// Length of the simulated payment step.
    pub payment_delay: Duration,
    /// Directory holding the persisted cart record.
    pub data_dir: PathBuf,
    /// Request queue depth of the storefront service.
    pub channel_capacity: usize,
    /// Whether price-drop notifications start switched on.
    pub notifications_enabled: bool,
    /// Position reported as the shopper's location, if any.
    pub home_location: Option<GeoLocation>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            payment_delay: DEFAULT_PAYMENT_DELAY,
            data_dir: PathBuf::from("."),
            channel_capacity: 100,
            notifications_enabled: true,
            home_location: None,
        }
    }
}
