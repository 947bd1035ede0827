//! Simulated market price drops.
//!
//! [`tick`] is a pure step over the catalog; [`run_price_drop_timer`] is the
//! background task that asks the storefront service to run one step per period.

use std::time::Duration;

use rand::Rng;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::clients::StorefrontClient;
use crate::domain::{format_naira, ProductId};

/// Default period between price-drop ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Each drop keeps this share of the current price, floored.
const RETAINED_PERCENT: u64 = 95;

/// A computed, not yet committed, price reduction for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDrop {
    pub product_id: ProductId,
    pub product_name: String,
    pub previous_price: u64,
    pub new_price: u64,
}

impl PriceDrop {
    pub fn message(&self) -> String {
        format!(
            "Price drop for {}! Now {}",
            self.product_name,
            format_naira(self.new_price)
        )
    }
}

/// `floor(price * 0.95)` in integer arithmetic.
pub fn discounted_price(price: u64) -> u64 {
    let reduced = u128::from(price) * u128::from(RETAINED_PERCENT) / 100;
    // never larger than `price`, so it fits back into u64
    reduced as u64
}

/// Picks one product uniformly at random and computes its next price.
///
/// Returns `None` for an empty catalog, or when the cut rounds to no change;
/// the catalog is never touched here.
pub fn tick<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Option<PriceDrop> {
    if catalog.is_empty() {
        return None;
    }

    let product = catalog.product_at(rng.gen_range(0..catalog.len()))?;
    let new_price = discounted_price(product.slashed_price);
    if new_price == product.slashed_price {
        debug!(product_id = product.id, "Price already at floor, skipping tick");
        return None;
    }

    Some(PriceDrop {
        product_id: product.id,
        product_name: product.name.clone(),
        previous_price: product.slashed_price,
        new_price,
    })
}

/// Sends one price-drop tick to the service every `period`, starting one
/// period from now. Stops once the service has gone away.
#[instrument(name = "price_drop_timer", skip(client))]
pub async fn run_price_drop_timer(client: StorefrontClient, period: Duration) {
    info!(period_ms = period.as_millis() as u64, "Price drop timer starting");

    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if let Err(e) = client.price_drop_tick().await {
                    debug!(error = %e, "Service unavailable");
                    break;
                }
            }
            _ = client.closed() => break,
        }
    }

    info!("Price drop timer stopped");
}
