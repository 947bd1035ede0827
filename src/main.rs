use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn, Instrument};

use storefront_notifier::app_system::{setup_tracing, StorefrontSystem};
use storefront_notifier::catalog::ProductFilter;
use storefront_notifier::checkout::CheckoutRequest;
use storefront_notifier::config::StorefrontConfig;
use storefront_notifier::domain::{format_naira, GeoLocation};
use storefront_notifier::navigator::Page;
use storefront_notifier::notifications::format_relative_age;

/// Runs a scripted storefront session with live price drops.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
struct Cli {
    /// Milliseconds between simulated price drops
    #[arg(long, default_value_t = 5_000)]
    tick_ms: u64,

    /// Milliseconds the simulated payment takes
    #[arg(long, default_value_t = 2_000)]
    payment_delay_ms: u64,

    /// Directory holding the persisted cart
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Shopper latitude, used to sort stores by distance
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Shopper longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Start with price drop notifications switched off
    #[arg(long)]
    disable_notifications: bool,

    /// Seconds to browse before checking out
    #[arg(long, default_value_t = 12)]
    run_for_secs: u64,
}

impl Cli {
    fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
            payment_delay: Duration::from_millis(self.payment_delay_ms),
            data_dir: self.data_dir.clone(),
            notifications_enabled: !self.disable_notifications,
            home_location: self.lat.zip(self.lng).map(|(lat, lng)| GeoLocation::new(lat, lng)),
            ..StorefrontConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting storefront session");
    let system = StorefrontSystem::start(&cli.config());
    let client = &system.client;

    let span = tracing::info_span!("browsing");
    async {
        let products = client
            .list_products(ProductFilter::default())
            .await
            .map_err(|e| e.to_string())?;
        for product in &products {
            info!(
                id = product.id,
                name = %product.name,
                price = %format_naira(product.slashed_price),
                "Listed"
            );
        }

        let cheapest = products.iter().min_by_key(|p| p.slashed_price).map(|p| p.id);
        let priciest = products.iter().max_by_key(|p| p.slashed_price).map(|p| p.id);
        for id in cheapest.into_iter().chain(priciest) {
            let notice = client.add_to_cart(id).await.map_err(|e| e.to_string())?;
            info!(notice = %notice.message(), "Cart updated");
        }

        info!(seconds = cli.run_for_secs, "Waiting for price drops");
        tokio::time::sleep(Duration::from_secs(cli.run_for_secs)).await;

        let now = Utc::now();
        for notification in client
            .notifications(String::new())
            .await
            .map_err(|e| e.to_string())?
        {
            info!(
                age = %format_relative_age(notification.timestamp, now),
                message = %notification.message,
                "Notification"
            );
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let directory = system.nearby_stores().await;
    if let Some(advisory) = &directory.advisory {
        warn!("{advisory}");
    }
    let map = system.store_map(&directory).await;
    if let Some(label) = &map.user_label {
        info!(location = %label, "You are here");
    }
    for pin in &map.pins {
        info!(
            store_id = pin.store_id,
            name = %pin.name,
            open = pin.is_open,
            top = %format!("{:.1}%", pin.top),
            left = %format!("{:.1}%", pin.left),
            "Map pin"
        );
    }

    let store = directory
        .listings
        .iter()
        .find(|listing| listing.store.is_open)
        .map(|listing| listing.store.id);

    let span = tracing::info_span!("checkout");
    let result = async {
        client.navigate(Page::Checkout).await?;
        info!(store_id = ?store, "Paying for pickup");
        client
            .finalize_checkout(CheckoutRequest::pickup("shopper@example.com", store))
            .await
    }
    .instrument(span)
    .await;

    match result {
        Ok(order) => {
            info!(
                order_id = %order.order_id,
                total = %format_naira(order.total),
                "{}",
                order.confirmation_message()
            );
            if let Ok(Some(tracking)) = client.order_tracking().await {
                info!(
                    stage = tracking.current.title(),
                    progress = tracking.progress_percent(),
                    "Tracking"
                );
            }
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Session completed successfully");
    Ok(())
}
