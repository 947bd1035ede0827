use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actors::StorefrontService;
use crate::cart::{CartLedger, CartStorage, FileCartStorage};
use crate::catalog::Catalog;
use crate::clients::StorefrontClient;
use crate::config::StorefrontConfig;
use crate::domain::{GeoLocation, Store};
use crate::locator::{
    self, seed, FixedLocation, Geocoder, LocationProvider, MapBounds, OfflineGeocoder, StoreDirectory, StoreMap,
};
use crate::simulator::run_price_drop_timer;

/// The running storefront: the service actor, its price-drop timer and the
/// static store list.
///
/// Responsible for starting the tasks, wiring them together, and handling
/// shutdown.
pub struct StorefrontSystem {
    pub client: StorefrontClient,
    stores: Vec<Store>,
    location: Box<dyn LocationProvider>,
    geocoder: Box<dyn Geocoder>,
    map_bounds: MapBounds,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Starts a session over the seeded catalog and store list, with the cart
    /// persisted under `config.data_dir`.
    pub fn start(config: &StorefrontConfig) -> Self {
        let storage = FileCartStorage::new(&config.data_dir);
        let location = match config.home_location {
            Some(point) => FixedLocation::at(point),
            None => FixedLocation::unavailable(),
        };
        Self::start_with(
            config,
            Catalog::seeded(),
            Box::new(storage),
            Box::new(location),
            None,
        )
    }

    /// Starts a session from explicit parts. A `rng` makes price drops and
    /// order ids reproducible.
    pub fn start_with(
        config: &StorefrontConfig,
        catalog: Catalog,
        storage: Box<dyn CartStorage>,
        location: Box<dyn LocationProvider>,
        rng: Option<StdRng>,
    ) -> Self {
        // 1. Cart restored before the service takes ownership of it
        let cart = CartLedger::load(storage);

        // 2. Storefront service
        let (service, client) = StorefrontService::new(config, catalog, cart);
        let service = match rng {
            Some(rng) => service.with_rng(rng),
            None => service,
        };
        let service_handle = tokio::spawn(service.run());

        // 3. Price drop timer, talking to the service like any other client
        let timer_handle = tokio::spawn(run_price_drop_timer(client.clone(), config.tick_interval));

        info!("Storefront started");
        Self {
            client,
            stores: seed::stores(),
            location,
            geocoder: Box::new(OfflineGeocoder),
            map_bounds: MapBounds::default(),
            handles: vec![service_handle, timer_handle],
        }
    }

    /// Swaps the address lookup service, offline by default.
    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Store list for the locator page, nearest first when the shopper's
    /// position is known.
    pub async fn nearby_stores(&self) -> StoreDirectory {
        locator::locate_nearby(self.location.as_ref(), &self.stores).await
    }

    /// Map panel contents for `directory`.
    pub async fn store_map(&self, directory: &StoreDirectory) -> StoreMap {
        locator::build_store_map(directory, &self.map_bounds, self.geocoder.as_ref()).await
    }

    /// Coordinates for a typed delivery address, if the geocoder knows it.
    pub async fn resolve_address(&self, address: &str) -> Option<GeoLocation> {
        locator::resolve_address(self.geocoder.as_ref(), address).await
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        // The timer holds its own client, so the service has to be told to
        // stop; the timer follows once the channel closes.
        if let Err(e) = self.client.shutdown().await {
            error!(error = %e, "Service already stopped");
        }
        drop(self.client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
