//! Store list ordering by distance and map placement.

pub mod geo;
pub mod seed;

use std::cmp::Ordering;

use tracing::{info, warn};

pub use geo::{label_point, resolve_address, FixedLocation, Geocoder, LocationProvider, OfflineGeocoder};

use crate::domain::{GeoLocation, Store, StoreId};
use crate::error::LocatorError;

/// Shown above the store list when the shopper's location is unknown.
pub const LOCATION_ADVISORY: &str = "Could not retrieve your location. Showing all stores.";

/// One row of the store list.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreListing {
    pub store: Store,
    /// Distance from the shopper, when their location is known.
    pub distance_km: Option<f64>,
}

impl StoreListing {
    /// `"2.3 km away"`, or nothing without a distance.
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(|km| format!("{km:.1} km away"))
    }
}

/// The store list as the locator page shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDirectory {
    pub listings: Vec<StoreListing>,
    pub user_location: Option<GeoLocation>,
    pub advisory: Option<String>,
}

impl StoreDirectory {
    pub fn nearest(&self) -> Option<&Store> {
        self.user_location?;
        self.listings.first().map(|listing| &listing.store)
    }

    pub fn find(&self, id: StoreId) -> Option<&StoreListing> {
        self.listings.iter().find(|listing| listing.store.id == id)
    }
}

/// Orders `stores` nearest first from `user_location`; without a location the
/// list keeps its original order and carries the advisory.
pub fn locate_stores(stores: &[Store], user_location: Option<GeoLocation>) -> StoreDirectory {
    let Some(origin) = user_location else {
        return StoreDirectory {
            listings: stores
                .iter()
                .cloned()
                .map(|store| StoreListing {
                    store,
                    distance_km: None,
                })
                .collect(),
            user_location: None,
            advisory: Some(LOCATION_ADVISORY.to_string()),
        };
    };

    let mut listings: Vec<StoreListing> = stores
        .iter()
        .cloned()
        .map(|store| {
            let distance = origin.distance_km(&store.location);
            StoreListing {
                store,
                distance_km: Some(distance),
            }
        })
        .collect();
    listings.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });

    StoreDirectory {
        listings,
        user_location: Some(origin),
        advisory: None,
    }
}

/// Asks `provider` for the shopper's position and builds the directory,
/// degrading to the unsorted list if the position cannot be read.
pub async fn locate_nearby(provider: &dyn LocationProvider, stores: &[Store]) -> StoreDirectory {
    match provider.current_location().await {
        Ok(point) => {
            info!(latitude = point.latitude, longitude = point.longitude, "Located shopper");
            locate_stores(stores, Some(point))
        }
        Err(e) => {
            warn!(error = %e, "Could not get shopper location");
            let mut directory = locate_stores(stores, None);
            if e == LocatorError::Unsupported {
                directory.advisory = Some(e.to_string());
            }
            directory
        }
    }
}

/// Rectangle of the static map image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Default for MapBounds {
    /// Greater Lagos.
    fn default() -> Self {
        Self {
            min_lat: 6.40,
            max_lat: 6.70,
            min_lng: 3.25,
            max_lng: 3.50,
        }
    }
}

impl MapBounds {
    /// Pin position as `(top %, left %)`; north is up.
    pub fn project(&self, point: &GeoLocation) -> (f64, f64) {
        let top = 100.0 - (point.latitude - self.min_lat) / (self.max_lat - self.min_lat) * 100.0;
        let left = (point.longitude - self.min_lng) / (self.max_lng - self.min_lng) * 100.0;
        (top, left)
    }
}

/// A store marker on the static map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub store_id: StoreId,
    pub name: String,
    pub is_open: bool,
    pub top: f64,
    pub left: f64,
}

/// Everything the map panel draws: store pins in list order and the
/// shopper's own pin with its address label.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreMap {
    pub pins: Vec<MapPin>,
    pub user_pin: Option<(f64, f64)>,
    pub user_label: Option<String>,
}

/// Places the directory's stores and the shopper on `bounds`, labelling the
/// shopper's position through `geocoder`.
pub async fn build_store_map(directory: &StoreDirectory, bounds: &MapBounds, geocoder: &dyn Geocoder) -> StoreMap {
    let pins = directory
        .listings
        .iter()
        .map(|listing| {
            let (top, left) = bounds.project(&listing.store.location);
            MapPin {
                store_id: listing.store.id,
                name: listing.store.name.clone(),
                is_open: listing.store.is_open,
                top,
                left,
            }
        })
        .collect();

    let (user_pin, user_label) = match directory.user_location {
        Some(point) => (Some(bounds.project(&point)), Some(label_point(geocoder, point).await)),
        None => (None, None),
    };

    StoreMap {
        pins,
        user_pin,
        user_label,
    }
}
