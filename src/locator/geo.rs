//! Seams to the device location and the external geocoding service.
//!
//! Neither ships a network implementation here. Callers go through
//! [`resolve_address`] and [`label_point`], which never fail: lookups that
//! error degrade to "no result" or to the raw coordinates.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::GeoLocation;
use crate::error::LocatorError;

/// One-shot read of the shopper's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<GeoLocation, LocatorError>;
}

/// Forward and reverse address lookups.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, address: &str) -> Result<GeoLocation, LocatorError>;
    async fn reverse(&self, point: GeoLocation) -> Result<String, LocatorError>;
}

/// Location provider that always reports the same point, or no location at all.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    point: Option<GeoLocation>,
}

impl FixedLocation {
    pub fn at(point: GeoLocation) -> Self {
        Self { point: Some(point) }
    }

    pub fn unavailable() -> Self {
        Self { point: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<GeoLocation, LocatorError> {
        self.point.ok_or(LocatorError::Unsupported)
    }
}

/// Geocoder for running without network access: every lookup fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineGeocoder;

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn forward(&self, address: &str) -> Result<GeoLocation, LocatorError> {
        Err(LocatorError::LookupFailed(format!("offline, cannot geocode {address:?}")))
    }

    async fn reverse(&self, point: GeoLocation) -> Result<String, LocatorError> {
        Err(LocatorError::LookupFailed(format!("offline, cannot reverse geocode {}", point.label())))
    }
}

/// Coordinates for `address`, or `None` if the lookup fails.
pub async fn resolve_address(geocoder: &dyn Geocoder, address: &str) -> Option<GeoLocation> {
    match geocoder.forward(address).await {
        Ok(point) => Some(point),
        Err(e) => {
            warn!(error = %e, "Address lookup failed");
            None
        }
    }
}

/// Address label for a pinned point, falling back to its raw coordinates.
pub async fn label_point(geocoder: &dyn Geocoder, point: GeoLocation) -> String {
    match geocoder.reverse(point).await {
        Ok(address) if !address.trim().is_empty() => address,
        Ok(_) => point.label(),
        Err(e) => {
            warn!(error = %e, "Reverse geocoding failed, showing coordinates");
            point.label()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KnownPlaces;

    #[async_trait]
    impl Geocoder for KnownPlaces {
        async fn forward(&self, address: &str) -> Result<GeoLocation, LocatorError> {
            match address {
                "Yaba" => Ok(GeoLocation::new(6.5095, 3.3711)),
                _ => Err(LocatorError::LookupFailed("no match".into())),
            }
        }

        async fn reverse(&self, _point: GeoLocation) -> Result<String, LocatorError> {
            Ok("32 Herbert Macaulay Way, Yaba".to_string())
        }
    }

    #[tokio::test]
    async fn test_label_point_prefers_address() {
        let label = label_point(&KnownPlaces, GeoLocation::new(6.5095, 3.3711)).await;
        assert_eq!(label, "32 Herbert Macaulay Way, Yaba");
    }

    #[tokio::test]
    async fn test_label_point_falls_back_to_coordinates() {
        let label = label_point(&OfflineGeocoder, GeoLocation::new(6.4523, 3.3912)).await;
        assert_eq!(label, "6.45230, 3.39120");
    }

    #[tokio::test]
    async fn test_resolve_address_degrades_to_none() {
        assert!(resolve_address(&KnownPlaces, "Yaba").await.is_some());
        assert!(resolve_address(&KnownPlaces, "Atlantis").await.is_none());
        assert!(resolve_address(&OfflineGeocoder, "Yaba").await.is_none());
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let here = GeoLocation::new(6.5, 3.4);
        assert_eq!(FixedLocation::at(here).current_location().await, Ok(here));
        assert_eq!(
            FixedLocation::unavailable().current_location().await,
            Err(LocatorError::Unsupported)
        );
    }
}
