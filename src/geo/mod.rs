//! External location services
//!
//! Provides reverse geocoding (coordinates to address) and device location.
//! Both are collaborators of the selection workflow: the workflow only sees
//! the traits and failure types defined here.

pub mod device;
pub mod google;
pub mod ip_location;

use crate::config::Config;
use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Why a reverse-geocode lookup produced no address
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GeocodeFailure {
    /// No API key configured
    #[error("geocoding API key is missing")]
    MissingCredential,

    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Transport(String),

    /// The service found nothing at these coordinates
    #[error("no address found for these coordinates")]
    ZeroResults,

    /// The service answered with a non-OK status
    #[error("geocoding service returned status {0}")]
    Status(String),
}

/// Why the device could not provide a location
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LocationFailure {
    #[error("location is not supported on this device")]
    Unsupported,

    #[error("permission to read the location was denied")]
    PermissionDenied,

    #[error("timed out waiting for a location")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// Trait for reverse geocoding backends
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve coordinates to a display address
    ///
    /// One round trip, no retries.
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<String, GeocodeFailure>> + Send;
}

/// Trait for device location sources
pub trait DeviceLocator: Send + Sync {
    /// Get the device's current position (one shot)
    fn locate(&self) -> impl Future<Output = Result<Coordinates, LocationFailure>> + Send;
}

/// Build the configured geocoder
pub fn get_geocoder(config: &Config) -> google::GoogleGeocoder {
    google::GoogleGeocoder::new(config.geocoding_key(), &config.geocoding.endpoint)
}

/// Build the configured device locator
pub fn get_locator(config: &Config) -> device::Locator {
    device::Locator::from_config(config)
}
