//! Centralized constants for the pinpoint crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// Google Geocoding API (reverse lookups use the `latlng` parameter)
    pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Environment variable that overrides the configured geocoding key
    pub const GEOCODING_KEY_ENV: &str = "GOOGLE_MAPS_KEY";
}

/// Selection workflow
pub mod selection {
    /// Address recorded on a confirmation made before an address is known
    pub const ADDRESS_FALLBACK: &str = "Address not available";

    /// Default device location timeout in milliseconds
    pub const DEFAULT_LOCATE_TIMEOUT_MS: u64 = 10_000;
}
