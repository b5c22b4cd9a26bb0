//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::coord::ReferencePoint;

/// Default maximum distance from a service location, in kilometers
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 5.0;

/// Default device location provider
pub const DEFAULT_DEVICE_PROVIDER: &str = "ip";

/// Default device location timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = crate::constants::selection::DEFAULT_LOCATE_TIMEOUT_MS;

/// Default map centre before any point is chosen (New York City)
pub const DEFAULT_INITIAL_LAT: f64 = 40.7128;
pub const DEFAULT_INITIAL_LNG: f64 = -74.006;

/// Default map zoom level
pub const DEFAULT_ZOOM: u8 = 13;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "pinpoint";

/// Default service locations
pub fn default_locations() -> Vec<ReferencePoint> {
    vec![
        ReferencePoint::named("Hyderabad", 17.3850, 78.4867),
        ReferencePoint::named("Bangalore", 12.9716, 77.5946),
        ReferencePoint::named("Mumbai", 19.0760, 72.8777),
        ReferencePoint::named("Delhi", 28.6139, 77.2090),
        ReferencePoint::named("Chennai", 13.0827, 80.2707),
    ]
}
