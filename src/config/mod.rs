//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/pinpoint/config.toml

pub mod defaults;

use crate::constants::api::{GEOCODING_KEY_ENV, GOOGLE_GEOCODE_URL};
use crate::coord::{Coordinates, ReferencePoint, ServiceArea};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the offering is available
    #[serde(default)]
    pub service_area: ServiceAreaConfig,

    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Device location settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Map surface settings
    #[serde(default)]
    pub map: MapConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Service area settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAreaConfig {
    /// Maximum distance from any location, in kilometers
    #[serde(default = "default_max_distance")]
    pub max_distance_km: f64,

    /// Reference locations
    #[serde(default = "default_locations")]
    pub locations: Vec<ReferencePoint>,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Geocoding API key (GOOGLE_MAPS_KEY overrides it)
    #[serde(default)]
    pub api_key: String,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Location provider: ip, fixed or none
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Give up on a location request after this many milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Position reported by the fixed provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lng: Option<f64>,
}

/// Map surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Centre shown before any point is chosen
    #[serde(default = "default_initial_lat")]
    pub initial_lat: f64,

    #[serde(default = "default_initial_lng")]
    pub initial_lng: f64,

    /// Zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_KM
}
fn default_endpoint() -> String {
    GOOGLE_GEOCODE_URL.to_string()
}
fn default_provider() -> String {
    DEFAULT_DEVICE_PROVIDER.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_initial_lat() -> f64 {
    DEFAULT_INITIAL_LAT
}
fn default_initial_lng() -> f64 {
    DEFAULT_INITIAL_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps?q={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for ServiceAreaConfig {
    fn default() -> Self {
        Self {
            max_distance_km: default_max_distance(),
            locations: default_locations(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout_ms: default_timeout_ms(),
            fixed_lat: None,
            fixed_lng: None,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_lat: default_initial_lat(),
            initial_lng: default_initial_lng(),
            zoom: default_zoom(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

/// Parse an optional coordinate component; an empty string clears it
fn parse_optional(value: &str, what: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_value(value, what).map(Some)
    }
}

/// Reject a latitude outside [-90, 90]
fn check_latitude(lat: f64) -> Result<f64> {
    Coordinates::new(lat, 0.0).validate()?;
    Ok(lat)
}

/// Reject a longitude outside [-180, 180]
fn check_longitude(lng: f64) -> Result<f64> {
    Coordinates::new(0.0, lng).validate()?;
    Ok(lng)
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    ///
    /// Creates default config there if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["service_area", "max_distance_km"] => {
                Some(self.service_area.max_distance_km.to_string())
            }

            ["geocoding", "endpoint"] => Some(self.geocoding.endpoint.clone()),
            ["geocoding", "api_key"] => Some(self.geocoding.api_key.clone()),

            ["device", "provider"] => Some(self.device.provider.clone()),
            ["device", "timeout_ms"] => Some(self.device.timeout_ms.to_string()),
            ["device", "fixed_lat"] => Some(
                self.device.fixed_lat.map(|v| v.to_string()).unwrap_or_default(),
            ),
            ["device", "fixed_lng"] => Some(
                self.device.fixed_lng.map(|v| v.to_string()).unwrap_or_default(),
            ),

            ["map", "initial_lat"] => Some(self.map.initial_lat.to_string()),
            ["map", "initial_lng"] => Some(self.map.initial_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["service_area", "max_distance_km"] => {
                let distance: f64 = parse_value(value, "distance")?;
                if !distance.is_finite() || distance <= 0.0 {
                    return Err(Error::Config(format!(
                        "Distance must be positive: {}",
                        value
                    )));
                }
                self.service_area.max_distance_km = distance;
            }

            ["geocoding", "endpoint"] => {
                self.geocoding.endpoint = value.to_string();
            }
            ["geocoding", "api_key"] => {
                self.geocoding.api_key = value.to_string();
            }

            ["device", "provider"] => {
                self.device.provider = value.to_string();
            }
            ["device", "timeout_ms"] => {
                self.device.timeout_ms = parse_value(value, "timeout")?;
            }
            ["device", "fixed_lat"] => {
                self.device.fixed_lat =
                    parse_optional(value, "latitude")?.map(check_latitude).transpose()?;
            }
            ["device", "fixed_lng"] => {
                self.device.fixed_lng =
                    parse_optional(value, "longitude")?.map(check_longitude).transpose()?;
            }

            ["map", "initial_lat"] => {
                self.map.initial_lat = check_latitude(parse_value(value, "latitude")?)?;
            }
            ["map", "initial_lng"] => {
                self.map.initial_lng = check_longitude(parse_value(value, "longitude")?)?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(value, "zoom")?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "service_area.max_distance_km",
            "geocoding.endpoint",
            "geocoding.api_key",
            "device.provider",
            "device.timeout_ms",
            "device.fixed_lat",
            "device.fixed_lng",
            "map.initial_lat",
            "map.initial_lng",
            "map.zoom",
            "url.default",
        ]
    }

    /// Build the validated service area
    pub fn service_area(&self) -> Result<ServiceArea> {
        let area = ServiceArea::new(
            self.service_area.locations.clone(),
            self.service_area.max_distance_km,
        )?;

        if area.is_empty() {
            return Err(Error::Config(
                "service_area.locations must list at least one location".to_string(),
            ));
        }

        Ok(area)
    }

    /// The geocoding API key, preferring the environment over the file
    pub fn geocoding_key(&self) -> Option<String> {
        std::env::var(GEOCODING_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| Some(self.geocoding.api_key.clone()).filter(|key| !key.trim().is_empty()))
    }

    /// Device location timeout
    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.device.timeout_ms)
    }

    /// Map centre shown before any point is chosen
    pub fn initial_coordinates(&self) -> Coordinates {
        Coordinates::new(self.map.initial_lat, self.map.initial_lng)
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, coords: Coordinates) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &coords.lat.to_string())
            .replace("{lng}", &coords.lng.to_string()))
    }
}
