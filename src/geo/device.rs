//! Device location providers
//!
//! Picks the configured location source and enforces the request timeout.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::geo::ip_location::IpLocator;
use crate::geo::{DeviceLocator, LocationFailure};
use std::time::Duration;
use tracing::warn;

/// A locator that always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    coords: Coordinates,
}

impl FixedLocator {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

impl DeviceLocator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationFailure> {
        Ok(self.coords)
    }
}

/// A locator for devices without any location capability
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

impl DeviceLocator for UnsupportedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationFailure> {
        Err(LocationFailure::Unsupported)
    }
}

/// The configured location provider
#[derive(Debug, Clone)]
pub enum Locator {
    Ip(IpLocator),
    Fixed(FixedLocator),
    Unsupported(UnsupportedLocator),
}

impl Locator {
    /// Select a provider from `device.provider`
    ///
    /// Unknown providers and a `fixed` provider without a valid position
    /// degrade to `Unsupported`.
    pub fn from_config(config: &Config) -> Self {
        match config.device.provider.to_lowercase().as_str() {
            "ip" => Self::Ip(IpLocator::new()),
            "fixed" => match (config.device.fixed_lat, config.device.fixed_lng) {
                (Some(lat), Some(lng)) if Coordinates::new(lat, lng).is_valid() => {
                    Self::Fixed(FixedLocator::new(Coordinates::new(lat, lng)))
                }
                _ => {
                    warn!("device.provider is \"fixed\" but fixed_lat/fixed_lng are not set");
                    Self::Unsupported(UnsupportedLocator)
                }
            },
            "none" => Self::Unsupported(UnsupportedLocator),
            other => {
                warn!("Unknown device provider \"{}\"", other);
                Self::Unsupported(UnsupportedLocator)
            }
        }
    }

    /// Provider name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ip(_) => "ip",
            Self::Fixed(_) => "fixed",
            Self::Unsupported(_) => "none",
        }
    }
}

impl DeviceLocator for Locator {
    async fn locate(&self) -> Result<Coordinates, LocationFailure> {
        match self {
            Self::Ip(locator) => locator.locate().await,
            Self::Fixed(locator) => locator.locate().await,
            Self::Unsupported(locator) => locator.locate().await,
        }
    }
}

/// Ask `locator` for a position, giving up after `timeout`
pub async fn locate_with_timeout<L: DeviceLocator + ?Sized>(
    locator: &L,
    timeout: Duration,
) -> Result<Coordinates, LocationFailure> {
    match tokio::time::timeout(timeout, locator.locate()).await {
        Ok(result) => result,
        Err(_) => Err(LocationFailure::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverLocator;

    impl DeviceLocator for NeverLocator {
        async fn locate(&self) -> Result<Coordinates, LocationFailure> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_fixed_locator() {
        let locator = FixedLocator::new(Coordinates::new(17.385, 78.4867));
        assert_eq!(locator.locate().await, Ok(Coordinates::new(17.385, 78.4867)));
    }

    #[tokio::test]
    async fn test_unsupported_locator() {
        assert_eq!(UnsupportedLocator.locate().await, Err(LocationFailure::Unsupported));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let result = locate_with_timeout(&NeverLocator, Duration::from_millis(10_000)).await;
        assert_eq!(result, Err(LocationFailure::Timeout));
    }

    #[tokio::test]
    async fn test_within_timeout() {
        let locator = FixedLocator::new(Coordinates::new(1.0, 2.0));
        let result = locate_with_timeout(&locator, Duration::from_secs(1)).await;
        assert_eq!(result, Ok(Coordinates::new(1.0, 2.0)));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        assert_eq!(Locator::from_config(&config).name(), "ip");

        config.device.provider = "fixed".to_string();
        assert_eq!(Locator::from_config(&config).name(), "none");

        config.device.fixed_lat = Some(17.385);
        config.device.fixed_lng = Some(78.4867);
        assert_eq!(Locator::from_config(&config).name(), "fixed");

        config.device.provider = "none".to_string();
        assert_eq!(Locator::from_config(&config).name(), "none");

        config.device.provider = "gps".to_string();
        assert_eq!(Locator::from_config(&config).name(), "none");
    }
}
