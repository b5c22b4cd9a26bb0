//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::selection::SelectionSnapshot;

/// URL formatter - outputs a map URL for the confirmed (or current) point
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        snapshot: &SelectionSnapshot,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let coords = snapshot
            .confirmed
            .as_ref()
            .map(|confirmed| confirmed.coordinates)
            .or(snapshot.coordinates)
            .ok_or_else(|| Error::InvalidCoordinates("No location selected".to_string()))?;

        config.format_url(provider, coords)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the selected point"
    }

    fn format(&self, snapshot: &SelectionSnapshot, config: &Config) -> Result<String> {
        self.format_with_provider(snapshot, config, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::selection::Confirmation;

    #[test]
    fn test_url_for_current_point() {
        let snapshot = SelectionSnapshot {
            coordinates: Some(Coordinates::new(17.4933, 78.3915)),
            ..Default::default()
        };

        let output = UrlFormatter.format(&snapshot, &Config::default()).unwrap();
        assert_eq!(output, "https://www.google.com/maps?q=17.4933,78.3915");
    }

    #[test]
    fn test_url_with_provider() {
        let coords = Coordinates::new(17.385, 78.4867);
        let snapshot = SelectionSnapshot {
            coordinates: Some(coords),
            confirmed: Some(Confirmation {
                coordinates: coords,
                address: "Somajiguda".to_string(),
            }),
            ..Default::default()
        };

        let output = UrlFormatter
            .format_with_provider(&snapshot, &Config::default(), Some("openstreetmap"))
            .unwrap();
        assert!(output.contains("openstreetmap.org"));
        assert!(output.contains("17.385"));
    }

    #[test]
    fn test_url_without_point() {
        let result = UrlFormatter.format(&SelectionSnapshot::default(), &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_url_formatter_info() {
        assert_eq!(UrlFormatter.name(), "url");
        assert!(!UrlFormatter.description().is_empty());
    }
}
