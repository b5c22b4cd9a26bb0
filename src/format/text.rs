//! Human-readable text output formatter

use crate::config::Config;
use crate::coord::distance::nearest_reference;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::selection::{AddressLookup, Phase, SelectionSnapshot, Validation};

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl TextFormatter {
    fn address_line(snapshot: &SelectionSnapshot) -> String {
        match &snapshot.address_lookup {
            AddressLookup::Idle => "Address: -".to_string(),
            AddressLookup::Pending => "Address: looking up...".to_string(),
            AddressLookup::Succeeded => format!("Address: {}", snapshot.address_or_fallback()),
            AddressLookup::Failed(reason) => format!("Address: unavailable ({})", reason),
        }
    }

    fn validation_line(snapshot: &SelectionSnapshot, config: &Config) -> String {
        let limit = config.service_area.max_distance_km;
        match snapshot.validation {
            Validation::NotChecked => "Service area: not checked yet".to_string(),
            Validation::WithinServiceArea => {
                format!("Service area: within {} km of a service location", limit)
            }
            Validation::OutsideServiceArea => {
                let nearest = snapshot
                    .coordinates
                    .and_then(|coords| nearest_reference(coords, &config.service_area.locations));
                match nearest {
                    Some((reference, distance)) => format!(
                        "Service area: OUTSIDE (nearest is {}, {:.1} km away; limit {} km)",
                        reference.label(),
                        distance,
                        limit
                    ),
                    None => "Service area: OUTSIDE".to_string(),
                }
            }
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, snapshot: &SelectionSnapshot, config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Status: {}\n", snapshot.phase()));

        match snapshot.coordinates {
            Some(coords) => {
                output.push_str(&format!("Coordinates: {}\n", coords));
                output.push_str(&Self::address_line(snapshot));
                output.push('\n');
                output.push_str(&Self::validation_line(snapshot, config));
                output.push('\n');
            }
            None if snapshot.phase() == Phase::AwaitingFirstInput => {
                output.push_str("Fetching your location...\n");
            }
            None => {
                output.push_str(&format!(
                    "No location selected. Map centred on {} (zoom {})\n",
                    config.initial_coordinates(),
                    config.map.zoom
                ));
            }
        }

        if let Some(confirmed) = &snapshot.confirmed {
            output.push_str(&format!("Confirmed: {}\n", confirmed.address));
            output.push_str(&format!(
                "Map: {}\n",
                config.format_url(None, confirmed.coordinates)?
            ));
        }

        if let Some(error) = &snapshot.location_error {
            output.push_str(&format!("Location error: {}\n", error));
        }

        Ok(output)
    }
}
