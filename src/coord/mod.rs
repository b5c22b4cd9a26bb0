//! Coordinates and service areas
//!
//! This module handles:
//! - The `Coordinates` value type and its range validation
//! - Parsing coordinates typed by a user ("lat,lng")
//! - Service areas: reference points sharing one distance threshold

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Returns true when both components are in range
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_coordinates(s)
    }
}

/// Parse "lat,lng" (whitespace around either part is ignored)
///
/// The result is range-checked, so anything returned here is safe to feed
/// into the selection workflow.
pub fn parse_coordinates(input: &str) -> Result<Coordinates> {
    let (lat, lng) = input.split_once(',').ok_or_else(|| {
        Error::InvalidCoordinates(format!("Expected \"lat,lng\", got \"{}\"", input.trim()))
    })?;

    let lat: f64 = lat.trim().parse().map_err(|_| {
        Error::InvalidCoordinates(format!("Invalid latitude: {}", lat.trim()))
    })?;
    let lng: f64 = lng.trim().parse().map_err(|_| {
        Error::InvalidCoordinates(format!("Invalid longitude: {}", lng.trim()))
    })?;

    let coords = Coordinates::new(lat, lng);
    coords.validate()?;
    Ok(coords)
}

/// A service-area member as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Display name (e.g. the city)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl ReferencePoint {
    /// Create an unnamed reference point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { name: None, lat, lng }
    }

    /// Create a named reference point
    pub fn named(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: Some(name.into()),
            lat,
            lng,
        }
    }

    /// The reference point's position
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Name for display, falling back to the coordinates
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.coords().to_string(),
        }
    }
}

/// Where the offering is available: reference points plus one shared
/// maximum distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceArea {
    points: Vec<ReferencePoint>,
    max_distance_km: f64,
}

impl ServiceArea {
    /// Build a service area
    ///
    /// Fails if the threshold is not a positive finite number or a reference
    /// point is out of range.
    pub fn new(points: Vec<ReferencePoint>, max_distance_km: f64) -> Result<Self> {
        if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
            return Err(Error::InvalidServiceArea(format!(
                "Maximum distance must be positive, got {}",
                max_distance_km
            )));
        }

        for point in &points {
            point.coords().validate().map_err(|e| {
                Error::InvalidServiceArea(format!("Reference point {}: {}", point.label(), e))
            })?;
        }

        Ok(Self {
            points,
            max_distance_km,
        })
    }

    /// Reference points
    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    /// Shared maximum distance in kilometers
    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    /// True if there are no reference points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if `point` is within the threshold of any reference point
    pub fn contains(&self, point: Coordinates) -> bool {
        distance::is_within_service_area(point, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Coordinates::new(17.385, 78.4867).validate().is_ok());
        assert!(Coordinates::new(90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(90.1, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, 180.5).validate().is_err());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_parse_coordinates() {
        let coords = parse_coordinates(" 17.4933 , 78.3915 ").unwrap();
        assert_eq!(coords, Coordinates::new(17.4933, 78.3915));

        let coords: Coordinates = "-33.8688,151.2093".parse().unwrap();
        assert_eq!(coords.lat, -33.8688);
    }

    #[test]
    fn test_parse_coordinates_invalid() {
        assert!(parse_coordinates("17.4933").is_err());
        assert!(parse_coordinates("north,78.3").is_err());
        assert!(parse_coordinates("17.4,east").is_err());
        assert!(parse_coordinates("95.0,10.0").is_err());
    }

    #[test]
    fn test_display() {
        let coords = Coordinates::new(17.385044, 78.486671);
        assert_eq!(coords.to_string(), "17.38504, 78.48667");
    }

    #[test]
    fn test_reference_point_label() {
        assert_eq!(ReferencePoint::named("Delhi", 28.6139, 77.209).label(), "Delhi");
        assert_eq!(ReferencePoint::new(1.0, 2.0).label(), "1.00000, 2.00000");
    }

    #[test]
    fn test_service_area_rejects_bad_threshold() {
        let points = vec![ReferencePoint::new(17.385, 78.4867)];
        assert!(ServiceArea::new(points.clone(), 0.0).is_err());
        assert!(ServiceArea::new(points.clone(), -5.0).is_err());
        assert!(ServiceArea::new(points.clone(), f64::INFINITY).is_err());
        assert!(ServiceArea::new(points, 5.0).is_ok());
    }

    #[test]
    fn test_service_area_rejects_bad_point() {
        let points = vec![ReferencePoint::named("Nowhere", 120.0, 0.0)];
        let err = ServiceArea::new(points, 5.0).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }
}
