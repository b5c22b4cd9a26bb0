//! Error types for pinpoint

use crate::geo::{GeocodeFailure, LocationFailure};
use thiserror::Error;

/// Main error type for pinpoint operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid service area: {0}")]
    InvalidServiceArea(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodeFailure),

    #[error("Location error: {0}")]
    Location(#[from] LocationFailure),

    #[error("Session error: {0}")]
    Session(String),
}

/// Result type alias for pinpoint operations
pub type Result<T> = std::result::Result<T, Error>;
