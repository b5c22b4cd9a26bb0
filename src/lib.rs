//! pinpoint: service-area location confirmation
//!
//! A library and CLI tool that picks a geographic point (from the device or
//! from direct input), reverse-geocodes it into an address, checks it against
//! a configured set of service locations and confirms the selection.
//!
//! ## Features
//!
//! - Haversine distance and service-area containment
//! - Reverse geocoding through the Google Geocoding API
//! - Device location (IP based, fixed, or unsupported)
//! - An explicit selection state machine with stale-response discarding
//! - Event-driven session driver + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use pinpoint::coord::{Coordinates, ReferencePoint, ServiceArea};
//! use pinpoint::selection::{LocationSelector, Validation};
//!
//! let area = ServiceArea::new(
//!     vec![ReferencePoint::named("Hyderabad", 17.3850, 78.4867)],
//!     5.0,
//! )
//! .unwrap();
//! let mut selector = LocationSelector::new(area);
//!
//! // Selecting a point issues a reverse-geocode request
//! let request = selector.on_coordinate_change(Coordinates::new(17.3850, 78.4867));
//! selector.on_geocode_result(request.id, Ok("Hyderabad, Telangana".to_string()));
//!
//! selector.on_confirm();
//! assert_eq!(selector.snapshot().validation, Validation::WithinServiceArea);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod selection;

// Re-export commonly used types
pub use config::Config;
pub use coord::{Coordinates, ReferencePoint, ServiceArea};
pub use error::{Error, Result};
pub use selection::{LocationSelector, SelectionSnapshot};
