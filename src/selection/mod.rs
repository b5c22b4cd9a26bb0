//! Location selection workflow
//!
//! `LocationSelector` owns the selection state and reacts to four kinds of
//! input: a new coordinate, a reverse-geocode result, a device location
//! result and a confirmation request. It performs no I/O. Work that has to
//! happen elsewhere (an address lookup) is returned to the caller as a
//! request value, and results come back tagged with that request's id.
//!
//! Lookups are numbered from a monotonically increasing counter. Only the
//! result for the most recently issued lookup is applied, so a slow answer
//! for an old point can never overwrite the address of a newer one.

pub mod session;

use crate::constants::selection::ADDRESS_FALLBACK;
use crate::coord::{Coordinates, ServiceArea};
use crate::geo::{GeocodeFailure, LocationFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Sequence number of an address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An address lookup the caller must perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupRequest {
    pub id: RequestId,
    pub coordinates: Coordinates,
}

/// State of the address lookup for the current coordinate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum AddressLookup {
    /// No coordinate selected yet
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(GeocodeFailure),
}

impl AddressLookup {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Outcome of the service-area check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    #[default]
    NotChecked,
    WithinServiceArea,
    OutsideServiceArea,
}

/// A confirmed selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub coordinates: Coordinates,
    pub address: String,
}

/// Where the workflow stands, derived from the snapshot fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing requested yet
    Idle,
    /// Waiting for the device to report a first position
    AwaitingFirstInput,
    /// A point is selected but not (successfully) confirmed
    CoordinateSelected,
    /// The selected point failed the service-area check
    ValidatedOutside,
    /// The selected point passed the check and is confirmed
    Confirmed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingFirstInput => write!(f, "awaiting first input"),
            Self::CoordinateSelected => write!(f, "coordinate selected"),
            Self::ValidatedOutside => write!(f, "outside service area"),
            Self::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Read-only view of the selection state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
    pub address_lookup: AddressLookup,
    pub validation: Validation,
    pub confirmed: Option<Confirmation>,
    /// A device location request is in flight
    pub locating: bool,
    /// Last device location failure, kept until the next request
    pub location_error: Option<LocationFailure>,
}

impl SelectionSnapshot {
    /// Derive the workflow phase
    pub fn phase(&self) -> Phase {
        if self.confirmed.is_some() {
            return Phase::Confirmed;
        }
        match (self.coordinates, self.validation) {
            (Some(_), Validation::OutsideServiceArea) => Phase::ValidatedOutside,
            (Some(_), _) => Phase::CoordinateSelected,
            (None, _) if self.locating => Phase::AwaitingFirstInput,
            (None, _) => Phase::Idle,
        }
    }

    /// The address to show, or the fallback text when there is none
    pub fn address_or_fallback(&self) -> &str {
        self.address.as_deref().unwrap_or(ADDRESS_FALLBACK)
    }
}

/// The selection state machine
#[derive(Debug, Clone)]
pub struct LocationSelector {
    area: ServiceArea,
    state: SelectionSnapshot,
    last_issued: u64,
    /// Lookup whose result is still wanted
    awaiting: Option<RequestId>,
    /// Device requests not yet answered
    pending_locates: u32,
}

impl LocationSelector {
    /// Create a selector validating against `area`
    pub fn new(area: ServiceArea) -> Self {
        Self {
            area,
            state: SelectionSnapshot::default(),
            last_issued: 0,
            awaiting: None,
            pending_locates: 0,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.state
    }

    /// Service area used for validation
    pub fn service_area(&self) -> &ServiceArea {
        &self.area
    }

    /// A new point was chosen
    ///
    /// Resets validation and any confirmation, marks the address lookup
    /// pending and returns the lookup the caller must perform.
    ///
    /// `coords` must be in range; map and device sources never emit
    /// anything else.
    pub fn on_coordinate_change(&mut self, coords: Coordinates) -> LookupRequest {
        debug_assert!(coords.is_valid(), "coordinate out of range: {:?}", coords);

        self.last_issued += 1;
        let id = RequestId(self.last_issued);

        self.state.coordinates = Some(coords);
        self.state.address = None;
        self.state.address_lookup = AddressLookup::Pending;
        self.state.validation = Validation::NotChecked;
        self.state.confirmed = None;
        self.awaiting = Some(id);

        debug!("Selected {} (lookup {})", coords, id);

        LookupRequest {
            id,
            coordinates: coords,
        }
    }

    /// An address lookup finished
    ///
    /// Results for anything but the latest lookup are dropped. Returns
    /// whether the result was applied.
    pub fn on_geocode_result(
        &mut self,
        id: RequestId,
        result: Result<String, GeocodeFailure>,
    ) -> bool {
        if self.awaiting != Some(id) {
            debug!("Discarding stale lookup {} (awaiting {:?})", id, self.awaiting);
            return false;
        }
        self.awaiting = None;

        match result {
            Ok(address) => {
                self.state.address = Some(address);
                self.state.address_lookup = AddressLookup::Succeeded;
            }
            Err(reason) => {
                self.state.address = None;
                self.state.address_lookup = AddressLookup::Failed(reason);
            }
        }
        true
    }

    /// The user asked for their own location
    ///
    /// Marks a device request in flight and clears the previous device
    /// error. The current coordinate is left alone. Requests may overlap;
    /// `locating` stays set until every one of them has answered.
    pub fn on_use_my_location(&mut self) {
        self.pending_locates += 1;
        self.state.locating = true;
        self.state.location_error = None;
    }

    /// The device answered a location request
    ///
    /// On success this is a coordinate change and the resulting lookup is
    /// returned. On failure only the device error indicator changes.
    pub fn on_location_result(
        &mut self,
        result: Result<Coordinates, LocationFailure>,
    ) -> Option<LookupRequest> {
        self.pending_locates = self.pending_locates.saturating_sub(1);
        self.state.locating = self.pending_locates > 0;

        match result {
            Ok(coords) => Some(self.on_coordinate_change(coords)),
            Err(reason) => {
                self.state.location_error = Some(reason);
                None
            }
        }
    }

    /// The user asked to confirm the current point
    ///
    /// Does nothing without a coordinate. Otherwise checks the point
    /// against the service area and confirms or rejects it; the address
    /// lookup does not need to have finished.
    pub fn on_confirm(&mut self) -> Option<Validation> {
        let coords = self.state.coordinates?;

        if self.area.contains(coords) {
            let address = self.state.address_or_fallback().to_string();
            info!("Confirmed {} ({})", coords, address);

            self.state.validation = Validation::WithinServiceArea;
            self.state.confirmed = Some(Confirmation {
                coordinates: coords,
                address,
            });
        } else {
            info!("Rejected {}: outside service area", coords);

            self.state.validation = Validation::OutsideServiceArea;
            self.state.confirmed = None;
        }

        Some(self.state.validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ReferencePoint;

    fn hyderabad_centre() -> Coordinates {
        Coordinates::new(17.3850, 78.4867)
    }

    fn kukatpally() -> Coordinates {
        Coordinates::new(17.4933, 78.3915)
    }

    fn selector() -> LocationSelector {
        let area = ServiceArea::new(
            vec![ReferencePoint::named("Hyderabad", 17.3850, 78.4867)],
            5.0,
        )
        .unwrap();
        LocationSelector::new(area)
    }

    #[test]
    fn test_initial_state() {
        let selector = selector();
        let state = selector.snapshot();

        assert_eq!(state.coordinates, None);
        assert_eq!(state.address_lookup, AddressLookup::Idle);
        assert_eq!(state.validation, Validation::NotChecked);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_coordinate_change_issues_lookup() {
        let mut selector = selector();

        let request = selector.on_coordinate_change(hyderabad_centre());
        assert_eq!(request.coordinates, hyderabad_centre());

        let state = selector.snapshot();
        assert_eq!(state.coordinates, Some(hyderabad_centre()));
        assert!(state.address_lookup.is_pending());
        assert_eq!(state.phase(), Phase::CoordinateSelected);
    }

    #[test]
    fn test_request_ids_increase() {
        let mut selector = selector();

        let first = selector.on_coordinate_change(hyderabad_centre());
        let second = selector.on_coordinate_change(hyderabad_centre());
        let third = selector.on_coordinate_change(kukatpally());

        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn test_geocode_success() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());

        assert!(selector.on_geocode_result(request.id, Ok("Somajiguda, Hyderabad".to_string())));

        let state = selector.snapshot();
        assert_eq!(state.address.as_deref(), Some("Somajiguda, Hyderabad"));
        assert_eq!(state.address_lookup, AddressLookup::Succeeded);
    }

    #[test]
    fn test_geocode_failure_clears_address() {
        let mut selector = selector();
        let first = selector.on_coordinate_change(hyderabad_centre());
        selector.on_geocode_result(first.id, Ok("Somajiguda".to_string()));

        let second = selector.on_coordinate_change(kukatpally());
        selector.on_geocode_result(second.id, Err(GeocodeFailure::ZeroResults));

        let state = selector.snapshot();
        assert_eq!(state.address, None);
        assert_eq!(state.address_lookup, AddressLookup::Failed(GeocodeFailure::ZeroResults));
        assert_eq!(state.address_or_fallback(), "Address not available");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut selector = selector();
        let c1 = selector.on_coordinate_change(hyderabad_centre());
        let c2 = selector.on_coordinate_change(kukatpally());

        // c1 resolves late
        assert!(!selector.on_geocode_result(c1.id, Ok("Somajiguda".to_string())));
        assert_eq!(selector.snapshot().address, None);
        assert!(selector.snapshot().address_lookup.is_pending());

        assert!(selector.on_geocode_result(c2.id, Ok("Kukatpally".to_string())));
        assert_eq!(selector.snapshot().address.as_deref(), Some("Kukatpally"));

        // and even later, after c2 has landed
        assert!(!selector.on_geocode_result(c1.id, Err(GeocodeFailure::ZeroResults)));
        assert_eq!(selector.snapshot().address.as_deref(), Some("Kukatpally"));
        assert_eq!(selector.snapshot().address_lookup, AddressLookup::Succeeded);
    }

    #[test]
    fn test_same_point_twice_still_discards_older_lookup() {
        let mut selector = selector();
        let first = selector.on_coordinate_change(hyderabad_centre());
        let second = selector.on_coordinate_change(hyderabad_centre());

        assert!(!selector.on_geocode_result(first.id, Ok("old".to_string())));
        assert!(selector.on_geocode_result(second.id, Ok("new".to_string())));
        assert_eq!(selector.snapshot().address.as_deref(), Some("new"));
    }

    #[test]
    fn test_duplicate_result_is_ignored() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());

        assert!(selector.on_geocode_result(request.id, Ok("first".to_string())));
        assert!(!selector.on_geocode_result(request.id, Ok("second".to_string())));
        assert_eq!(selector.snapshot().address.as_deref(), Some("first"));
    }

    #[test]
    fn test_confirm_without_coordinate_is_noop() {
        let mut selector = selector();
        let before = selector.snapshot().clone();

        assert_eq!(selector.on_confirm(), None);
        assert_eq!(selector.snapshot(), &before);
    }

    #[test]
    fn test_confirm_within_area() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());
        selector.on_geocode_result(request.id, Ok("Somajiguda, Hyderabad".to_string()));

        assert_eq!(selector.on_confirm(), Some(Validation::WithinServiceArea));

        let state = selector.snapshot();
        assert_eq!(state.phase(), Phase::Confirmed);
        assert_eq!(
            state.confirmed,
            Some(Confirmation {
                coordinates: hyderabad_centre(),
                address: "Somajiguda, Hyderabad".to_string(),
            })
        );
    }

    #[test]
    fn test_confirm_with_pending_lookup_uses_fallback() {
        let mut selector = selector();
        selector.on_coordinate_change(hyderabad_centre());

        selector.on_confirm();

        let confirmed = selector.snapshot().confirmed.clone().unwrap();
        assert_eq!(confirmed.address, "Address not available");
        assert_eq!(confirmed.coordinates, hyderabad_centre());
        assert!(selector.snapshot().address_lookup.is_pending());
    }

    #[test]
    fn test_confirm_with_failed_lookup_uses_fallback() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());
        selector.on_geocode_result(request.id, Err(GeocodeFailure::MissingCredential));

        selector.on_confirm();
        assert_eq!(
            selector.snapshot().confirmed.as_ref().map(|c| c.address.as_str()),
            Some("Address not available")
        );
    }

    #[test]
    fn test_confirm_outside_area_rejects() {
        let mut selector = selector();
        selector.on_coordinate_change(kukatpally());

        assert_eq!(selector.on_confirm(), Some(Validation::OutsideServiceArea));

        let state = selector.snapshot();
        assert_eq!(state.confirmed, None);
        assert_eq!(state.phase(), Phase::ValidatedOutside);
    }

    #[test]
    fn test_rejection_clears_prior_confirmation() {
        let mut selector = selector();
        selector.on_coordinate_change(hyderabad_centre());
        selector.on_confirm();
        assert!(selector.snapshot().confirmed.is_some());

        selector.on_coordinate_change(kukatpally());
        assert_eq!(selector.snapshot().confirmed, None);
        selector.on_confirm();

        assert_eq!(selector.snapshot().validation, Validation::OutsideServiceArea);
        assert_eq!(selector.snapshot().confirmed, None);
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());
        selector.on_geocode_result(request.id, Ok("Somajiguda".to_string()));

        selector.on_confirm();
        let first = selector.snapshot().clone();
        selector.on_confirm();

        assert_eq!(selector.snapshot(), &first);
    }

    #[test]
    fn test_coordinate_change_resets_confirmation() {
        let mut selector = selector();
        selector.on_coordinate_change(hyderabad_centre());
        selector.on_confirm();

        selector.on_coordinate_change(Coordinates::new(17.40, 78.50));

        let state = selector.snapshot();
        assert_eq!(state.confirmed, None);
        assert_eq!(state.validation, Validation::NotChecked);
        assert_eq!(state.phase(), Phase::CoordinateSelected);
    }

    #[test]
    fn test_rejected_point_recovers_with_new_coordinate() {
        let mut selector = selector();
        selector.on_coordinate_change(kukatpally());
        selector.on_confirm();
        assert_eq!(selector.snapshot().phase(), Phase::ValidatedOutside);

        selector.on_coordinate_change(hyderabad_centre());
        assert_eq!(selector.snapshot().phase(), Phase::CoordinateSelected);
        assert_eq!(selector.on_confirm(), Some(Validation::WithinServiceArea));
    }

    #[test]
    fn test_use_my_location_success() {
        let mut selector = selector();
        selector.on_use_my_location();
        assert!(selector.snapshot().locating);
        assert_eq!(selector.snapshot().phase(), Phase::AwaitingFirstInput);

        let request = selector.on_location_result(Ok(hyderabad_centre())).unwrap();
        assert_eq!(request.coordinates, hyderabad_centre());

        let state = selector.snapshot();
        assert!(!state.locating);
        assert_eq!(state.coordinates, Some(hyderabad_centre()));
        assert!(state.address_lookup.is_pending());
    }

    #[test]
    fn test_use_my_location_failure_keeps_coordinate() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(kukatpally());
        selector.on_geocode_result(request.id, Ok("Kukatpally".to_string()));

        selector.on_use_my_location();
        assert!(selector.on_location_result(Err(LocationFailure::PermissionDenied)).is_none());

        let state = selector.snapshot();
        assert!(!state.locating);
        assert_eq!(state.location_error, Some(LocationFailure::PermissionDenied));
        assert_eq!(state.coordinates, Some(kukatpally()));
        assert_eq!(state.address.as_deref(), Some("Kukatpally"));
        assert_eq!(state.address_lookup, AddressLookup::Succeeded);
    }

    #[test]
    fn test_overlapping_location_requests() {
        let mut selector = selector();
        selector.on_use_my_location();
        selector.on_use_my_location();

        // First answer fails; the second request is still out
        assert!(selector.on_location_result(Err(LocationFailure::Timeout)).is_none());
        let state = selector.snapshot();
        assert!(state.locating);
        assert_eq!(state.location_error, Some(LocationFailure::Timeout));
        assert_eq!(state.phase(), Phase::AwaitingFirstInput);

        let request = selector.on_location_result(Ok(hyderabad_centre())).unwrap();
        assert_eq!(request.coordinates, hyderabad_centre());
        let state = selector.snapshot();
        assert!(!state.locating);
        assert_eq!(state.phase(), Phase::CoordinateSelected);
    }

    #[test]
    fn test_unrequested_location_result_does_not_underflow() {
        let mut selector = selector();
        selector.on_location_result(Err(LocationFailure::Unsupported));
        assert!(!selector.snapshot().locating);

        selector.on_use_my_location();
        assert!(selector.snapshot().locating);
        selector.on_location_result(Err(LocationFailure::Timeout));
        assert!(!selector.snapshot().locating);
    }

    #[test]
    fn test_retry_clears_location_error() {
        let mut selector = selector();
        selector.on_use_my_location();
        selector.on_location_result(Err(LocationFailure::Timeout));
        assert_eq!(selector.snapshot().phase(), Phase::Idle);

        selector.on_use_my_location();
        assert_eq!(selector.snapshot().location_error, None);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut selector = selector();
        let request = selector.on_coordinate_change(hyderabad_centre());
        selector.on_geocode_result(request.id, Err(GeocodeFailure::ZeroResults));

        let json = serde_json::to_value(selector.snapshot()).unwrap();
        assert_eq!(json["address_lookup"]["state"], "failed");
        assert_eq!(json["address_lookup"]["reason"]["kind"], "zero_results");
        assert_eq!(json["validation"], "not_checked");
    }
}
