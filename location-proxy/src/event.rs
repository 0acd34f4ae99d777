//! Event model for platform location callbacks.
//!
//! Every callback the platform delegate can receive maps to exactly one
//! [`LocationEvent`] variant. [`EventKind`] is the field-less tag used by
//! performers to declare which variants they accept.

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::types::{
    AccuracyAuthorization, AuthorizationStatus, Beacon, BeaconConstraint, Heading, Location,
    Region, Visit,
};

/// One platform callback, as an immutable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationEvent {
    /// A batch of new fixes, oldest first
    LocationsUpdated(Vec<Location>),
    /// The platform paused location updates to save power
    LocationUpdatesPaused,
    LocationUpdatesResumed,
    /// Generic failure from the location subsystem
    Failed(PlatformError),
    Visited(Visit),
    RegionEntered(Region),
    RegionExited(Region),
    RegionMonitoringStarted(Region),
    /// `region` is `None` when the platform could not attribute the failure
    RegionMonitoringFailed {
        region: Option<Region>,
        error: PlatformError,
    },
    HeadingUpdated(Heading),
    BeaconsRanged {
        beacons: Vec<Beacon>,
        constraint: BeaconConstraint,
    },
    BeaconRangingFailed {
        constraint: BeaconConstraint,
        error: PlatformError,
    },
    LocationServicesEnabledChanged(bool),
    AuthorizationChanged(AuthorizationStatus),
    AccuracyAuthorizationChanged(AccuracyAuthorization),
}

/// Tag identifying a [`LocationEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    LocationsUpdated,
    LocationUpdatesPaused,
    LocationUpdatesResumed,
    Failed,
    Visited,
    RegionEntered,
    RegionExited,
    RegionMonitoringStarted,
    RegionMonitoringFailed,
    HeadingUpdated,
    BeaconsRanged,
    BeaconRangingFailed,
    LocationServicesEnabledChanged,
    AuthorizationChanged,
    AccuracyAuthorizationChanged,
}

impl EventKind {
    /// Whether events of this kind report a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            EventKind::Failed | EventKind::RegionMonitoringFailed | EventKind::BeaconRangingFailed
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl LocationEvent {
    /// The tag of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            LocationEvent::LocationsUpdated(_) => EventKind::LocationsUpdated,
            LocationEvent::LocationUpdatesPaused => EventKind::LocationUpdatesPaused,
            LocationEvent::LocationUpdatesResumed => EventKind::LocationUpdatesResumed,
            LocationEvent::Failed(_) => EventKind::Failed,
            LocationEvent::Visited(_) => EventKind::Visited,
            LocationEvent::RegionEntered(_) => EventKind::RegionEntered,
            LocationEvent::RegionExited(_) => EventKind::RegionExited,
            LocationEvent::RegionMonitoringStarted(_) => EventKind::RegionMonitoringStarted,
            LocationEvent::RegionMonitoringFailed { .. } => EventKind::RegionMonitoringFailed,
            LocationEvent::HeadingUpdated(_) => EventKind::HeadingUpdated,
            LocationEvent::BeaconsRanged { .. } => EventKind::BeaconsRanged,
            LocationEvent::BeaconRangingFailed { .. } => EventKind::BeaconRangingFailed,
            LocationEvent::LocationServicesEnabledChanged(_) => {
                EventKind::LocationServicesEnabledChanged
            }
            LocationEvent::AuthorizationChanged(_) => EventKind::AuthorizationChanged,
            LocationEvent::AccuracyAuthorizationChanged(_) => {
                EventKind::AccuracyAuthorizationChanged
            }
        }
    }

    /// The error carried by a failure event.
    pub fn error(&self) -> Option<&PlatformError> {
        match self {
            LocationEvent::Failed(error)
            | LocationEvent::RegionMonitoringFailed { error, .. }
            | LocationEvent::BeaconRangingFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The region an event is about, if any.
    pub fn region(&self) -> Option<&Region> {
        match self {
            LocationEvent::RegionEntered(region)
            | LocationEvent::RegionExited(region)
            | LocationEvent::RegionMonitoringStarted(region) => Some(region),
            LocationEvent::RegionMonitoringFailed { region, .. } => region.as_ref(),
            _ => None,
        }
    }

    /// The ranging constraint an event is about, if any.
    pub fn beacon_constraint(&self) -> Option<&BeaconConstraint> {
        match self {
            LocationEvent::BeaconsRanged { constraint, .. }
            | LocationEvent::BeaconRangingFailed { constraint, .. } => Some(constraint),
            _ => None,
        }
    }
}
