//! Typed events yielded by each kind of monitor.
//!
//! Each monitor only ever sees the [`LocationEvent`] variants its performer
//! accepts. The `TryFrom` conversions narrow those to a per-monitor enum and
//! reject anything else with [`LocationError::UnexpectedEvent`].

use location_proxy::{
    AccuracyAuthorization, AuthorizationStatus, Beacon, BeaconConstraint, Heading, Location,
    LocationEvent, PlatformError, Region, Visit,
};

use crate::error::LocationError;

/// Events from continuous location updates and single location requests
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdateEvent {
    DidUpdateLocations(Vec<Location>),
    DidPause,
    DidResume,
    DidFail(PlatformError),
}

impl LocationUpdateEvent {
    /// Most recent fix of an update batch.
    pub fn latest(&self) -> Option<&Location> {
        match self {
            LocationUpdateEvent::DidUpdateLocations(locations) => locations.last(),
            _ => None,
        }
    }
}

impl TryFrom<LocationEvent> for LocationUpdateEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::LocationsUpdated(locations) => {
                Ok(LocationUpdateEvent::DidUpdateLocations(locations))
            }
            LocationEvent::LocationUpdatesPaused => Ok(LocationUpdateEvent::DidPause),
            LocationEvent::LocationUpdatesResumed => Ok(LocationUpdateEvent::DidResume),
            LocationEvent::Failed(error) => Ok(LocationUpdateEvent::DidFail(error)),
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationEnabledEvent {
    DidUpdate(bool),
}

impl TryFrom<LocationEvent> for LocationEnabledEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::LocationServicesEnabledChanged(enabled) => {
                Ok(LocationEnabledEvent::DidUpdate(enabled))
            }
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEvent {
    DidUpdate(AuthorizationStatus),
}

impl TryFrom<LocationEvent> for AuthorizationEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::AuthorizationChanged(status) => Ok(AuthorizationEvent::DidUpdate(status)),
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyAuthorizationEvent {
    DidUpdate(AccuracyAuthorization),
}

impl TryFrom<LocationEvent> for AccuracyAuthorizationEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::AccuracyAuthorizationChanged(accuracy) => {
                Ok(AccuracyAuthorizationEvent::DidUpdate(accuracy))
            }
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

/// Events for one monitored region
#[derive(Debug, Clone, PartialEq)]
pub enum RegionMonitoringEvent {
    DidEnter(Region),
    DidExit(Region),
    DidStartMonitoring(Region),
    /// `region` is `None` when the platform could not tell which region failed
    MonitoringDidFail {
        region: Option<Region>,
        error: PlatformError,
    },
}

impl TryFrom<LocationEvent> for RegionMonitoringEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::RegionEntered(region) => Ok(RegionMonitoringEvent::DidEnter(region)),
            LocationEvent::RegionExited(region) => Ok(RegionMonitoringEvent::DidExit(region)),
            LocationEvent::RegionMonitoringStarted(region) => {
                Ok(RegionMonitoringEvent::DidStartMonitoring(region))
            }
            LocationEvent::RegionMonitoringFailed { region, error } => {
                Ok(RegionMonitoringEvent::MonitoringDidFail { region, error })
            }
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisitMonitoringEvent {
    DidVisit(Visit),
    DidFail(PlatformError),
}

impl TryFrom<LocationEvent> for VisitMonitoringEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::Visited(visit) => Ok(VisitMonitoringEvent::DidVisit(visit)),
            LocationEvent::Failed(error) => Ok(VisitMonitoringEvent::DidFail(error)),
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeadingMonitorEvent {
    DidUpdate(Heading),
    DidFail(PlatformError),
}

impl TryFrom<LocationEvent> for HeadingMonitorEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::HeadingUpdated(heading) => Ok(HeadingMonitorEvent::DidUpdate(heading)),
            LocationEvent::Failed(error) => Ok(HeadingMonitorEvent::DidFail(error)),
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}

/// Ranging results for one beacon constraint
#[derive(Debug, Clone, PartialEq)]
pub enum BeaconRangingEvent {
    DidRange {
        beacons: Vec<Beacon>,
        constraint: BeaconConstraint,
    },
    DidFailRanging {
        constraint: BeaconConstraint,
        error: PlatformError,
    },
}

impl TryFrom<LocationEvent> for BeaconRangingEvent {
    type Error = LocationError;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        match event {
            LocationEvent::BeaconsRanged { beacons, constraint } => {
                Ok(BeaconRangingEvent::DidRange { beacons, constraint })
            }
            LocationEvent::BeaconRangingFailed { constraint, error } => {
                Ok(BeaconRangingEvent::DidFailRanging { constraint, error })
            }
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }
}
