//! Payload types carried by platform location callbacks.
//!
//! These are plain data. Nothing in this crate computes over coordinates;
//! the values are moved from the platform callback into the event that
//! reaches the waiting consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single location fix reported by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    /// Meters above sea level
    pub altitude: f64,
    /// Radius of uncertainty in meters; negative when the fix is invalid
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    /// Direction of travel in degrees from true north; negative when unknown
    pub course: f64,
    /// Meters per second; negative when unknown
    pub speed: f64,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    /// Create a fix at `coordinate` with unknown altitude, course and speed.
    pub fn new(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: -1.0,
            course: -1.0,
            speed: -1.0,
            timestamp,
        }
    }
}

/// A place the user spent time at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub coordinate: Coordinate,
    pub horizontal_accuracy: f64,
    /// `None` when the platform did not observe the arrival
    pub arrival: Option<DateTime<Utc>>,
    /// `None` while the user is still at the place
    pub departure: Option<DateTime<Utc>>,
}

/// Geometry of a monitored region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionShape {
    /// A circle around a center point, radius in meters
    Circular { center: Coordinate, radius: f64 },
    /// The area in which beacons matching the constraint are visible
    Beacon(BeaconConstraint),
}

/// A region registered for entry/exit monitoring.
///
/// Regions compare structurally, so a region rebuilt from the same values is
/// the same region as far as monitoring and cancellation are concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub identifier: String,
    pub shape: RegionShape,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
}

impl Region {
    /// A circular region that notifies on both entry and exit.
    pub fn circular(identifier: impl Into<String>, center: Coordinate, radius: f64) -> Self {
        Self {
            identifier: identifier.into(),
            shape: RegionShape::Circular { center, radius },
            notify_on_entry: true,
            notify_on_exit: true,
        }
    }

    /// A beacon region that notifies on both entry and exit.
    pub fn beacon(identifier: impl Into<String>, constraint: BeaconConstraint) -> Self {
        Self {
            identifier: identifier.into(),
            shape: RegionShape::Beacon(constraint),
            notify_on_entry: true,
            notify_on_exit: true,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// A compass heading sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Degrees relative to magnetic north
    pub magnetic_heading: f64,
    /// Degrees relative to true north; negative when unavailable
    pub true_heading: f64,
    pub heading_accuracy: f64,
    /// Raw geomagnetic data in microteslas
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: DateTime<Utc>,
}

/// Identity constraint used to range beacons.
///
/// `major` and `minor` narrow the match when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeaconConstraint {
    pub uuid: Uuid,
    pub major: Option<u16>,
    pub minor: Option<u16>,
}

impl BeaconConstraint {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            major: None,
            minor: None,
        }
    }

    pub fn with_major(mut self, major: u16) -> Self {
        self.major = Some(major);
        self
    }

    pub fn with_minor(mut self, minor: u16) -> Self {
        self.minor = Some(minor);
        self
    }

    /// Whether `beacon` falls inside this constraint.
    pub fn satisfied_by(&self, beacon: &Beacon) -> bool {
        self.uuid == beacon.uuid
            && self.major.map_or(true, |major| major == beacon.major)
            && self.minor.map_or(true, |minor| minor == beacon.minor)
    }
}

impl std::fmt::Display for BeaconConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uuid)?;
        if let Some(major) = self.major {
            write!(f, "/{}", major)?;
        }
        if let Some(minor) = self.minor {
            write!(f, "/{}", minor)?;
        }
        Ok(())
    }
}

/// Relative distance to a ranged beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proximity {
    Unknown,
    Immediate,
    Near,
    Far,
}

/// A beacon observed while ranging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub uuid: Uuid,
    pub major: u16,
    pub minor: u16,
    pub proximity: Proximity,
    /// Estimated distance in meters; negative when unknown
    pub accuracy: f64,
    pub rssi: i32,
    pub timestamp: DateTime<Utc>,
}

/// Location authorization granted to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet
    NotDetermined,
    /// The application is not allowed to ask, e.g. parental controls
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    /// Whether location can be used in any capacity.
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse
        )
    }
}

impl Default for AuthorizationStatus {
    fn default() -> Self {
        AuthorizationStatus::NotDetermined
    }
}

/// Precision level the user allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyAuthorization {
    FullAccuracy,
    ReducedAccuracy,
}

/// Desired accuracy forwarded to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationAccuracy {
    BestForNavigation,
    Best,
    NearestTenMeters,
    HundredMeters,
    Kilometer,
    ThreeKilometers,
    Reduced,
}

impl Default for LocationAccuracy {
    fn default() -> Self {
        LocationAccuracy::Best
    }
}

/// Permission level a caller asks the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    WhenInUse,
    Always,
}
