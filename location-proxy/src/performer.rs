//! Performers: pending operations waiting for platform callbacks.
//!
//! A [`Performer`] pairs an [`Interest`] (which events it wants) with a
//! [`Sink`] (where matched events go). The sink decides the lifecycle: a
//! one-shot sink resolves once and the performer is removed, a stream sink
//! keeps receiving until it is cancelled or its consumer goes away.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};

use crate::error::{PlatformError, ProxyError, Result};
use crate::event::{EventKind, LocationEvent};
use crate::types::{AuthorizationStatus, BeaconConstraint, Region};

static NEXT_PERFORMER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a performer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PerformerId(u64);

impl PerformerId {
    /// Create a PerformerId with the given value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate the next unused identifier
    pub fn next() -> Self {
        Self(NEXT_PERFORMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PerformerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "performer-{}", self.0)
    }
}

/// Type tag of a performer, used for bulk cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerformerType {
    AuthorizationRequest,
    AccuracyAuthorizationRequest,
    SingleLocation,
    LocationUpdates,
    LocationEnabled,
    AuthorizationChanges,
    AccuracyAuthorizationChanges,
    RegionMonitor,
    VisitMonitor,
    HeadingMonitor,
    BeaconRanging,
}

/// What a performer is waiting for.
///
/// Keyed variants carry their refinement value so that matching and
/// cancellation compare by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Interest {
    /// Waits for the authorization status to move away from `current`
    AuthorizationRequest { current: AuthorizationStatus },
    AccuracyAuthorizationRequest,
    SingleLocation,
    LocationUpdates,
    LocationEnabled,
    AuthorizationChanges,
    AccuracyAuthorizationChanges,
    RegionMonitor(Region),
    VisitMonitor,
    HeadingMonitor,
    BeaconRanging(BeaconConstraint),
}

impl Interest {
    pub fn performer_type(&self) -> PerformerType {
        match self {
            Interest::AuthorizationRequest { .. } => PerformerType::AuthorizationRequest,
            Interest::AccuracyAuthorizationRequest => PerformerType::AccuracyAuthorizationRequest,
            Interest::SingleLocation => PerformerType::SingleLocation,
            Interest::LocationUpdates => PerformerType::LocationUpdates,
            Interest::LocationEnabled => PerformerType::LocationEnabled,
            Interest::AuthorizationChanges => PerformerType::AuthorizationChanges,
            Interest::AccuracyAuthorizationChanges => PerformerType::AccuracyAuthorizationChanges,
            Interest::RegionMonitor(_) => PerformerType::RegionMonitor,
            Interest::VisitMonitor => PerformerType::VisitMonitor,
            Interest::HeadingMonitor => PerformerType::HeadingMonitor,
            Interest::BeaconRanging(_) => PerformerType::BeaconRanging,
        }
    }

    /// Event kinds this interest can ever match.
    pub fn accepted_kinds(&self) -> &'static [EventKind] {
        match self {
            Interest::AuthorizationRequest { .. } | Interest::AuthorizationChanges => {
                &[EventKind::AuthorizationChanged]
            }
            Interest::AccuracyAuthorizationRequest | Interest::AccuracyAuthorizationChanges => {
                &[EventKind::AccuracyAuthorizationChanged]
            }
            Interest::SingleLocation => &[EventKind::LocationsUpdated, EventKind::Failed],
            Interest::LocationUpdates => &[
                EventKind::LocationsUpdated,
                EventKind::LocationUpdatesPaused,
                EventKind::LocationUpdatesResumed,
                EventKind::Failed,
            ],
            Interest::LocationEnabled => &[EventKind::LocationServicesEnabledChanged],
            Interest::RegionMonitor(_) => &[
                EventKind::RegionEntered,
                EventKind::RegionExited,
                EventKind::RegionMonitoringStarted,
                EventKind::RegionMonitoringFailed,
            ],
            Interest::VisitMonitor => &[EventKind::Visited, EventKind::Failed],
            Interest::HeadingMonitor => &[EventKind::HeadingUpdated, EventKind::Failed],
            Interest::BeaconRanging(_) => {
                &[EventKind::BeaconsRanged, EventKind::BeaconRangingFailed]
            }
        }
    }

    /// Type-tag check only, ignoring refinement values.
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.accepted_kinds().contains(&kind)
    }

    /// Whether `event` is for this interest.
    pub fn matches(&self, event: &LocationEvent) -> bool {
        if !self.accepts(event.kind()) {
            return false;
        }

        match (self, event) {
            (
                Interest::AuthorizationRequest { current },
                LocationEvent::AuthorizationChanged(status),
            ) => status != current,
            // Unattributed failures concern every monitored region.
            (Interest::RegionMonitor(_), LocationEvent::RegionMonitoringFailed { region: None, .. }) => {
                true
            }
            (Interest::RegionMonitor(region), event) => event
                .region()
                .is_some_and(|other| other.identifier() == region.identifier()),
            (Interest::BeaconRanging(constraint), event) => {
                event.beacon_constraint() == Some(constraint)
            }
            _ => true,
        }
    }

    /// Whether `other` is fed by the same platform activity.
    ///
    /// Regions are keyed by identifier, as the platform keys them; the
    /// geometry it reports back may differ from what was registered.
    pub fn same_activity(&self, other: &Interest) -> bool {
        match (self, other) {
            (Interest::RegionMonitor(a), Interest::RegionMonitor(b)) => {
                a.identifier() == b.identifier()
            }
            (Interest::BeaconRanging(a), Interest::BeaconRanging(b)) => a == b,
            _ => self.performer_type() == other.performer_type(),
        }
    }

    /// The failure event a stream of this interest emits for `error`.
    pub fn failure_event(&self, error: PlatformError) -> LocationEvent {
        match self {
            Interest::RegionMonitor(region) => LocationEvent::RegionMonitoringFailed {
                region: Some(region.clone()),
                error,
            },
            Interest::BeaconRanging(constraint) => LocationEvent::BeaconRangingFailed {
                constraint: *constraint,
                error,
            },
            _ => LocationEvent::Failed(error),
        }
    }

    pub fn region(&self) -> Option<&Region> {
        match self {
            Interest::RegionMonitor(region) => Some(region),
            _ => None,
        }
    }

    pub fn beacon_constraint(&self) -> Option<&BeaconConstraint> {
        match self {
            Interest::BeaconRanging(constraint) => Some(constraint),
            _ => None,
        }
    }
}

/// Outcome handed to a one-shot consumer.
pub type Resolution = std::result::Result<LocationEvent, PlatformError>;

/// Delivery target of a performer.
#[derive(Debug)]
pub enum Sink {
    /// Resolves exactly once
    Once(oneshot::Sender<Resolution>),
    /// Emits every matched event until closed
    Stream(mpsc::UnboundedSender<LocationEvent>),
}

impl Sink {
    /// A one-shot sink and the receiver awaiting its resolution.
    pub fn once() -> (Self, oneshot::Receiver<Resolution>) {
        let (tx, rx) = oneshot::channel();
        (Sink::Once(tx), rx)
    }

    /// A stream sink and the receiver consuming its events.
    pub fn stream() -> (Self, mpsc::UnboundedReceiver<LocationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Sink::Stream(tx), rx)
    }
}

/// What happened to a performer after a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The one-shot sink was resolved; the performer is spent
    Completed,
    /// The event was appended to the stream
    Emitted,
    /// The consumer is gone; the performer should be dropped
    Disconnected,
}

impl Delivery {
    /// Whether the performer must leave the registry.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Delivery::Emitted)
    }
}

/// A pending operation registered with the delegate proxy.
#[derive(Debug)]
pub struct Performer {
    id: PerformerId,
    interest: Interest,
    sink: Option<Sink>,
}

impl Performer {
    /// Create an unlinked performer with a fresh identifier.
    pub fn new(interest: Interest) -> Self {
        Self {
            id: PerformerId::next(),
            interest,
            sink: None,
        }
    }

    /// Create a performer already linked to `sink`.
    pub fn linked(interest: Interest, sink: Sink) -> Self {
        Self {
            id: PerformerId::next(),
            interest,
            sink: Some(sink),
        }
    }

    pub fn id(&self) -> PerformerId {
        self.id
    }

    pub fn interest(&self) -> &Interest {
        &self.interest
    }

    pub fn performer_type(&self) -> PerformerType {
        self.interest.performer_type()
    }

    pub fn is_linked(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether this performer resolves once and is then removed.
    pub fn is_one_shot(&self) -> bool {
        matches!(self.sink, Some(Sink::Once(_)))
    }

    /// Attach the delivery target. A performer can be linked only once.
    pub fn link(&mut self, sink: Sink) -> Result<()> {
        if self.sink.is_some() {
            tracing::warn!("Refusing to link {} twice", self.id);
            return Err(ProxyError::AlreadyLinked(self.id));
        }
        self.sink = Some(sink);
        Ok(())
    }

    pub fn matches(&self, event: &LocationEvent) -> bool {
        self.interest.matches(event)
    }

    /// Hand `event` to the sink.
    ///
    /// A one-shot sink resolves with the event, or with its error when the
    /// event is a failure. A stream sink emits the event as is.
    pub fn deliver(&mut self, event: &LocationEvent) -> Delivery {
        match self.sink.take() {
            Some(Sink::Once(tx)) => {
                let resolution = match event.error() {
                    Some(error) => Err(error.clone()),
                    None => Ok(event.clone()),
                };
                if tx.send(resolution).is_err() {
                    tracing::trace!("{} resolved after its caller went away", self.id);
                }
                Delivery::Completed
            }
            Some(Sink::Stream(tx)) => self.emit(tx, event.clone()),
            None => Delivery::Disconnected,
        }
    }

    /// Hand a failure to the sink.
    ///
    /// Streams keep running: they receive the failure as an event value
    /// shaped for this performer's interest.
    pub fn deliver_error(&mut self, error: PlatformError) -> Delivery {
        match self.sink.take() {
            Some(Sink::Once(tx)) => {
                if tx.send(Err(error)).is_err() {
                    tracing::trace!("{} failed after its caller went away", self.id);
                }
                Delivery::Completed
            }
            Some(Sink::Stream(tx)) => {
                let event = self.interest.failure_event(error);
                self.emit(tx, event)
            }
            None => Delivery::Disconnected,
        }
    }

    fn emit(&mut self, tx: mpsc::UnboundedSender<LocationEvent>, event: LocationEvent) -> Delivery {
        if tx.send(event).is_err() {
            return Delivery::Disconnected;
        }
        self.sink = Some(Sink::Stream(tx));
        Delivery::Emitted
    }
}
