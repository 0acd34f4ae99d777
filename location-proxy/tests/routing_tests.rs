//! Routing behaviour of the delegate proxy under realistic callback patterns.
//!
//! Callbacks are fed from plain OS threads, the way the platform delivers
//! them, while registrations and cancellations happen on the test side.

use std::sync::{Arc, Barrier};

use chrono::Utc;
use location_proxy::{
    AccuracyAuthorization, AuthorizationStatus, Beacon, BeaconConstraint, Coordinate,
    DelegateProxy, EventKind, Heading, Interest, Location, LocationDelegate, LocationEvent,
    Performer, PerformerType, PlatformError, PlatformErrorCode, Proximity, Region, Sink, Visit,
};
use proptest::prelude::*;
use tokio::sync::mpsc::error::TryRecvError;
use uuid::Uuid;

fn fix(lat: f64, lon: f64) -> Location {
    Location::new(Coordinate::new(lat, lon), Utc::now())
}

fn region(id: &str) -> Region {
    Region::circular(id, Coordinate::new(51.50, -0.12), 250.0)
}

fn constraint(major: u16) -> BeaconConstraint {
    BeaconConstraint::new(Uuid::from_u128(0xE2C5_6DB5_DFFB_48D2_B060_D0F5_A710_96E0)).with_major(major)
}

#[tokio::test]
async fn test_continuous_monitor_yields_in_callback_order() {
    let proxy = Arc::new(DelegateProxy::new());
    let (sink, mut rx) = Sink::stream();
    proxy
        .add(Performer::linked(Interest::LocationUpdates, sink))
        .unwrap();
    let delegate = LocationDelegate::new(Arc::clone(&proxy));

    let first = vec![fix(1.0, 1.0)];
    let second = vec![fix(2.0, 2.0), fix(2.5, 2.5)];
    let feeder = {
        let delegate = delegate.clone();
        let (first, second) = (first.clone(), second.clone());
        std::thread::spawn(move || {
            delegate.did_update_locations(first);
            delegate.did_update_locations(second);
        })
    };
    feeder.join().unwrap();

    assert_eq!(rx.recv().await, Some(LocationEvent::LocationsUpdated(first)));
    assert_eq!(rx.recv().await, Some(LocationEvent::LocationsUpdated(second)));
    // The stream is never completed by delivery.
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_two_single_requests_resolve_from_one_callback() {
    let proxy = Arc::new(DelegateProxy::new());
    let (sink_one, rx_one) = Sink::once();
    let (sink_two, rx_two) = Sink::once();
    proxy
        .add(Performer::linked(Interest::SingleLocation, sink_one))
        .unwrap();
    proxy
        .add(Performer::linked(Interest::SingleLocation, sink_two))
        .unwrap();

    let event = LocationEvent::LocationsUpdated(vec![fix(10.0, 20.0)]);
    assert_eq!(proxy.route(&event), 2);
    assert!(proxy.is_empty());

    assert_eq!(rx_one.await.unwrap(), Ok(event.clone()));
    assert_eq!(rx_two.await.unwrap(), Ok(event.clone()));
    assert_eq!(proxy.route(&event), 0);
}

#[tokio::test]
async fn test_region_exit_reaches_only_its_region() {
    let proxy = Arc::new(DelegateProxy::new());
    let (a_sink, mut a_rx) = Sink::stream();
    let (b_sink, mut b_rx) = Sink::stream();
    proxy
        .add(Performer::linked(Interest::RegionMonitor(region("A")), a_sink))
        .unwrap();
    proxy
        .add(Performer::linked(Interest::RegionMonitor(region("B")), b_sink))
        .unwrap();

    LocationDelegate::new(Arc::clone(&proxy)).did_exit_region(region("A"));

    assert_eq!(a_rx.recv().await, Some(LocationEvent::RegionExited(region("A"))));
    assert!(matches!(b_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_one_shot_is_exactly_once_under_concurrent_callbacks() {
    const CALLBACKS: usize = 16;

    let proxy = Arc::new(DelegateProxy::new());
    let (sink, mut rx) = Sink::once();
    proxy
        .add(Performer::linked(Interest::SingleLocation, sink))
        .unwrap();

    let barrier = Arc::new(Barrier::new(CALLBACKS));
    let handles: Vec<_> = (0..CALLBACKS)
        .map(|i| {
            let proxy = Arc::clone(&proxy);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                proxy.route(&LocationEvent::LocationsUpdated(vec![fix(i as f64, 0.0)]))
            })
        })
        .collect();

    let deliveries: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(deliveries, 1);
    assert!(rx.try_recv().unwrap().is_ok());
    assert!(proxy.is_empty());
}

#[tokio::test]
async fn test_cancelled_performer_ignores_late_callback() {
    let proxy = Arc::new(DelegateProxy::new());
    let (sink, rx) = Sink::once();
    let performer = Performer::linked(Interest::SingleLocation, sink);
    let id = performer.id();
    proxy.add(performer).unwrap();

    assert!(proxy.cancel(id));
    assert_eq!(proxy.route(&LocationEvent::LocationsUpdated(vec![fix(0.0, 0.0)])), 0);
    assert_eq!(
        proxy.route_error(
            EventKind::Failed,
            PlatformError::from_code(PlatformErrorCode::LocationUnknown)
        ),
        0
    );

    // The sender was dropped with the performer.
    assert!(rx.await.is_err());
}

#[tokio::test]
async fn test_cancel_one_beacon_constraint_keeps_the_other() {
    let proxy = Arc::new(DelegateProxy::new());
    let (one_sink, mut one_rx) = Sink::stream();
    let (two_sink, mut two_rx) = Sink::stream();
    proxy
        .add(Performer::linked(Interest::BeaconRanging(constraint(1)), one_sink))
        .unwrap();
    proxy
        .add(Performer::linked(Interest::BeaconRanging(constraint(2)), two_sink))
        .unwrap();

    let target = constraint(1);
    assert_eq!(
        proxy.cancel_where(PerformerType::BeaconRanging, |interest| {
            interest.beacon_constraint() == Some(&target)
        }),
        1
    );

    let beacon = Beacon {
        uuid: constraint(2).uuid,
        major: 2,
        minor: 9,
        proximity: Proximity::Immediate,
        accuracy: 0.3,
        rssi: -41,
        timestamp: Utc::now(),
    };
    let delegate = LocationDelegate::new(Arc::clone(&proxy));
    delegate.did_range_beacons(vec![beacon.clone()], constraint(1));
    delegate.did_range_beacons(vec![beacon.clone()], constraint(2));

    assert_eq!(
        two_rx.recv().await,
        Some(LocationEvent::BeaconsRanged {
            beacons: vec![beacon],
            constraint: constraint(2),
        })
    );
    assert!(matches!(one_rx.try_recv(), Err(TryRecvError::Disconnected)));
}

#[tokio::test]
async fn test_region_failure_keeps_stream_open() {
    let proxy = Arc::new(DelegateProxy::new());
    let (sink, mut rx) = Sink::stream();
    proxy
        .add(Performer::linked(Interest::RegionMonitor(region("A")), sink))
        .unwrap();
    let delegate = LocationDelegate::new(Arc::clone(&proxy));
    let error = PlatformError::new(PlatformErrorCode::RegionMonitoringFailure, "too many regions");

    delegate.monitoring_did_fail_for(Some(region("A")), error.clone());
    delegate.did_enter_region(region("A"));

    assert_eq!(
        rx.recv().await,
        Some(LocationEvent::RegionMonitoringFailed {
            region: Some(region("A")),
            error,
        })
    );
    assert_eq!(rx.recv().await, Some(LocationEvent::RegionEntered(region("A"))));
    assert_eq!(proxy.len(), 1);
}

// ---------------------------------------------------------------------------
// Routing delivers to a performer iff its interest matches the event
// ---------------------------------------------------------------------------

fn interests() -> Vec<Interest> {
    vec![
        Interest::AuthorizationRequest {
            current: AuthorizationStatus::NotDetermined,
        },
        Interest::AccuracyAuthorizationRequest,
        Interest::SingleLocation,
        Interest::LocationUpdates,
        Interest::LocationEnabled,
        Interest::AuthorizationChanges,
        Interest::AccuracyAuthorizationChanges,
        Interest::RegionMonitor(region("A")),
        Interest::RegionMonitor(region("B")),
        Interest::VisitMonitor,
        Interest::HeadingMonitor,
        Interest::BeaconRanging(constraint(1)),
        Interest::BeaconRanging(constraint(2)),
    ]
}

fn events() -> Vec<LocationEvent> {
    let error = PlatformError::from_code(PlatformErrorCode::Network);
    vec![
        LocationEvent::LocationsUpdated(vec![fix(3.0, 4.0)]),
        LocationEvent::LocationUpdatesPaused,
        LocationEvent::LocationUpdatesResumed,
        LocationEvent::Failed(error.clone()),
        LocationEvent::Visited(Visit {
            coordinate: Coordinate::new(3.0, 4.0),
            horizontal_accuracy: 20.0,
            arrival: Some(Utc::now()),
            departure: None,
        }),
        LocationEvent::RegionEntered(region("A")),
        LocationEvent::RegionExited(region("B")),
        LocationEvent::RegionMonitoringStarted(region("A")),
        LocationEvent::RegionMonitoringFailed {
            region: None,
            error: error.clone(),
        },
        LocationEvent::HeadingUpdated(Heading {
            magnetic_heading: 90.0,
            true_heading: 92.0,
            heading_accuracy: 5.0,
            x: 1.0,
            y: 2.0,
            z: 3.0,
            timestamp: Utc::now(),
        }),
        LocationEvent::BeaconsRanged {
            beacons: vec![],
            constraint: constraint(2),
        },
        LocationEvent::BeaconRangingFailed {
            constraint: constraint(1),
            error,
        },
        LocationEvent::LocationServicesEnabledChanged(false),
        LocationEvent::AuthorizationChanged(AuthorizationStatus::Denied),
        LocationEvent::AccuracyAuthorizationChanged(AccuracyAuthorization::FullAccuracy),
    ]
}

proptest! {
    #[test]
    fn prop_route_delivers_iff_interest_matches(
        picks in proptest::collection::vec(0..13usize, 1..12),
        event_index in 0..15usize,
    ) {
        let catalogue = interests();
        let event = events()[event_index].clone();
        let proxy = DelegateProxy::new();

        let mut registered = Vec::new();
        for pick in picks {
            let interest = catalogue[pick].clone();
            let (sink, rx) = Sink::stream();
            proxy.add(Performer::linked(interest.clone(), sink)).unwrap();
            registered.push((interest, rx));
        }

        let delivered = proxy.route(&event);

        let mut expected = 0;
        for (interest, mut rx) in registered {
            let should_match = interest.accepts(event.kind()) && interest.matches(&event);
            match rx.try_recv() {
                Ok(received) => {
                    prop_assert!(should_match, "{:?} received {:?}", interest, received);
                    prop_assert_eq!(received, event.clone());
                }
                Err(_) => prop_assert!(!should_match, "{:?} missed {:?}", interest, event),
            }
            if should_match {
                expected += 1;
            }
        }
        prop_assert_eq!(delivered, expected);
    }
}
