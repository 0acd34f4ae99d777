//! The platform location subsystem, as seen from the manager.
//!
//! Implementations wrap the host's native location manager. Every method is
//! a fire-and-forget call: results come back later through the
//! [`LocationDelegate`](location_proxy::LocationDelegate) installed as the
//! platform's callback target, except for the temporary full accuracy
//! request which also reports through its completion.

use location_proxy::{
    AccuracyAuthorization, AuthorizationStatus, BeaconConstraint, Interest, LocationAccuracy,
    PlatformError, Region,
};

/// Completion handed to [`LocationPlatform::request_temporary_full_accuracy_authorization`].
///
/// Called once with `None` on success or the platform's error.
pub type AccuracyCompletion = Box<dyn FnOnce(Option<PlatformError>) + Send>;

/// Outbound primitives of the platform location subsystem.
///
/// Calls may be made from any thread. An implementation may invoke delegate
/// callbacks synchronously from inside a call; the manager never holds the
/// registry lock while calling into the platform. Starts and stops of
/// monitoring activity never overlap each other.
pub trait LocationPlatform: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;
    fn accuracy_authorization(&self) -> AccuracyAuthorization;
    fn location_services_enabled(&self) -> bool;

    fn set_desired_accuracy(&self, accuracy: LocationAccuracy);
    fn set_allows_background_location_updates(&self, allows: bool);

    fn request_when_in_use_authorization(&self);
    fn request_always_authorization(&self);
    fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: &str,
        completion: AccuracyCompletion,
    );

    /// Ask for a single fix
    fn request_location(&self);

    fn start_updating_location(&self);
    fn stop_updating_location(&self);

    fn start_monitoring_region(&self, region: &Region);
    fn stop_monitoring_region(&self, region: &Region);

    fn start_monitoring_visits(&self);
    fn stop_monitoring_visits(&self);

    fn start_updating_heading(&self);
    fn stop_updating_heading(&self);

    fn start_ranging_beacons(&self, constraint: &BeaconConstraint);
    fn stop_ranging_beacons(&self, constraint: &BeaconConstraint);
}

/// Start the platform activity that feeds performers of `interest`.
pub(crate) fn start_activity(platform: &dyn LocationPlatform, interest: &Interest) {
    match interest {
        Interest::LocationUpdates => platform.start_updating_location(),
        Interest::RegionMonitor(region) => platform.start_monitoring_region(region),
        Interest::VisitMonitor => platform.start_monitoring_visits(),
        Interest::HeadingMonitor => platform.start_updating_heading(),
        Interest::BeaconRanging(constraint) => platform.start_ranging_beacons(constraint),
        Interest::AuthorizationRequest { .. }
        | Interest::AccuracyAuthorizationRequest
        | Interest::SingleLocation
        | Interest::LocationEnabled
        | Interest::AuthorizationChanges
        | Interest::AccuracyAuthorizationChanges => return,
    }
    tracing::debug!("Started platform activity for {:?}", interest.performer_type());
}

/// Stop whatever platform activity feeds performers of `interest`.
///
/// Interests that only observe state changes have nothing to stop.
pub(crate) fn stop_activity(platform: &dyn LocationPlatform, interest: &Interest) {
    match interest {
        Interest::LocationUpdates => platform.stop_updating_location(),
        Interest::RegionMonitor(region) => platform.stop_monitoring_region(region),
        Interest::VisitMonitor => platform.stop_monitoring_visits(),
        Interest::HeadingMonitor => platform.stop_updating_heading(),
        Interest::BeaconRanging(constraint) => platform.stop_ranging_beacons(constraint),
        Interest::AuthorizationRequest { .. }
        | Interest::AccuracyAuthorizationRequest
        | Interest::SingleLocation
        | Interest::LocationEnabled
        | Interest::AuthorizationChanges
        | Interest::AccuracyAuthorizationChanges => return,
    }
    tracing::debug!("Stopped platform activity for {:?}", interest.performer_type());
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Platform that records the name of every outbound call
    pub(crate) struct RecordingPlatform {
        pub(crate) status: Mutex<AuthorizationStatus>,
        pub(crate) accuracy: Mutex<AccuracyAuthorization>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingPlatform {
        pub(crate) fn new(status: AuthorizationStatus) -> Arc<Self> {
            Arc::new(Self {
                status: Mutex::new(status),
                accuracy: Mutex::new(AccuracyAuthorization::FullAccuracy),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        pub(crate) fn count(&self, name: &str) -> usize {
            self.calls.lock().iter().filter(|c| c.as_str() == name).count()
        }

        fn record(&self, name: &str) {
            self.calls.lock().push(name.to_string());
        }
    }

    impl LocationPlatform for RecordingPlatform {
        fn authorization_status(&self) -> AuthorizationStatus {
            *self.status.lock()
        }

        fn accuracy_authorization(&self) -> AccuracyAuthorization {
            *self.accuracy.lock()
        }

        fn location_services_enabled(&self) -> bool {
            true
        }

        fn set_desired_accuracy(&self, _accuracy: LocationAccuracy) {
            self.record("set_desired_accuracy");
        }

        fn set_allows_background_location_updates(&self, _allows: bool) {
            self.record("set_allows_background_location_updates");
        }

        fn request_when_in_use_authorization(&self) {
            self.record("request_when_in_use_authorization");
        }

        fn request_always_authorization(&self) {
            self.record("request_always_authorization");
        }

        fn request_temporary_full_accuracy_authorization(
            &self,
            _purpose_key: &str,
            _completion: AccuracyCompletion,
        ) {
            self.record("request_temporary_full_accuracy_authorization");
        }

        fn request_location(&self) {
            self.record("request_location");
        }

        fn start_updating_location(&self) {
            self.record("start_updating_location");
        }

        fn stop_updating_location(&self) {
            self.record("stop_updating_location");
        }

        fn start_monitoring_region(&self, _region: &Region) {
            self.record("start_monitoring_region");
        }

        fn stop_monitoring_region(&self, _region: &Region) {
            self.record("stop_monitoring_region");
        }

        fn start_monitoring_visits(&self) {
            self.record("start_monitoring_visits");
        }

        fn stop_monitoring_visits(&self) {
            self.record("stop_monitoring_visits");
        }

        fn start_updating_heading(&self) {
            self.record("start_updating_heading");
        }

        fn stop_updating_heading(&self) {
            self.record("stop_updating_heading");
        }

        fn start_ranging_beacons(&self, _constraint: &BeaconConstraint) {
            self.record("start_ranging_beacons");
        }

        fn stop_ranging_beacons(&self, _constraint: &BeaconConstraint) {
            self.record("stop_ranging_beacons");
        }
    }
}
