//! Adapter between the platform's delegate callbacks and the proxy.
//!
//! The host installs a [`LocationDelegate`] as the platform's callback
//! target. Each method corresponds to one native callback and forwards it,
//! translated into a [`LocationEvent`], to the shared [`DelegateProxy`].
//! Methods may be called from any thread.

use std::sync::Arc;

use crate::error::PlatformError;
use crate::event::{EventKind, LocationEvent};
use crate::proxy::DelegateProxy;
use crate::types::{
    AccuracyAuthorization, AuthorizationStatus, Beacon, BeaconConstraint, Heading, Location,
    Region, Visit,
};

/// Authorization snapshot reported by the combined authorization callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationState {
    pub status: AuthorizationStatus,
    pub accuracy: AccuracyAuthorization,
    pub location_services_enabled: bool,
}

/// Callback target registered with the platform
#[derive(Debug, Clone)]
pub struct LocationDelegate {
    proxy: Arc<DelegateProxy>,
}

impl LocationDelegate {
    pub fn new(proxy: Arc<DelegateProxy>) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &Arc<DelegateProxy> {
        &self.proxy
    }

    pub fn did_update_locations(&self, locations: Vec<Location>) {
        self.proxy.route(&LocationEvent::LocationsUpdated(locations));
    }

    pub fn did_fail_with_error(&self, error: PlatformError) {
        self.proxy.route_error(EventKind::Failed, error);
    }

    pub fn did_pause_location_updates(&self) {
        self.proxy.route(&LocationEvent::LocationUpdatesPaused);
    }

    pub fn did_resume_location_updates(&self) {
        self.proxy.route(&LocationEvent::LocationUpdatesResumed);
    }

    pub fn did_visit(&self, visit: Visit) {
        self.proxy.route(&LocationEvent::Visited(visit));
    }

    pub fn did_enter_region(&self, region: Region) {
        self.proxy.route(&LocationEvent::RegionEntered(region));
    }

    pub fn did_exit_region(&self, region: Region) {
        self.proxy.route(&LocationEvent::RegionExited(region));
    }

    pub fn did_start_monitoring_for(&self, region: Region) {
        self.proxy.route(&LocationEvent::RegionMonitoringStarted(region));
    }

    pub fn monitoring_did_fail_for(&self, region: Option<Region>, error: PlatformError) {
        self.proxy
            .route(&LocationEvent::RegionMonitoringFailed { region, error });
    }

    pub fn did_update_heading(&self, heading: Heading) {
        self.proxy.route(&LocationEvent::HeadingUpdated(heading));
    }

    pub fn did_range_beacons(&self, beacons: Vec<Beacon>, constraint: BeaconConstraint) {
        self.proxy
            .route(&LocationEvent::BeaconsRanged { beacons, constraint });
    }

    pub fn did_fail_ranging_for(&self, constraint: BeaconConstraint, error: PlatformError) {
        self.proxy
            .route(&LocationEvent::BeaconRangingFailed { constraint, error });
    }

    /// Legacy single-status authorization callback.
    pub fn did_change_authorization(&self, status: AuthorizationStatus) {
        self.proxy.route(&LocationEvent::AuthorizationChanged(status));
    }

    pub fn did_change_accuracy_authorization(&self, accuracy: AccuracyAuthorization) {
        self.proxy
            .route(&LocationEvent::AccuracyAuthorizationChanged(accuracy));
    }

    /// Combined authorization callback.
    ///
    /// Fans out to the services-enabled, authorization and accuracy events,
    /// in that order.
    pub fn did_change_authorization_state(&self, state: AuthorizationState) {
        self.proxy.route(&LocationEvent::LocationServicesEnabledChanged(
            state.location_services_enabled,
        ));
        self.proxy
            .route(&LocationEvent::AuthorizationChanged(state.status));
        self.proxy
            .route(&LocationEvent::AccuracyAuthorizationChanged(state.accuracy));
    }
}
