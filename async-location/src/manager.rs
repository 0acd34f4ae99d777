//! The async location manager.
//!
//! Every operation follows the same pattern: build a performer, link it to a
//! fresh one-shot or stream sink, register it with the [`DelegateProxy`],
//! then poke the platform. Registration always happens before the platform
//! call so that a callback fired synchronously from inside that call is not
//! missed.
//!
//! Starting and stopping monitoring activity is serialized by one activity
//! lock shared with every stream's teardown. Without it a stream torn down
//! while another starts the same activity could stop the platform after the
//! new stream was registered.

use std::fmt;
use std::sync::Arc;

use location_proxy::{
    AccuracyAuthorization, AuthorizationStatus, BeaconConstraint, DelegateProxy, Interest,
    LocationAccuracy, LocationDelegate, LocationEvent, PerformerId, PermissionKind, Performer,
    Region, Resolution, Sink,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::builder::AsyncLocationManagerBuilder;
use crate::config::ManagerConfig;
use crate::error::{LocationError, Result};
use crate::events::{
    AccuracyAuthorizationEvent, AuthorizationEvent, BeaconRangingEvent, HeadingMonitorEvent,
    LocationEnabledEvent, LocationUpdateEvent, RegionMonitoringEvent, VisitMonitoringEvent,
};
use crate::platform::{start_activity, stop_activity, LocationPlatform};
use crate::stream::{MonitorStream, Teardown};

/// Cancels a one-shot performer when the awaiting future goes away.
///
/// After resolution the performer is already gone and the cancel is a no-op.
struct CancelOnDrop {
    proxy: Arc<DelegateProxy>,
    id: PerformerId,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.proxy.cancel(self.id);
    }
}

/// Async facade over a [`LocationPlatform`]
pub struct AsyncLocationManager {
    platform: Arc<dyn LocationPlatform>,
    proxy: Arc<DelegateProxy>,
    activity: Arc<Mutex<()>>,
    config: Mutex<ManagerConfig>,
}

impl AsyncLocationManager {
    /// Create a manager with the default configuration.
    pub fn new(platform: Arc<dyn LocationPlatform>) -> Self {
        Self::with_config(platform, ManagerConfig::default())
    }

    pub fn builder(platform: Arc<dyn LocationPlatform>) -> AsyncLocationManagerBuilder {
        AsyncLocationManagerBuilder::new(platform)
    }

    /// Apply an already validated configuration to the platform.
    pub(crate) fn with_config(platform: Arc<dyn LocationPlatform>, config: ManagerConfig) -> Self {
        platform.set_desired_accuracy(config.desired_accuracy);
        platform.set_allows_background_location_updates(config.allows_background_location_updates);
        tracing::debug!("Location manager created with {:?}", config);

        Self {
            platform,
            proxy: Arc::new(DelegateProxy::new()),
            activity: Arc::new(Mutex::new(())),
            config: Mutex::new(config),
        }
    }

    /// The callback target to install on the platform.
    pub fn delegate(&self) -> LocationDelegate {
        LocationDelegate::new(Arc::clone(&self.proxy))
    }

    pub fn proxy(&self) -> &Arc<DelegateProxy> {
        &self.proxy
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> ManagerConfig {
        self.config.lock().clone()
    }

    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.platform.authorization_status()
    }

    pub fn accuracy_authorization(&self) -> AccuracyAuthorization {
        self.platform.accuracy_authorization()
    }

    pub fn location_services_enabled(&self) -> bool {
        self.platform.location_services_enabled()
    }

    pub fn update_accuracy(&self, accuracy: LocationAccuracy) {
        self.config.lock().desired_accuracy = accuracy;
        self.platform.set_desired_accuracy(accuracy);
    }

    /// Toggle background updates. Rejected inside an app clip.
    pub fn update_allows_background_location_updates(&self, allows: bool) -> Result<()> {
        {
            let mut config = self.config.lock();
            let updated = ManagerConfig {
                allows_background_location_updates: allows,
                ..config.clone()
            };
            updated.validate()?;
            *config = updated;
        }
        self.platform.set_allows_background_location_updates(allows);
        Ok(())
    }

    // ------------------------------------------------------------------
    // One-shot requests
    // ------------------------------------------------------------------

    /// Ask the user for location permission.
    ///
    /// Returns immediately with the current status when asking cannot change
    /// anything. Otherwise resolves with the first status different from the
    /// one at request time. Never fails: a request abandoned by the platform
    /// resolves with whatever status it reports at that point.
    pub async fn request_permission(&self, kind: PermissionKind) -> AuthorizationStatus {
        let current = self.platform.authorization_status();
        if !self.can_prompt(kind, current) {
            tracing::debug!("{:?} permission already resolved: {:?}", kind, current);
            return current;
        }

        let (rx, _guard) = match self.register_once(Interest::AuthorizationRequest { current }) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!("Could not register permission request: {}", e);
                return current;
            }
        };

        match kind {
            PermissionKind::WhenInUse => self.platform.request_when_in_use_authorization(),
            PermissionKind::Always => self.platform.request_always_authorization(),
        }

        match rx.await {
            Ok(Ok(LocationEvent::AuthorizationChanged(status))) => status,
            other => {
                tracing::debug!("Permission request ended without a status: {:?}", other);
                self.platform.authorization_status()
            }
        }
    }

    fn can_prompt(&self, kind: PermissionKind, current: AuthorizationStatus) -> bool {
        match (kind, current) {
            (_, AuthorizationStatus::NotDetermined) => true,
            (PermissionKind::Always, AuthorizationStatus::AuthorizedWhenInUse) => {
                !self.config.lock().app_clip
            }
            _ => false,
        }
    }

    /// Ask for temporary full accuracy, using the purpose string registered
    /// under `purpose_key`.
    pub async fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: &str,
    ) -> Result<AccuracyAuthorization> {
        if self.platform.accuracy_authorization() == AccuracyAuthorization::FullAccuracy {
            return Ok(AccuracyAuthorization::FullAccuracy);
        }

        let (rx, guard) = self.register_once(Interest::AccuracyAuthorizationRequest)?;
        let id = guard.id;
        let proxy = Arc::clone(&self.proxy);
        let platform = Arc::downgrade(&self.platform);

        self.platform.request_temporary_full_accuracy_authorization(
            purpose_key,
            Box::new(move |error| {
                if let Some(error) = error {
                    proxy.fail(id, error);
                    return;
                }
                // The platform fires no change callback when accuracy stays reduced.
                let still_reduced = platform.upgrade().map_or(false, |platform| {
                    platform.accuracy_authorization() == AccuracyAuthorization::ReducedAccuracy
                });
                if still_reduced {
                    proxy.route(&LocationEvent::AccuracyAuthorizationChanged(
                        AccuracyAuthorization::ReducedAccuracy,
                    ));
                }
            }),
        );

        match Self::resolved(rx.await)? {
            LocationEvent::AccuracyAuthorizationChanged(accuracy) => Ok(accuracy),
            other => Err(LocationError::UnexpectedEvent(other.kind())),
        }
    }

    /// Request a single location fix.
    ///
    /// A platform failure resolves as [`LocationError::Platform`].
    pub async fn request_location(&self) -> Result<LocationUpdateEvent> {
        let (rx, _guard) = self.register_once(Interest::SingleLocation)?;
        self.platform.request_location();

        LocationUpdateEvent::try_from(Self::resolved(rx.await)?)
    }

    fn register_once(
        &self,
        interest: Interest,
    ) -> Result<(oneshot::Receiver<Resolution>, CancelOnDrop)> {
        let (sink, rx) = Sink::once();
        let performer = Performer::linked(interest, sink);
        let id = performer.id();
        self.proxy.add(performer)?;

        let guard = CancelOnDrop {
            proxy: Arc::clone(&self.proxy),
            id,
        };
        Ok((rx, guard))
    }

    fn resolved(
        received: std::result::Result<Resolution, oneshot::error::RecvError>,
    ) -> Result<LocationEvent> {
        match received {
            Ok(resolution) => Ok(resolution?),
            Err(_) => Err(LocationError::Cancelled),
        }
    }

    // ------------------------------------------------------------------
    // Monitoring
    // ------------------------------------------------------------------

    /// Register a stream performer for `interest`, then start its platform activity.
    fn monitor<T>(&self, interest: Interest) -> Result<MonitorStream<T>> {
        let _activity = self.activity.lock();

        let (sink, rx) = Sink::stream();
        let performer = Performer::linked(interest.clone(), sink);
        let id = performer.id();
        self.proxy.add(performer)?;
        start_activity(self.platform.as_ref(), &interest);

        let teardown = Teardown::new(
            Arc::clone(&self.proxy),
            Arc::clone(&self.platform),
            Arc::clone(&self.activity),
            interest,
        );
        Ok(MonitorStream::new(id, rx, teardown))
    }

    /// Cancel every monitor for `interest` and stop the platform activity behind them.
    fn stop_monitors(&self, interest: &Interest) {
        let _activity = self.activity.lock();

        let cancelled = self
            .proxy
            .cancel_where(interest.performer_type(), |other| other.same_activity(interest));
        tracing::debug!(
            "Stopping {:?}, {} monitor(s) cancelled",
            interest.performer_type(),
            cancelled
        );
        stop_activity(self.platform.as_ref(), interest);
    }

    pub fn start_updating_location(&self) -> Result<MonitorStream<LocationUpdateEvent>> {
        self.monitor(Interest::LocationUpdates)
    }

    pub fn stop_updating_location(&self) {
        self.stop_monitors(&Interest::LocationUpdates);
    }

    /// Observe the system-wide location services switch.
    pub fn start_monitoring_location_enabled(
        &self,
    ) -> Result<MonitorStream<LocationEnabledEvent>> {
        self.monitor(Interest::LocationEnabled)
    }

    pub fn stop_monitoring_location_enabled(&self) {
        self.stop_monitors(&Interest::LocationEnabled);
    }

    pub fn start_monitoring_authorization(&self) -> Result<MonitorStream<AuthorizationEvent>> {
        self.monitor(Interest::AuthorizationChanges)
    }

    pub fn stop_monitoring_authorization(&self) {
        self.stop_monitors(&Interest::AuthorizationChanges);
    }

    pub fn start_monitoring_accuracy_authorization(
        &self,
    ) -> Result<MonitorStream<AccuracyAuthorizationEvent>> {
        self.monitor(Interest::AccuracyAuthorizationChanges)
    }

    pub fn stop_monitoring_accuracy_authorization(&self) {
        self.stop_monitors(&Interest::AccuracyAuthorizationChanges);
    }

    /// Monitor entry and exit for `region`.
    ///
    /// Monitors for other regions are unaffected by this stream's lifecycle.
    pub fn start_monitoring_region(
        &self,
        region: Region,
    ) -> Result<MonitorStream<RegionMonitoringEvent>> {
        self.monitor(Interest::RegionMonitor(region))
    }

    pub fn stop_monitoring_region(&self, region: &Region) {
        self.stop_monitors(&Interest::RegionMonitor(region.clone()));
    }

    pub fn start_monitoring_visits(&self) -> Result<MonitorStream<VisitMonitoringEvent>> {
        self.monitor(Interest::VisitMonitor)
    }

    pub fn stop_monitoring_visits(&self) {
        self.stop_monitors(&Interest::VisitMonitor);
    }

    pub fn start_updating_heading(&self) -> Result<MonitorStream<HeadingMonitorEvent>> {
        self.monitor(Interest::HeadingMonitor)
    }

    pub fn stop_updating_heading(&self) {
        self.stop_monitors(&Interest::HeadingMonitor);
    }

    pub fn start_ranging_beacons(
        &self,
        constraint: BeaconConstraint,
    ) -> Result<MonitorStream<BeaconRangingEvent>> {
        self.monitor(Interest::BeaconRanging(constraint))
    }

    pub fn stop_ranging_beacons(&self, constraint: &BeaconConstraint) {
        self.stop_monitors(&Interest::BeaconRanging(*constraint));
    }
}

impl fmt::Debug for AsyncLocationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLocationManager")
            .field("config", &*self.config.lock())
            .field("performers", &self.proxy.len())
            .finish_non_exhaustive()
    }
}
