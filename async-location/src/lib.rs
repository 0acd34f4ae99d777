//! # async-location
//!
//! Async/await access to a callback-based platform location service.
//!
//! The host implements [`LocationPlatform`] over its native location manager
//! and installs [`AsyncLocationManager::delegate`] as that manager's callback
//! target. From then on:
//!
//! - one-shot requests (`request_permission`, `request_location`,
//!   `request_temporary_full_accuracy_authorization`) are plain `async fn`s;
//!   dropping the future withdraws the request;
//! - `start_*` methods return a [`MonitorStream`] of typed events; dropping
//!   or stopping the stream stops the matching platform activity once no
//!   other stream needs it.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_location::{AsyncLocationManager, LocationUpdateEvent, PermissionKind};
//! use futures::StreamExt;
//!
//! let manager = AsyncLocationManager::new(platform.clone());
//! platform.set_delegate(manager.delegate());
//!
//! let status = manager.request_permission(PermissionKind::WhenInUse).await;
//! if status.is_authorized() {
//!     let mut updates = manager.start_updating_location()?;
//!     while let Some(event) = updates.next().await {
//!         if let LocationUpdateEvent::DidUpdateLocations(fixes) = event {
//!             println!("{} new fixes", fixes.len());
//!         }
//!     }
//! }
//! ```

mod builder;
mod config;
mod error;
mod events;
mod manager;
mod platform;
mod stream;

pub mod logging;

pub use builder::AsyncLocationManagerBuilder;
pub use config::ManagerConfig;
pub use error::{LocationError, Result};
pub use events::{
    AccuracyAuthorizationEvent, AuthorizationEvent, BeaconRangingEvent, HeadingMonitorEvent,
    LocationEnabledEvent, LocationUpdateEvent, RegionMonitoringEvent, VisitMonitoringEvent,
};
pub use manager::AsyncLocationManager;
pub use platform::{AccuracyCompletion, LocationPlatform};
pub use stream::MonitorStream;

// Re-export the routing core types callers need
pub use location_proxy::{
    AccuracyAuthorization, AuthorizationState, AuthorizationStatus, Beacon, BeaconConstraint,
    Coordinate, DelegateProxy, EventKind, Heading, Location, LocationAccuracy, LocationDelegate,
    LocationEvent, PerformerId, PerformerType, PermissionKind, PlatformError, PlatformErrorCode,
    Proximity, ProxyError, Region, RegionShape, Visit,
};
