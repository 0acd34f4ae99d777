//! # location-proxy
//!
//! In-process routing core that turns a callback-driven platform
//! location API into resolvable requests and event streams.
//!
//! # Overview
//!
//! - [`LocationEvent`]: one immutable value per platform callback, tagged by [`EventKind`].
//! - [`Performer`]: a pending operation; an [`Interest`] that decides which events
//!   are for it, plus a [`Sink`] that is either resolved once or fed as a stream.
//! - [`DelegateProxy`]: the registry of live performers. Platform callbacks are
//!   routed through it; one-shot performers are removed atomically with their
//!   resolution.
//! - [`LocationDelegate`]: the thin adapter the host installs as the platform's
//!   callback target.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use location_proxy::{DelegateProxy, Interest, LocationDelegate, LocationEvent, Performer, Sink};
//!
//! let proxy = Arc::new(DelegateProxy::new());
//! let (sink, mut rx) = Sink::stream();
//! proxy.add(Performer::linked(Interest::LocationEnabled, sink)).unwrap();
//!
//! let delegate = LocationDelegate::new(Arc::clone(&proxy));
//! delegate.did_change_authorization_state(location_proxy::AuthorizationState {
//!     status: location_proxy::AuthorizationStatus::AuthorizedWhenInUse,
//!     accuracy: location_proxy::AccuracyAuthorization::FullAccuracy,
//!     location_services_enabled: true,
//! });
//!
//! assert_eq!(rx.try_recv().ok(), Some(LocationEvent::LocationServicesEnabledChanged(true)));
//! ```
//!
//! This crate is intended for use by `async-location`, which wraps it in an
//! awaitable facade.

pub mod delegate;
pub mod error;
pub mod event;
pub mod performer;
pub mod proxy;
pub mod types;

pub use delegate::{AuthorizationState, LocationDelegate};
pub use error::{PlatformError, PlatformErrorCode, ProxyError, Result};
pub use event::{EventKind, LocationEvent};
pub use performer::{Delivery, Interest, Performer, PerformerId, PerformerType, Resolution, Sink};
pub use proxy::{DelegateProxy, ProxyStats};
pub use types::*;
