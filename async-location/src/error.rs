//! Error types for the async-location crate.

use location_proxy::{EventKind, PlatformError, ProxyError};

/// Errors surfaced by [`AsyncLocationManager`](crate::AsyncLocationManager).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// The platform reported a failure for this request
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The performer could not be registered
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// The pending request was removed before the platform answered
    #[error("Request cancelled before the platform answered")]
    Cancelled,

    /// An event was delivered that the request cannot be resolved with
    #[error("Unexpected {0} event")]
    UnexpectedEvent(EventKind),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using LocationError.
pub type Result<T> = std::result::Result<T, LocationError>;
