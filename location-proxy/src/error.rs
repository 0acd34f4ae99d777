//! Error types for the location-proxy crate.

use serde::{Deserialize, Serialize};

use crate::performer::PerformerId;

/// Error codes reported by the platform location subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformErrorCode {
    /// A fix could not be obtained right now; the platform keeps trying
    LocationUnknown,
    /// The user denied access to location services
    Denied,
    /// The network was unavailable
    Network,
    /// Heading could not be determined, usually magnetic interference
    HeadingFailure,
    RegionMonitoringDenied,
    RegionMonitoringFailure,
    /// Monitoring will start once the platform is able to
    RegionMonitoringSetupDelayed,
    RangingUnavailable,
    RangingFailure,
    /// The user dismissed an accuracy prompt
    PromptDeclined,
    Other(i64),
}

impl std::fmt::Display for PlatformErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformErrorCode::Other(code) => write!(f, "Other({})", code),
            code => write!(f, "{:?}", code),
        }
    }
}

/// An operational error reported through a platform callback.
///
/// These never affect the registry itself; they are delivered to whichever
/// performers accept the failing kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Platform error {code}: {message}")]
pub struct PlatformError {
    pub code: PlatformErrorCode,
    pub message: String,
}

impl PlatformError {
    pub fn new(code: PlatformErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for an error that carries only a code.
    pub fn from_code(code: PlatformErrorCode) -> Self {
        Self::new(code, code.to_string())
    }
}

/// Misuse of the performer/registry contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// `link` was called on a performer that already has a sink
    #[error("Performer {0} is already linked to a sink")]
    AlreadyLinked(PerformerId),

    /// A performer without a sink was handed to the registry
    #[error("Performer {0} must be linked before it is registered")]
    Unlinked(PerformerId),
}

/// Convenience type alias for Results using ProxyError.
pub type Result<T> = std::result::Result<T, ProxyError>;
