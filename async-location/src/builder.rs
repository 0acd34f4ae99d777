//! Builder for creating and configuring the AsyncLocationManager.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_location::{AsyncLocationManager, LocationAccuracy};
//!
//! let manager = AsyncLocationManager::builder(platform)
//!     .with_desired_accuracy(LocationAccuracy::NearestTenMeters)
//!     .with_background_location_updates(true)
//!     .build()?;
//! platform.set_delegate(manager.delegate());
//! ```

use std::sync::Arc;

use location_proxy::LocationAccuracy;

use crate::config::ManagerConfig;
use crate::error::Result;
use crate::manager::AsyncLocationManager;
use crate::platform::LocationPlatform;

/// Fluent configuration for an [`AsyncLocationManager`]
///
/// The configuration is validated when [`build`](Self::build) is called.
pub struct AsyncLocationManagerBuilder {
    platform: Arc<dyn LocationPlatform>,
    config: ManagerConfig,
}

impl AsyncLocationManagerBuilder {
    pub fn new(platform: Arc<dyn LocationPlatform>) -> Self {
        Self {
            platform,
            config: ManagerConfig::default(),
        }
    }

    /// Replace the whole configuration, e.g. with a preset.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_desired_accuracy(mut self, accuracy: LocationAccuracy) -> Self {
        self.config.desired_accuracy = accuracy;
        self
    }

    pub fn with_background_location_updates(mut self, allows: bool) -> Self {
        self.config.allows_background_location_updates = allows;
        self
    }

    /// Mark the host as an app clip.
    pub fn as_app_clip(mut self, app_clip: bool) -> Self {
        self.config.app_clip = app_clip;
        self
    }

    /// Validate the configuration, push it to the platform and create the manager.
    pub fn build(self) -> Result<AsyncLocationManager> {
        self.config.validate()?;
        Ok(AsyncLocationManager::with_config(self.platform, self.config))
    }
}

#[cfg(test)]
mod tests {
    use location_proxy::AuthorizationStatus;

    use super::*;
    use crate::error::LocationError;
    use crate::platform::testing::RecordingPlatform;

    #[test]
    fn test_setters_fill_the_config() {
        let platform = RecordingPlatform::new(AuthorizationStatus::NotDetermined);
        let builder = AsyncLocationManagerBuilder::new(platform)
            .with_desired_accuracy(LocationAccuracy::Kilometer)
            .with_background_location_updates(true);

        assert_eq!(builder.config.desired_accuracy, LocationAccuracy::Kilometer);
        assert!(builder.config.allows_background_location_updates);
        assert!(!builder.config.app_clip);
    }

    #[test]
    fn test_later_setters_override_a_preset() {
        let platform = RecordingPlatform::new(AuthorizationStatus::NotDetermined);
        let manager = AsyncLocationManagerBuilder::new(platform)
            .with_config(ManagerConfig::navigation())
            .with_background_location_updates(false)
            .build()
            .unwrap();

        assert_eq!(
            manager.config().desired_accuracy,
            ManagerConfig::navigation().desired_accuracy
        );
        assert!(!manager.config().allows_background_location_updates);
    }

    #[test]
    fn test_invalid_config_touches_nothing() {
        let platform = RecordingPlatform::new(AuthorizationStatus::NotDetermined);
        let result = AsyncLocationManagerBuilder::new(platform.clone())
            .as_app_clip(true)
            .with_background_location_updates(true)
            .build();

        assert!(matches!(result, Err(LocationError::Configuration(_))));
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn test_build_pushes_config() {
        let platform = RecordingPlatform::new(AuthorizationStatus::NotDetermined);
        let _manager = AsyncLocationManagerBuilder::new(platform.clone())
            .build()
            .unwrap();

        assert_eq!(
            platform.calls(),
            vec!["set_desired_accuracy", "set_allows_background_location_updates"]
        );
    }
}
