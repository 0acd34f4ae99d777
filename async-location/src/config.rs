//! Configuration for the location manager
//!
//! Settings here are pushed to the platform when the manager is built and can
//! be changed afterwards through the manager's `update_*` methods.

use location_proxy::LocationAccuracy;

use crate::error::{LocationError, Result};

/// Configuration for [`AsyncLocationManager`](crate::AsyncLocationManager)
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    /// Accuracy the platform should aim for
    /// Default: `LocationAccuracy::Best`
    pub desired_accuracy: LocationAccuracy,

    /// Keep delivering location updates while the application is in the background
    /// Default: false
    pub allows_background_location_updates: bool,

    /// Running as a lightweight app clip. App clips cannot upgrade to
    /// "always" authorization and cannot run in the background.
    /// Default: false
    pub app_clip: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            desired_accuracy: LocationAccuracy::Best,
            allows_background_location_updates: false,
            app_clip: false,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn-by-turn style tracking, kept alive in the background
    pub fn navigation() -> Self {
        Self {
            desired_accuracy: LocationAccuracy::BestForNavigation,
            allows_background_location_updates: true,
            ..Default::default()
        }
    }

    /// Coarse positioning for battery-sensitive applications
    pub fn low_power() -> Self {
        Self {
            desired_accuracy: LocationAccuracy::Kilometer,
            ..Default::default()
        }
    }

    pub fn for_app_clip() -> Self {
        Self {
            app_clip: true,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.app_clip && self.allows_background_location_updates {
            return Err(LocationError::Configuration(
                "Background location updates are unavailable in an app clip".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ManagerConfig::default();
        assert_eq!(config.desired_accuracy, LocationAccuracy::Best);
        assert!(!config.allows_background_location_updates);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [
            ManagerConfig::navigation(),
            ManagerConfig::low_power(),
            ManagerConfig::for_app_clip(),
        ] {
            assert!(config.validate().is_ok(), "{:?}", config);
        }
    }

    #[test]
    fn test_background_rejected_in_app_clip() {
        let config = ManagerConfig {
            allows_background_location_updates: true,
            ..ManagerConfig::for_app_clip()
        };

        assert!(matches!(
            config.validate(),
            Err(LocationError::Configuration(_))
        ));
    }
}
