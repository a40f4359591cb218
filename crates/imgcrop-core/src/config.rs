//! Per-session configuration: bounds, steps and policies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clamp::{Bounds, RotationPolicy, StepPolicy};
use crate::export::ExportOptions;

/// Errors found while validating a [`CropConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A bound or step is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Lower bound above upper bound.
    #[error("invalid {name} range: min ({min}) must not exceed max ({max})")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    /// Wrapping needs a range with non-zero width.
    #[error("rotation range [{min}, {max}) is empty and cannot wrap")]
    EmptyWrapRange { min: f64, max: f64 },

    /// Step is zero or negative.
    #[error("{name} must be positive, got {value}")]
    InvalidStep { name: &'static str, value: f64 },
}

/// Bounds and step sizes for one editing session.
///
/// Any subset of fields can be supplied when deserializing; the rest fall
/// back to [`CropConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Half the amount a zoom button moves the zoom.
    pub zoom_step: f64,
    pub min_rotation: f64,
    pub max_rotation: f64,
    /// Degrees per rotate button press.
    pub rotation_step: f64,
    pub zoom_policy: StepPolicy,
    pub rotation_policy: RotationPolicy,
    pub export: ExportOptions,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 3.0,
            zoom_step: 0.1,
            min_rotation: 0.0,
            max_rotation: 360.0,
            rotation_step: 5.0,
            zoom_policy: StepPolicy::default(),
            rotation_policy: RotationPolicy::default(),
            export: ExportOptions::default(),
        }
    }
}

impl CropConfig {
    /// Create a configuration with the default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom_bounds(&self) -> Bounds {
        Bounds::new(self.min_zoom, self.max_zoom, self.zoom_step)
    }

    pub fn rotation_bounds(&self) -> Bounds {
        Bounds::new(self.min_rotation, self.max_rotation, self.rotation_step)
    }

    /// Amount one zoom button press moves the zoom.
    #[inline]
    pub fn zoom_increment(&self) -> f64 {
        self.zoom_step * 2.0
    }

    /// Check that every bound is finite, ordered and every step positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
            ("min_rotation", self.min_rotation),
            ("max_rotation", self.max_rotation),
            ("rotation_step", self.rotation_step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvalidRange {
                name: "zoom",
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if self.min_rotation > self.max_rotation {
            return Err(ConfigError::InvalidRange {
                name: "rotation",
                min: self.min_rotation,
                max: self.max_rotation,
            });
        }
        if self.rotation_policy == RotationPolicy::Wrap && self.min_rotation == self.max_rotation {
            return Err(ConfigError::EmptyWrapRange {
                min: self.min_rotation,
                max: self.max_rotation,
            });
        }

        if self.zoom_step <= 0.0 {
            return Err(ConfigError::InvalidStep {
                name: "zoom_step",
                value: self.zoom_step,
            });
        }
        if self.rotation_step <= 0.0 {
            return Err(ConfigError::InvalidStep {
                name: "rotation_step",
                value: self.rotation_step,
            });
        }

        Ok(())
    }

    /// Default zoom clamped into this configuration's range.
    pub(crate) fn initial_zoom(&self) -> f64 {
        self.zoom_bounds().clamp(1.0)
    }

    /// Default rotation brought into this configuration's range.
    pub(crate) fn initial_rotation(&self) -> f64 {
        crate::clamp::normalize_rotation(&self.rotation_bounds(), 0.0, self.rotation_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::InterpolationFilter;

    #[test]
    fn test_defaults() {
        let config = CropConfig::default();
        assert_eq!(config.min_zoom, 1.0);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.zoom_step, 0.1);
        assert_eq!(config.min_rotation, 0.0);
        assert_eq!(config.max_rotation, 360.0);
        assert_eq!(config.rotation_step, 5.0);
        assert_eq!(config.zoom_policy, StepPolicy::Clamp);
        assert_eq!(config.rotation_policy, RotationPolicy::Wrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zoom_increment_is_double_step() {
        let config = CropConfig::default();
        assert!((config.zoom_increment() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_inverted_zoom() {
        let mut config = CropConfig::default();
        config.min_zoom = 4.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRange {
                name: "zoom",
                min: 4.0,
                max: 3.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut config = CropConfig::default();
        config.max_rotation = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite {
                name: "max_rotation",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut config = CropConfig::default();
        config.zoom_step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStep {
                name: "zoom_step",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_empty_wrap_range() {
        let mut config = CropConfig::default();
        config.min_rotation = 0.0;
        config.max_rotation = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyWrapRange { .. })
        ));

        // A fixed rotation is fine when not wrapping
        config.rotation_policy = RotationPolicy::Clamp;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CropConfig =
            serde_json::from_str(r#"{ "max_zoom": 5, "rotation_step": 90 }"#).unwrap();
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.rotation_step, 90.0);
        assert_eq!(config.min_zoom, 1.0);
        assert_eq!(config.zoom_step, 0.1);
    }

    #[test]
    fn test_json_policies() {
        let config: CropConfig = serde_json::from_str(
            r#"{ "zoom_policy": "gate", "rotation_policy": "clamp", "export": { "interpolation": "lanczos3" } }"#,
        )
        .unwrap();
        assert_eq!(config.zoom_policy, StepPolicy::Gate);
        assert_eq!(config.rotation_policy, RotationPolicy::Clamp);
        assert_eq!(config.export.interpolation, InterpolationFilter::Lanczos3);
    }

    #[test]
    fn test_initial_values_respect_bounds() {
        let mut config = CropConfig::default();
        config.min_zoom = 2.0;
        config.min_rotation = 10.0;
        config.max_rotation = 20.0;
        config.rotation_policy = RotationPolicy::Clamp;
        assert_eq!(config.initial_zoom(), 2.0);
        assert_eq!(config.initial_rotation(), 10.0);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidStep {
            name: "rotation_step",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "rotation_step must be positive, got -1");
    }
}
