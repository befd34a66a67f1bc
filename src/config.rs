//! Breaker configuration and validation.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Default values for the optional numeric tunables.
///
/// Defined once; validation fills them in and tests reference them instead
/// of duplicating the numbers.
pub mod defaults {
    /// Total span of the sliding window, in milliseconds.
    pub const WINDOW_DURATION_MS: u64 = 1_000;
    /// Number of sub-intervals the window is divided into.
    pub const NUM_BUCKETS: u32 = 10;
    /// Cooldown before an open breaker allows a trial call, in milliseconds.
    pub const TIMEOUT_DURATION_MS: u64 = 10_000;
    /// Error percentage that trips the breaker.
    pub const ERROR_THRESHOLD: f64 = 50.0;
    /// Minimum call volume in the window before the error percentage is evaluated.
    pub const VOLUME_THRESHOLD: u32 = 5;
}

/// Raw breaker configuration, as supplied by the caller.
///
/// All numeric tunables are optional and fall back to the values in
/// [`defaults`] during validation. `source_name` identifies the caller,
/// `target_name` the protected dependency; both are required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakerConfig {
    /// Name of the calling service.
    #[serde(default)]
    pub source_name: Option<String>,
    /// Name of the protected dependency.
    #[serde(default)]
    pub target_name: Option<String>,
    /// Sliding window span in milliseconds.
    #[serde(default)]
    pub window_duration: Option<u64>,
    /// Number of buckets in the sliding window.
    #[serde(default)]
    pub num_buckets: Option<u32>,
    /// Cooldown in milliseconds before a trial call is allowed.
    #[serde(default)]
    pub timeout_duration: Option<u64>,
    /// Error percentage (0-100) that trips the breaker.
    #[serde(default)]
    pub error_threshold: Option<f64>,
    /// Minimum call volume before the error percentage is evaluated.
    #[serde(default)]
    pub volume_threshold: Option<u32>,
}

impl BreakerConfig {
    /// Create a config with the two required names; all tunables default.
    pub fn new(source_name: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            source_name: Some(source_name.into()),
            target_name: Some(target_name.into()),
            ..Default::default()
        }
    }

    /// Set the sliding window span in milliseconds.
    pub fn with_window_duration(mut self, millis: u64) -> Self {
        self.window_duration = Some(millis);
        self
    }

    /// Set the number of buckets in the sliding window.
    pub fn with_num_buckets(mut self, buckets: u32) -> Self {
        self.num_buckets = Some(buckets);
        self
    }

    /// Set the cooldown in milliseconds before a trial call is allowed.
    pub fn with_timeout_duration(mut self, millis: u64) -> Self {
        self.timeout_duration = Some(millis);
        self
    }

    /// Set the error percentage (0-100) that trips the breaker.
    pub fn with_error_threshold(mut self, percentage: f64) -> Self {
        self.error_threshold = Some(percentage);
        self
    }

    /// Set the minimum call volume before the error percentage is evaluated.
    pub fn with_volume_threshold(mut self, volume: u32) -> Self {
        self.volume_threshold = Some(volume);
        self
    }

    /// Build a config from an untyped JSON mapping.
    ///
    /// Unknown keys, wrong types, and negative values where the field is
    /// unsigned are all reported as a [`ValidationError`] with the `schema`
    /// constraint.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            ValidationError::new("config", e.to_string()).with_constraint("schema")
        })
    }

    /// Validate this config, filling in defaults for absent tunables.
    ///
    /// Pure: the input is not mutated. Fails if either name is missing or
    /// empty after trimming, or if `error_threshold` is non-finite or
    /// outside 0-100.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let source_name = required_name("source_name", self.source_name.as_deref())?;
        let target_name = required_name("target_name", self.target_name.as_deref())?;

        let error_threshold = self
            .error_threshold
            .unwrap_or(defaults::ERROR_THRESHOLD);
        if !error_threshold.is_finite() || !(0.0..=100.0).contains(&error_threshold) {
            return Err(
                ValidationError::new("error_threshold", "must be a percentage between 0 and 100")
                    .with_constraint("range")
                    .with_value(error_threshold.to_string()),
            );
        }

        Ok(ValidatedConfig {
            source_name,
            target_name,
            window_duration: self.window_duration.unwrap_or(defaults::WINDOW_DURATION_MS),
            num_buckets: self.num_buckets.unwrap_or(defaults::NUM_BUCKETS),
            timeout_duration: self
                .timeout_duration
                .unwrap_or(defaults::TIMEOUT_DURATION_MS),
            error_threshold,
            volume_threshold: self.volume_threshold.unwrap_or(defaults::VOLUME_THRESHOLD),
        })
    }
}

/// A fully populated, validated breaker configuration.
///
/// Every tunable is present (defaulted where the raw config omitted it) and
/// both names are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedConfig {
    /// Name of the calling service, trimmed.
    pub source_name: String,
    /// Name of the protected dependency, trimmed.
    pub target_name: String,
    /// Sliding window span in milliseconds.
    pub window_duration: u64,
    /// Number of buckets in the sliding window.
    pub num_buckets: u32,
    /// Cooldown in milliseconds before a trial call is allowed.
    pub timeout_duration: u64,
    /// Error percentage (0-100) that trips the breaker.
    pub error_threshold: f64,
    /// Minimum call volume before the error percentage is evaluated.
    pub volume_threshold: u32,
}

fn required_name(field: &'static str, value: Option<&str>) -> Result<String> {
    match value {
        None => Err(ValidationError::new(field, "is required").with_constraint("required")),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(ValidationError::new(field, "must not be empty")
                    .with_constraint("non_empty")
                    .with_value(raw))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}
