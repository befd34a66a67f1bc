//! Translation from validated config to engine options.

use std::fmt;
use std::time::Duration;

use crate::backend::TransitionCallback;
use crate::config::ValidatedConfig;

/// Options consumed by the underlying breaker engine.
///
/// Produced by [`BreakerOptions::from_config`]; the two transition hooks are
/// left unset there and bound later by the factory, keeping field mapping
/// separate from instrumentation.
#[derive(Clone)]
pub struct BreakerOptions {
    /// Total span of the sliding window.
    pub window_duration: Duration,
    /// Number of buckets in the sliding window.
    pub num_buckets: u32,
    /// Cooldown before an open breaker allows a trial call.
    pub timeout_duration: Duration,
    /// Error percentage (0-100) that trips the breaker.
    pub error_threshold: f64,
    /// Minimum call volume before the error percentage is evaluated.
    pub volume_threshold: u32,
    /// Invoked exactly once per transition into the open state.
    pub on_circuit_open: Option<TransitionCallback>,
    /// Invoked exactly once per transition into the closed state.
    pub on_circuit_close: Option<TransitionCallback>,
}

impl BreakerOptions {
    /// Map a validated config onto the engine's option fields.
    ///
    /// Pure; performs no validation. Both hooks are `None`.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            window_duration: Duration::from_millis(config.window_duration),
            num_buckets: config.num_buckets,
            timeout_duration: Duration::from_millis(config.timeout_duration),
            error_threshold: config.error_threshold,
            volume_threshold: config.volume_threshold,
            on_circuit_open: None,
            on_circuit_close: None,
        }
    }
}

impl fmt::Debug for BreakerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerOptions")
            .field("window_duration", &self.window_duration)
            .field("num_buckets", &self.num_buckets)
            .field("timeout_duration", &self.timeout_duration)
            .field("error_threshold", &self.error_threshold)
            .field("volume_threshold", &self.volume_threshold)
            .field("on_circuit_open", &self.on_circuit_open.is_some())
            .field("on_circuit_close", &self.on_circuit_close.is_some())
            .finish()
    }
}
