//! Contract for the underlying sliding-window breaker engine.
//!
//! This crate does not implement the bucket accounting or trip/reset state
//! machine itself. It prepares [`BreakerOptions`](crate::BreakerOptions) and
//! hands them to any engine implementing [`BreakerBackend`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::options::BreakerOptions;

/// Breaker states observable by this crate.
///
/// Engines may model additional internal states (e.g. half-open during a
/// trial call), but only open and closed transitions are instrumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakerState {
    /// Requests are blocked; the protected dependency is assumed down.
    Open,
    /// Requests pass through normally.
    Closed,
}

impl BreakerState {
    /// Lowercase state name as it appears in log payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Open => "open",
            BreakerState::Closed => "closed",
        }
    }
}

/// Window statistics supplied by the engine on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    /// Total calls observed in the current window.
    pub total_count: u64,
    /// Failed calls observed in the current window.
    pub error_count: u64,
    /// Failure rate over the window, as a percentage.
    pub error_percentage: f64,
}

/// Transition hook invoked by the engine with the window metrics at the
/// moment of the transition.
pub type TransitionCallback = Arc<dyn Fn(WindowMetrics) + Send + Sync>;

/// A sliding-window circuit breaker engine.
///
/// Implementors must invoke `on_circuit_open` exactly once per transition
/// into [`BreakerState::Open`] and `on_circuit_close` exactly once per
/// transition into [`BreakerState::Closed`].
pub trait BreakerBackend: Sized {
    /// Construct the engine from translated options.
    ///
    /// The options are already validated; construction is infallible.
    fn from_options(options: BreakerOptions) -> Self;

    /// Current state of the breaker.
    fn state(&self) -> BreakerState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(BreakerState::Open).unwrap(),
            serde_json::json!("open")
        );
        assert_eq!(BreakerState::Closed.as_str(), "closed");
    }

    #[test]
    fn test_metrics_roundtrip_field_names() {
        let metrics = WindowMetrics {
            total_count: 4,
            error_count: 3,
            error_percentage: 75.0,
        };
        let value = serde_json::to_value(metrics).unwrap();
        assert_eq!(value["total_count"], 4);
        assert_eq!(value["error_count"], 3);
        assert_eq!(value["error_percentage"], 75.0);
    }
}
