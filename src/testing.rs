//! Test utilities: a recording sink and a stub engine.
//!
//! These replace ad-hoc mutation of production breaker objects in tests:
//! the stub drives transitions purely through the options' hook surface,
//! and the recording sink captures what would have been logged.

use parking_lot::Mutex;

use crate::backend::{BreakerBackend, BreakerState, WindowMetrics};
use crate::options::BreakerOptions;
use crate::sink::LogSink;
use crate::transition::TransitionPayload;

/// Sink that captures every emitted record for later assertion.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(TransitionPayload, String)>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records captured so far, in emission order.
    pub fn records(&self) -> Vec<(TransitionPayload, String)> {
        self.records.lock().clone()
    }

    /// Payloads only, without the messages.
    pub fn payloads(&self) -> Vec<TransitionPayload> {
        self.records
            .lock()
            .iter()
            .map(|(payload, _)| payload.clone())
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn info(&self, payload: &TransitionPayload, message: &str) {
        self.records
            .lock()
            .push((payload.clone(), message.to_string()));
    }
}

/// Minimal engine for exercising construction and instrumentation.
///
/// Stores the options it was built with and flips between open and closed
/// on demand, firing the bound hooks exactly once per actual transition the
/// way a real sliding-window engine must.
pub struct StubBackend {
    options: BreakerOptions,
    state: Mutex<BreakerState>,
}

impl BreakerBackend for StubBackend {
    fn from_options(options: BreakerOptions) -> Self {
        Self {
            options,
            state: Mutex::new(BreakerState::Closed),
        }
    }

    fn state(&self) -> BreakerState {
        *self.state.lock()
    }
}

impl StubBackend {
    /// The options this engine was constructed with.
    pub fn options(&self) -> &BreakerOptions {
        &self.options
    }

    /// Force an open transition, as if the window tripped.
    ///
    /// No-op when already open.
    pub fn trip(&self, metrics: WindowMetrics) {
        let mut state = self.state.lock();
        if *state == BreakerState::Open {
            return;
        }
        *state = BreakerState::Open;
        drop(state);
        if let Some(hook) = &self.options.on_circuit_open {
            hook(metrics);
        }
    }

    /// Force a close transition, as if a trial call succeeded.
    ///
    /// No-op when already closed.
    pub fn restore(&self, metrics: WindowMetrics) {
        let mut state = self.state.lock();
        if *state == BreakerState::Closed {
            return;
        }
        *state = BreakerState::Closed;
        drop(state);
        if let Some(hook) = &self.options.on_circuit_close {
            hook(metrics);
        }
    }

    /// Return to the closed state without firing any hook, discarding
    /// accumulated history the way a window reset would.
    pub fn reset(&self) {
        *self.state.lock() = BreakerState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakerConfig;
    use crate::factory::create;
    use std::sync::Arc;

    fn metrics() -> WindowMetrics {
        WindowMetrics {
            total_count: 10,
            error_count: 6,
            error_percentage: 60.0,
        }
    }

    #[test]
    fn test_stub_fires_open_hook_once_per_transition() {
        let sink = Arc::new(RecordingSink::new());
        let handle =
            create::<StubBackend>(BreakerConfig::new("foo", "bar"), Some(Arc::clone(&sink) as _))
                .unwrap();

        handle.backend().trip(metrics());
        handle.backend().trip(metrics());

        assert_eq!(handle.state(), BreakerState::Open);
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.payloads()[0].state, BreakerState::Open);
    }

    #[test]
    fn test_stub_round_trip_logs_both_transitions() {
        let sink = Arc::new(RecordingSink::new());
        let handle =
            create::<StubBackend>(BreakerConfig::new("foo", "bar"), Some(Arc::clone(&sink) as _))
                .unwrap();

        handle.backend().trip(metrics());
        handle.backend().restore(metrics());

        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].state, BreakerState::Open);
        assert_eq!(payloads[1].state, BreakerState::Closed);
        assert_eq!(payloads[0].duration, None);
        assert!(payloads[1].duration.is_some());
    }

    #[test]
    fn test_reset_closes_without_logging() {
        let sink = Arc::new(RecordingSink::new());
        let handle =
            create::<StubBackend>(BreakerConfig::new("foo", "bar"), Some(Arc::clone(&sink) as _))
                .unwrap();

        handle.backend().trip(metrics());
        handle.backend().reset();

        assert_eq!(handle.state(), BreakerState::Closed);
        assert_eq!(sink.records().len(), 1);
    }
}
