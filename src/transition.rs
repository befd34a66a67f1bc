//! Per-breaker transition recording.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::backend::{BreakerState, WindowMetrics};
use crate::sink::LogSink;

/// Message attached to every transition log record.
pub const STATE_CHANGE_MESSAGE: &str = "Circuit breaker state changed";

/// Structured record emitted on every open/close transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionPayload {
    /// Name of the calling service.
    pub source_name: String,
    /// Name of the protected dependency.
    pub target_name: String,
    /// State the breaker transitioned into.
    pub state: BreakerState,
    /// Milliseconds spent in the previous state; `None` on the first
    /// observed transition of this breaker instance.
    pub duration: Option<u64>,
    /// Wall-clock time of the transition, in unix-epoch milliseconds.
    pub time: u64,
    /// Total calls in the window at the moment of the transition.
    pub total_count: u64,
    /// Failed calls in the window at the moment of the transition.
    pub error_count: u64,
    /// Failure rate over the window, as a percentage.
    pub error_percentage: f64,
}

/// Records open/close transitions for one breaker instance.
///
/// Holds the timestamp of the previous transition so each record can carry
/// the time spent in the prior state. One recorder per breaker; never
/// shared across breakers.
pub struct TransitionRecorder {
    sink: Arc<dyn LogSink>,
    source_name: String,
    target_name: String,
    // Engines may fire transition hooks from racing callers; the mutex
    // keeps the read-compute-advance sequence atomic per instance.
    last_transition: Mutex<Option<Instant>>,
}

impl TransitionRecorder {
    /// Create a recorder with no prior transition.
    pub fn new(
        sink: Arc<dyn LogSink>,
        source_name: impl Into<String>,
        target_name: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            source_name: source_name.into(),
            target_name: target_name.into(),
            last_transition: Mutex::new(None),
        }
    }

    /// Record one transition: compute the time spent in the previous state,
    /// advance the stored timestamp, emit exactly one log record, and
    /// return the payload for direct assertion.
    ///
    /// The timestamp is advanced before emission, so bookkeeping completes
    /// even if the sink misbehaves.
    pub fn record(&self, state: BreakerState, metrics: WindowMetrics) -> TransitionPayload {
        let (duration, time) = {
            let mut last = self.last_transition.lock();
            let now = Instant::now();
            let duration = last.map(|previous| now.duration_since(previous).as_millis() as u64);
            *last = Some(now);
            (duration, unix_millis())
        };

        let payload = TransitionPayload {
            source_name: self.source_name.clone(),
            target_name: self.target_name.clone(),
            state,
            duration,
            time,
            total_count: metrics.total_count,
            error_count: metrics.error_count,
            error_percentage: metrics.error_percentage,
        };

        debug!(
            source_name = %payload.source_name,
            target_name = %payload.target_name,
            state = state.as_str(),
            "recording breaker transition"
        );
        self.sink.info(&payload, STATE_CHANGE_MESSAGE);

        payload
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use std::thread;
    use std::time::Duration;

    fn metrics() -> WindowMetrics {
        WindowMetrics {
            total_count: 4,
            error_count: 3,
            error_percentage: 75.0,
        }
    }

    fn recorder(sink: Arc<RecordingSink>) -> TransitionRecorder {
        TransitionRecorder::new(sink, "foo", "bar")
    }

    #[test]
    fn test_first_transition_has_no_duration() {
        let sink = Arc::new(RecordingSink::new());
        let payload = recorder(sink).record(BreakerState::Open, metrics());
        assert_eq!(payload.duration, None);
    }

    #[test]
    fn test_close_before_any_open_still_has_no_duration() {
        let sink = Arc::new(RecordingSink::new());
        let payload = recorder(sink).record(BreakerState::Closed, metrics());
        assert_eq!(payload.duration, None);
    }

    #[test]
    fn test_second_transition_measures_time_in_previous_state() {
        let sink = Arc::new(RecordingSink::new());
        let recorder = recorder(sink);

        recorder.record(BreakerState::Open, metrics());
        thread::sleep(Duration::from_millis(100));
        let payload = recorder.record(BreakerState::Closed, metrics());

        let duration = payload.duration.unwrap();
        assert!(duration >= 100, "duration {duration} below sleep time");
        assert!(duration < 2_000, "duration {duration} implausibly large");
    }

    #[test]
    fn test_payload_carries_names_state_and_metrics() {
        let sink = Arc::new(RecordingSink::new());
        let payload = recorder(sink).record(BreakerState::Open, metrics());

        assert_eq!(payload.source_name, "foo");
        assert_eq!(payload.target_name, "bar");
        assert_eq!(payload.state, BreakerState::Open);
        assert_eq!(payload.total_count, 4);
        assert_eq!(payload.error_count, 3);
        assert_eq!(payload.error_percentage, 75.0);
        assert!(payload.time > 0);
    }

    #[test]
    fn test_emits_exactly_one_record_per_transition() {
        let sink = Arc::new(RecordingSink::new());
        let recorder = recorder(Arc::clone(&sink));

        recorder.record(BreakerState::Open, metrics());
        recorder.record(BreakerState::Closed, metrics());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|(_, msg)| msg == STATE_CHANGE_MESSAGE));
    }

    #[test]
    fn test_payload_serializes_with_null_duration_and_lowercase_state() {
        let sink = Arc::new(RecordingSink::new());
        let payload = recorder(sink).record(BreakerState::Open, metrics());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["state"], "open");
        assert!(value["duration"].is_null());
        assert_eq!(value["source_name"], "foo");
        assert_eq!(value["target_name"], "bar");
        assert_eq!(value["total_count"], 4);
        assert_eq!(value["error_count"], 3);
        assert_eq!(value["error_percentage"], 75.0);
    }

    #[test]
    fn test_concurrent_transitions_never_tear_the_timestamp() {
        let sink = Arc::new(RecordingSink::new());
        let recorder = Arc::new(TransitionRecorder::new(
            Arc::clone(&sink) as Arc<dyn LogSink>,
            "foo",
            "bar",
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let recorder = Arc::clone(&recorder);
                thread::spawn(move || {
                    let state = if i % 2 == 0 {
                        BreakerState::Open
                    } else {
                        BreakerState::Closed
                    };
                    recorder.record(state, metrics())
                })
            })
            .collect();

        let payloads: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one thread observes the fresh recorder.
        let firsts = payloads.iter().filter(|p| p.duration.is_none()).count();
        assert_eq!(firsts, 1);
        assert_eq!(sink.records().len(), 8);
    }
}
