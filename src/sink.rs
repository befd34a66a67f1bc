//! Structured log sink for breaker transitions.

use tracing::info;

use crate::transition::TransitionPayload;

/// Destination for transition log records.
///
/// Implementations must not panic from `info`; emission is fire-and-forget
/// from the breaker's perspective and carries no return value.
pub trait LogSink: Send + Sync {
    /// Emit one structured record with a human-readable message.
    fn info(&self, payload: &TransitionPayload, message: &str);
}

/// Default sink that forwards transitions to the `tracing` ecosystem as
/// structured fields at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, payload: &TransitionPayload, message: &str) {
        info!(
            source_name = %payload.source_name,
            target_name = %payload.target_name,
            state = payload.state.as_str(),
            duration_ms = payload.duration,
            time_ms = payload.time,
            total_count = payload.total_count,
            error_count = payload.error_count,
            error_percentage = payload.error_percentage,
            "{message}",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BreakerState;

    #[test]
    fn test_tracing_sink_emits_without_panicking() {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .finish();

        let payload = TransitionPayload {
            source_name: "foo".to_string(),
            target_name: "bar".to_string(),
            state: BreakerState::Open,
            duration: None,
            time: 0,
            total_count: 4,
            error_count: 3,
            error_percentage: 75.0,
        };

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.info(&payload, "Circuit breaker state changed");
        });
    }
}
