//! Breaker construction: request validation, hook binding, instantiation.

use std::sync::Arc;
use tracing::debug;

use crate::backend::{BreakerBackend, BreakerState, WindowMetrics};
use crate::config::{BreakerConfig, ValidatedConfig};
use crate::error::{Result, ValidationError};
use crate::options::BreakerOptions;
use crate::sink::LogSink;
use crate::transition::{TransitionPayload, TransitionRecorder};

/// Composite construction request: a raw config plus a log sink.
pub struct ConstructionRequest {
    /// Raw, unvalidated breaker configuration.
    pub config: BreakerConfig,
    /// Log sink for transition records; `None` is a validation failure.
    pub logger: Option<Arc<dyn LogSink>>,
}

impl ConstructionRequest {
    /// Validate the request as a unit.
    ///
    /// Config failures are re-reported under the `config.*` field path; a
    /// missing sink fails on the `logger` field. Either way the error names
    /// which part of the request is at fault.
    pub fn validate(self) -> Result<(ValidatedConfig, Arc<dyn LogSink>)> {
        let config = self.config.validate().map_err(|e| e.scoped("config"))?;
        let logger = self.logger.ok_or_else(|| {
            ValidationError::new("logger", "a log sink is required").with_constraint("required")
        })?;
        Ok((config, logger))
    }
}

/// A constructed breaker: the underlying engine plus its bound transition
/// recorder.
///
/// The instrumentation hooks stay externally invocable; [`on_open`] and
/// [`on_close`] reproduce exactly the behavior of an organic engine
/// transition, which keeps the logging path directly testable.
///
/// [`on_open`]: BreakerHandle::on_open
/// [`on_close`]: BreakerHandle::on_close
pub struct BreakerHandle<B> {
    backend: B,
    recorder: Arc<TransitionRecorder>,
}

impl<B> std::fmt::Debug for BreakerHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakerHandle").finish_non_exhaustive()
    }
}

impl<B: BreakerBackend> BreakerHandle<B> {
    /// The underlying engine, exposing its call-guarding surface.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the underlying engine.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current state of the breaker.
    pub fn state(&self) -> BreakerState {
        self.backend.state()
    }

    /// Invoke the open-transition hook directly.
    pub fn on_open(&self, metrics: WindowMetrics) -> TransitionPayload {
        self.recorder.record(BreakerState::Open, metrics)
    }

    /// Invoke the close-transition hook directly.
    pub fn on_close(&self, metrics: WindowMetrics) -> TransitionPayload {
        self.recorder.record(BreakerState::Closed, metrics)
    }
}

/// Create a circuit breaker from a raw config and a log sink.
///
/// Validates the request, translates the config into engine options, binds
/// a fresh per-instance transition recorder onto the open/close hooks, and
/// instantiates the engine. Fails with [`ValidationError`] before the
/// engine is touched; no partially constructed breaker is ever returned.
pub fn create<B: BreakerBackend>(
    config: BreakerConfig,
    logger: Option<Arc<dyn LogSink>>,
) -> Result<BreakerHandle<B>> {
    let (config, sink) = ConstructionRequest { config, logger }.validate()?;
    debug!(
        source_name = %config.source_name,
        target_name = %config.target_name,
        "creating circuit breaker"
    );

    let mut options = BreakerOptions::from_config(&config);
    let recorder = Arc::new(TransitionRecorder::new(
        sink,
        config.source_name.clone(),
        config.target_name.clone(),
    ));

    let on_open = Arc::clone(&recorder);
    options.on_circuit_open = Some(Arc::new(move |metrics| {
        on_open.record(BreakerState::Open, metrics);
    }));
    let on_close = Arc::clone(&recorder);
    options.on_circuit_close = Some(Arc::new(move |metrics| {
        on_close.record(BreakerState::Closed, metrics);
    }));

    let backend = B::from_options(options);
    Ok(BreakerHandle { backend, recorder })
}
