//! # Fusegate
//!
//! Validated, observable construction of per-dependency circuit breakers.
//!
//! A circuit breaker guards a failure-prone remote call: once recent
//! failures exceed a threshold it stops attempting the call for a cooldown
//! period, protecting the caller from cascading failure. This crate owns
//! the layer in front of the sliding-window engine that does the actual
//! bucket accounting:
//!
//! - **Config validation**: every tunable defaulted and range-checked
//!   before anything is built
//! - **Option translation**: validated config mapped onto the engine's
//!   option fields
//! - **Transition instrumentation**: a per-instance recorder bound to the
//!   engine's open/close hooks, emitting one structured log record per
//!   transition with the time spent in the previous state
//!
//! The engine itself is pluggable: anything implementing
//! [`BreakerBackend`] can be constructed through [`create`].
//!
//! ## Quick start
//!
//! ```rust
//! use fusegate::testing::StubBackend;
//! use fusegate::{BreakerConfig, BreakerState, TracingSink, WindowMetrics};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), fusegate::ValidationError> {
//!     let config = BreakerConfig::new("checkout", "payments-api")
//!         .with_error_threshold(25.0)
//!         .with_timeout_duration(30_000);
//!
//!     let breaker = fusegate::create::<StubBackend>(config, Some(Arc::new(TracingSink)))?;
//!     assert_eq!(breaker.state(), BreakerState::Closed);
//!
//!     // Hooks stay externally invocable; each call emits one log record.
//!     let payload = breaker.on_open(WindowMetrics {
//!         total_count: 8,
//!         error_count: 4,
//!         error_percentage: 50.0,
//!     });
//!     assert_eq!(payload.duration, None);
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod error;
mod factory;
mod options;
mod sink;
mod transition;

pub mod testing;

pub use backend::{BreakerBackend, BreakerState, TransitionCallback, WindowMetrics};
pub use config::{BreakerConfig, ValidatedConfig, defaults};
pub use error::{Result, ValidationError};
pub use factory::{BreakerHandle, ConstructionRequest, create};
pub use options::BreakerOptions;
pub use sink::{LogSink, TracingSink};
pub use transition::{STATE_CHANGE_MESSAGE, TransitionPayload, TransitionRecorder};

/// Prelude for common imports.
///
/// ```
/// use fusegate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backend::{BreakerBackend, BreakerState, TransitionCallback, WindowMetrics};
    pub use crate::config::{BreakerConfig, ValidatedConfig};
    pub use crate::error::{Result, ValidationError};
    pub use crate::factory::{BreakerHandle, ConstructionRequest, create};
    pub use crate::options::BreakerOptions;
    pub use crate::sink::{LogSink, TracingSink};
    pub use crate::transition::TransitionPayload;
}
