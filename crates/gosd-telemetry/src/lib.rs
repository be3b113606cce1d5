//! Structured logging for gosd.
//!
//! - [`init_logging`] installs a JSON or pretty `tracing-subscriber` layer
//!   filtered by an `EnvFilter` directive
//! - [`log_access!`] emits the per-request access log event

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
