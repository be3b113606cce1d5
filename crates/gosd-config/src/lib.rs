//! Typed configuration for gosd.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`GOSD__SECTION__KEY`)
//! - Strict parsing: unknown sections and fields are errors
//! - Layered loading: defaults → file → environment
//!
//! # Example
//!
//! ```no_run
//! use gosd_config::ConfigLoader;
//!
//! # fn main() -> Result<(), gosd_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("gosd.toml")?
//!     .with_env_prefix("GOSD")
//!     .load()?;
//!
//! println!("listening on {}{}", config.server.http_addr, config.server.api_prefix);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:3000"
//! api_prefix = "/v4"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//!
//! [policy]
//! path = "policy.json"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::GosdConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, PolicyConfig, ServerConfig};
