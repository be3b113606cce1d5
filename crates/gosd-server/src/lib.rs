//! HTTP server for the gosd API front.
//!
//! - HTTP/1.1 via Hyper
//! - Prefix-mounted routing of the endpoint catalogue
//! - Handlers run off the async runtime under a per-request timeout
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Example
//!
//! ```rust,no_run
//! use gosd_core::Handlers;
//! use gosd_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .http_addr("0.0.0.0:3000")
//!         .api_prefix("/v4")
//!         .build();
//!
//!     Server::new(config, Handlers::stubbed()).run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod response;
mod server;
mod shutdown;

pub use app::App;
pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_API_PREFIX, DEFAULT_HTTP_ADDR,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use response::{
    error_response, forbidden, json_response, success_response, without_body, HttpResponse,
};
pub use server::{Server, ServerError};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
