//! # gradebook Core
//!
//! Core library for gradebook - the client side of the school records tool.
//!
//! It provides two independent pieces: a records API client that turns CRUD
//! calls into HTTP requests, and the page route table that maps browser
//! locations to lazily loaded views.

// Core modules
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod router;
pub mod transport;

// Re-export commonly used types
pub use api::RecordsApi;
pub use app::{app_route_config, app_router, Page};
pub use config::ResolvedApiConfig;
pub use error::{Error, Result};
pub use transport::{ApiRequest, HttpTransport, Method, QueryParams, QueryValue, Transport};

/// Current version of the gradebook-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing from `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing with a specific debug mode
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
