//! Minimal configuration module for gradebook core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ResolvedApiConfig, DEFAULT_APP_BASE, DEFAULT_BASE_URL};
