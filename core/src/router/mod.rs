//! Router module for resolving page locations
//!
//! This module provides a declarative route table: path patterns with named
//! segments, deferred views and browser-style history under a base path.

pub mod loader;
pub mod route;
pub mod router;

// Re-export commonly used types
pub use loader::ViewLoader;
pub use route::{PathPattern, Route, RouteName, RouteParams, Segment};
pub use router::{Navigation, RouteMatch, RouteProps, Router, RouterConfig, RouterResult, RouterState};
