//! CLI command implementations

pub mod records;
pub mod route;

pub use records::{records_command, RecordsAction};
pub use route::{route_command, routes_command};
