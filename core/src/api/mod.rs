//! Resource clients for the records server

pub mod records;

pub use records::RecordsApi;
