//! Input helpers.
//!
//! - CSV ingest into a text `Table` (`ingest`)

pub mod ingest;

pub use ingest::*;
