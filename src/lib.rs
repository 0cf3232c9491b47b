//! `tibc-etl` library crate.
//!
//! The binary (`tibc`) is a thin wrapper around this library so that:
//!
//! - each ETL stage is testable without spawning processes or hitting the network
//! - the chart step reuses the same schema and storage code as the loader

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod store;
pub mod transform;
