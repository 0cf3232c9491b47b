//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the in-memory `Table` passed between stages
//! - the canonical `RateRecord` and its column names
//! - run configuration (`EtlConfig`, `VizConfig`)

pub mod config;
pub mod record;
pub mod table;

pub use config::*;
pub use record::*;
pub use table::*;
