//! Reporting utilities: table previews for the pipeline log.

pub mod format;

pub use format::*;
