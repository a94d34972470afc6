//! Input/output helpers.
//!
//! - CSV ingest into raw tables (`ingest`)
//! - CSV export of normalized tables (`export`)
//! - run manifest JSON (`manifest`)

pub mod export;
pub mod ingest;
pub mod manifest;

pub use export::*;
pub use ingest::*;
pub use manifest::*;
