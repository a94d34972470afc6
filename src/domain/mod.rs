//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the in-memory record set (`Table`, `Row`, `Value`)
//! - lifecycle states (`TableState`)
//! - resolved run settings (`DashConfig`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
