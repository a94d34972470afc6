//! Reporting utilities: run summaries and step listings.

pub mod format;

pub use format::*;
