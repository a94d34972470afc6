//! `market-dash` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - table normalization is testable without spawning processes
//! - recipes and charts can be reused by other front-ends
//! - code stays easy to navigate as datasets are added

pub mod app;
pub mod charts;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod plot;
pub mod recipes;
pub mod report;
