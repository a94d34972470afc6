//! Table pipelines: named steps applied in order by a small runner.
//!
//! Lifecycle: `raw → renamed → converted → filled → (reshaped → pivoted) → exported`.

pub mod runner;
pub mod step;

pub use runner::*;
pub use step::*;
