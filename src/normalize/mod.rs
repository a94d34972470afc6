//! Tabular normalization operations.
//!
//! Every operation is a plain function over `Table` values:
//!
//! - renaming (`rename`)
//! - unit conversion (`magnitude`)
//! - null fill + point patches (`fill`)
//! - melt/pivot (`reshape`)
//! - column/row selection (`select`)
//!
//! Transforms take the table by value and hand back the new one; on error the
//! input is dropped, so a half-normalized table never escapes.

pub mod fill;
pub mod magnitude;
pub mod rename;
pub mod reshape;
pub mod select;

pub use fill::*;
pub use magnitude::*;
pub use rename::*;
pub use reshape::*;
pub use select::*;
