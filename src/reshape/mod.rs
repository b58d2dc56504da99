//! The reshaping core: dataset resolution, wide-to-long melt, single-product
//! projection, and grouping aggregates.
//!
//! Everything here is pure over in-memory tables; loading lives in `data`
//! and presentation in `chart`/`report`/`tui`.

pub mod aggregate;
pub mod filter;
pub mod melt;
pub mod resolve;

pub use aggregate::*;
pub use filter::*;
pub use melt::*;
pub use resolve::*;
