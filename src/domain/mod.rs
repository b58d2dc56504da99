//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the user-selectable inputs (`Granularity`, `ChartView`, `DashConfig`)
//! - the tabular shapes the pipeline moves between (`WideTable`, `LongRecord`)
//! - the time key parsed out of warehouse rows (`TimeKey`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
