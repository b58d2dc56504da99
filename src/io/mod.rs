//! Input/output helpers: CSV export of long-form records.

pub mod export;

pub use export::*;
