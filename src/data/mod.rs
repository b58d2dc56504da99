//! Data loading: the warehouse statement API and the offline sample
//! generator.

pub mod sample;
pub mod warehouse;

pub use sample::{SampleConfig, generate_sample};
pub use warehouse::WarehouseClient;

use crate::domain::{Granularity, WideTable};
use crate::error::AppError;

/// Where a run's wide table comes from.
///
/// Each load is explicit and interaction-triggered; neither variant caches
/// across runs.
pub enum DataSource {
    Warehouse(WarehouseClient),
    Sample(SampleConfig),
}

impl DataSource {
    pub fn load(&self, granularity: Granularity) -> Result<WideTable, AppError> {
        match self {
            DataSource::Warehouse(client) => client.load_sales(granularity),
            DataSource::Sample(config) => generate_sample(granularity, config),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Warehouse(_) => "warehouse",
            DataSource::Sample(_) => "sample",
        }
    }
}
