//! Shared dashboard pipeline used by both the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve -> load -> melt (or single-product filter) -> aggregate
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::DataSource;
use crate::domain::{DashConfig, LongRecord, WideTable};
use crate::error::AppError;
use crate::reshape::{
    self, DatasetSpec, ProductTotal, YearTotal, aggregate_by_product, aggregate_by_year,
};

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub spec: DatasetSpec,
    pub table: WideTable,
    /// Product columns of the loaded table, in table order.
    pub value_columns: Vec<String>,
    pub records: Vec<LongRecord>,
    pub product_totals: Vec<ProductTotal>,
    pub year_totals: Vec<YearTotal>,
}

/// Execute the full pipeline: load a fresh wide table for the configured
/// granularity and derive everything the views need.
pub fn run_dashboard(source: &DataSource, config: &DashConfig) -> Result<RunOutput, AppError> {
    let table = source.load(config.granularity)?;
    run_with_table(config, table)
}

/// Execute the pipeline over an already-loaded table.
///
/// This is useful for the TUI where a product or view change should
/// recompute without re-querying the warehouse.
pub fn run_with_table(config: &DashConfig, table: WideTable) -> Result<RunOutput, AppError> {
    let spec = reshape::resolve(config.granularity);
    let value_columns = spec.value_columns(&table);

    let records = match &config.product {
        Some(product) => {
            reshape::filter_product(&table, product, spec.id_columns, &value_columns)?
        }
        None => reshape::melt(&table, spec.id_columns, &value_columns)?,
    };

    let product_totals = aggregate_by_product(&records);
    let year_totals = aggregate_by_year(&records);

    Ok(RunOutput {
        spec,
        table,
        value_columns,
        records,
        product_totals,
        year_totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleConfig;
    use crate::domain::{ChartView, Granularity};
    use crate::error::ErrorKind;

    fn sample_source() -> DataSource {
        DataSource::Sample(SampleConfig { rows: 48, seed: 9 })
    }

    fn config(granularity: Granularity, product: Option<&str>) -> DashConfig {
        DashConfig {
            granularity,
            product: product.map(|p| p.to_string()),
            view: ChartView::Series,
        }
    }

    #[test]
    fn full_run_melts_every_product_column() {
        let run = run_dashboard(&sample_source(), &config(Granularity::Daily, None)).unwrap();
        assert_eq!(
            run.records.len(),
            run.table.row_count() * run.value_columns.len()
        );
        assert_eq!(run.product_totals.len(), run.value_columns.len());
    }

    #[test]
    fn hourly_run_keys_on_the_hour() {
        let run = run_dashboard(&sample_source(), &config(Granularity::Hourly, None)).unwrap();
        assert!(run.records.iter().all(|r| r.key.hour.is_some()));
    }

    #[test]
    fn product_filter_narrows_to_one_series() {
        let run =
            run_dashboard(&sample_source(), &config(Granularity::Weekly, Some("R03"))).unwrap();
        assert_eq!(run.records.len(), run.table.row_count());
        assert!(run.records.iter().all(|r| r.product == "R03"));
        assert_eq!(run.product_totals.len(), 1);
    }

    #[test]
    fn unknown_product_aborts_the_run() {
        let err = run_dashboard(&sample_source(), &config(Granularity::Daily, Some("ZZZZ")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownProduct);
    }

    #[test]
    fn recompute_over_the_same_table_matches_a_fresh_run() {
        let source = sample_source();
        let cfg = config(Granularity::Monthly, None);
        let first = run_dashboard(&source, &cfg).unwrap();
        let second = run_with_table(&cfg, first.table.clone()).unwrap();
        assert_eq!(first.records, second.records);
    }
}
