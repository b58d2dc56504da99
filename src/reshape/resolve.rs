//! Granularity resolution: which table to load and which columns are time
//! keys versus product series.

use crate::domain::{Granularity, WideTable};

const TABLE_HOURLY: &str = "TABLE_SALES_HOURLY";
const TABLE_DAILY: &str = "TABLE_SALES_DAILY";
const TABLE_WEEKLY: &str = "TABLE_SALES_WEEKLY";
const TABLE_MONTHLY: &str = "TABLE_SALES_MONTHLY";

const ID_WITH_HOUR: &[&str] = &["DATUM", "HOUR"];
const ID_DATE_ONLY: &[&str] = &["DATUM"];

// Metadata columns are excluded from the value-column set by explicit
// enumeration, not by runtime guessing: a new column in the source schema
// becomes a product series only if it is absent from these lists.
const META_HOURLY: &[&str] = &["YEAR", "MONTH", "WEEKDAY_NAME"];
const META_DATE_ONLY: &[&str] = &["YEAR", "MONTH", "HOUR", "WEEKDAY_NAME"];

/// Resolver output for one granularity: the source table plus the column
/// roles used by the reshape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub granularity: Granularity,
    /// Source table identifier inside the configured database/schema.
    pub table: &'static str,
    /// Ordered time-key columns, preserved (not melted) during reshaping.
    pub id_columns: &'static [&'static str],
    /// Non-identifier metadata columns excluded from the value set.
    pub metadata_columns: &'static [&'static str],
}

/// Map a granularity to its dataset. Deterministic and infallible: the
/// four variants are the whole input space.
pub fn resolve(granularity: Granularity) -> DatasetSpec {
    let (table, id_columns, metadata_columns) = match granularity {
        Granularity::Hourly => (TABLE_HOURLY, ID_WITH_HOUR, META_HOURLY),
        Granularity::Daily => (TABLE_DAILY, ID_DATE_ONLY, META_DATE_ONLY),
        Granularity::Weekly => (TABLE_WEEKLY, ID_DATE_ONLY, META_DATE_ONLY),
        Granularity::Monthly => (TABLE_MONTHLY, ID_DATE_ONLY, META_DATE_ONLY),
    };
    DatasetSpec {
        granularity,
        table,
        id_columns,
        metadata_columns,
    }
}

impl DatasetSpec {
    /// The product series of a loaded table: every column that is neither
    /// an identifier nor enumerated metadata, in table order.
    pub fn value_columns(&self, table: &WideTable) -> Vec<String> {
        table
            .columns()
            .iter()
            .filter(|c| {
                !self.id_columns.contains(&c.as_str())
                    && !self.metadata_columns.contains(&c.as_str())
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cell;

    fn table(columns: &[&str]) -> WideTable {
        WideTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![vec![Cell::Null; columns.len()]],
        )
    }

    #[test]
    fn resolution_is_deterministic() {
        for g in Granularity::ALL {
            assert_eq!(resolve(g), resolve(g));
        }
    }

    #[test]
    fn only_hourly_keys_on_hour() {
        assert_eq!(resolve(Granularity::Hourly).id_columns, ["DATUM", "HOUR"]);
        for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            assert_eq!(resolve(g).id_columns, ["DATUM"]);
        }
    }

    #[test]
    fn tables_are_distinct_per_granularity() {
        let tables: Vec<&str> = Granularity::ALL.iter().map(|g| resolve(*g).table).collect();
        for (i, a) in tables.iter().enumerate() {
            for b in &tables[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn value_columns_subtract_ids_and_metadata() {
        let spec = resolve(Granularity::Daily);
        let t = table(&[
            "DATUM",
            "M01AB",
            "M01AE",
            "YEAR",
            "MONTH",
            "WEEKDAY_NAME",
        ]);
        assert_eq!(spec.value_columns(&t), vec!["M01AB", "M01AE"]);
    }

    #[test]
    fn hourly_value_columns_exclude_the_hour_key() {
        let spec = resolve(Granularity::Hourly);
        let t = table(&["DATUM", "HOUR", "N02BA", "YEAR", "MONTH", "WEEKDAY_NAME"]);
        assert_eq!(spec.value_columns(&t), vec!["N02BA"]);
    }
}
