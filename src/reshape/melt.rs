//! Wide-to-long melt.

use crate::domain::{Cell, LongRecord, TimeKey, WideTable};
use crate::error::AppError;

/// Resolved positions of the identifier columns inside a table.
pub(crate) struct IdColumns {
    pub datum: usize,
    pub hour: Option<usize>,
}

/// Validate that every identifier column exists and locate the ones the
/// time key is built from.
///
/// This runs before any row is touched so a missing column fails the whole
/// reshape up front instead of surfacing mid-transform.
pub(crate) fn check_id_columns(
    table: &WideTable,
    id_columns: &[&str],
) -> Result<IdColumns, AppError> {
    let missing: Vec<String> = id_columns
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::missing_columns(&missing));
    }

    if !id_columns.contains(&"DATUM") {
        return Err(AppError::data(
            "Identifier columns must include DATUM to form a time key.",
        ));
    }

    let datum = match table.column_index("DATUM") {
        Some(idx) => idx,
        None => return Err(AppError::missing_columns(&["DATUM".to_string()])),
    };
    let hour = if id_columns.contains(&"HOUR") {
        table.column_index("HOUR")
    } else {
        None
    };
    Ok(IdColumns { datum, hour })
}

/// Melt a wide table into one record per (time key, product) pair.
///
/// Each output record preserves the row's identifier values, takes the
/// value column's name as PRODUCT and its cell as SALES. Null sales cells
/// count as zero; anything else non-numeric is a data error.
///
/// Postcondition: exactly `rows x value_columns` records, and the per-key
/// SALES sums reproduce the wide row sums.
pub fn melt(
    table: &WideTable,
    id_columns: &[&str],
    value_columns: &[String],
) -> Result<Vec<LongRecord>, AppError> {
    let ids = check_id_columns(table, id_columns)?;

    let mut value_indexes = Vec::with_capacity(value_columns.len());
    for name in value_columns {
        let idx = table
            .column_index(name)
            .ok_or_else(|| AppError::data(format!("Value column '{name}' not in table.")))?;
        value_indexes.push((name.as_str(), idx));
    }

    let mut out = Vec::with_capacity(table.row_count() * value_columns.len());
    for row in table.rows() {
        let key = TimeKey::from_cells(&row[ids.datum], ids.hour.map(|i| &row[i]))?;
        for &(name, idx) in &value_indexes {
            let sales = sales_value(&row[idx], name)?;
            out.push(LongRecord {
                key,
                product: name.to_string(),
                sales,
            });
        }
    }
    Ok(out)
}

fn sales_value(cell: &Cell, column: &str) -> Result<f64, AppError> {
    if cell.is_null() {
        return Ok(0.0);
    }
    cell.as_number()
        .ok_or_else(|| AppError::data(format!("Non-numeric SALES value in '{column}': {cell:?}.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn date_cell(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn two_product_table() -> WideTable {
        WideTable::new(
            vec!["DATUM".to_string(), "M01AB".to_string(), "M01AE".to_string()],
            vec![
                vec![date_cell("2020-01-01"), Cell::Number(5.0), Cell::Number(2.0)],
                vec![date_cell("2020-01-02"), Cell::Number(3.0), Cell::Number(4.0)],
            ],
        )
    }

    fn value_cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn record_count_is_rows_times_value_columns() {
        let table = two_product_table();
        let records = melt(&table, &["DATUM"], &value_cols(&["M01AB", "M01AE"])).unwrap();
        assert_eq!(records.len(), table.row_count() * 2);
    }

    #[test]
    fn melt_is_lossless_per_time_key() {
        let table = two_product_table();
        let records = melt(&table, &["DATUM"], &value_cols(&["M01AB", "M01AE"])).unwrap();

        let mut by_key = std::collections::BTreeMap::new();
        for r in &records {
            *by_key.entry(r.key).or_insert(0.0) += r.sales;
        }
        let sums: Vec<f64> = by_key.into_values().collect();
        assert_eq!(sums, vec![7.0, 7.0]);
    }

    #[test]
    fn end_to_end_scenario_from_two_rows() {
        let table = two_product_table();
        let records = melt(&table, &["DATUM"], &value_cols(&["M01AB", "M01AE"])).unwrap();

        let expected = [
            ("2020-01-01", "M01AB", 5.0),
            ("2020-01-01", "M01AE", 2.0),
            ("2020-01-02", "M01AB", 3.0),
            ("2020-01-02", "M01AE", 4.0),
        ];
        assert_eq!(records.len(), expected.len());
        for (record, (date, product, sales)) in records.iter().zip(expected) {
            assert_eq!(record.key.to_string(), date);
            assert_eq!(record.product, product);
            assert_eq!(record.sales, sales);
        }
    }

    #[test]
    fn missing_identifier_column_fails_up_front() {
        let table = two_product_table();
        let err = melt(&table, &["DATUM", "HOUR"], &value_cols(&["M01AB"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
        assert!(err.to_string().contains("HOUR"));
    }

    #[test]
    fn hourly_keys_carry_the_hour() {
        let table = WideTable::new(
            vec!["DATUM".to_string(), "HOUR".to_string(), "R03".to_string()],
            vec![vec![
                date_cell("2019-06-01"),
                Cell::Number(13.0),
                Cell::Number(1.5),
            ]],
        );
        let records = melt(&table, &["DATUM", "HOUR"], &value_cols(&["R03"])).unwrap();
        assert_eq!(records[0].key.hour, Some(13));
    }

    #[test]
    fn null_sales_count_as_zero_but_garbage_fails() {
        let table = WideTable::new(
            vec!["DATUM".to_string(), "N05B".to_string()],
            vec![vec![date_cell("2020-01-01"), Cell::Null]],
        );
        let records = melt(&table, &["DATUM"], &value_cols(&["N05B"])).unwrap();
        assert_eq!(records[0].sales, 0.0);

        let bad = WideTable::new(
            vec!["DATUM".to_string(), "N05B".to_string()],
            vec![vec![date_cell("2020-01-01"), Cell::Text("oops".to_string())]],
        );
        let err = melt(&bad, &["DATUM"], &value_cols(&["N05B"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn empty_table_melts_to_no_records() {
        let table = WideTable::new(
            vec!["DATUM".to_string(), "M01AB".to_string()],
            Vec::new(),
        );
        let records = melt(&table, &["DATUM"], &value_cols(&["M01AB"])).unwrap();
        assert!(records.is_empty());
    }
}
