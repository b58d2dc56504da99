//! Single-product projection.

use crate::domain::{LongRecord, TimeKey, WideTable};
use crate::error::AppError;
use crate::reshape::melt::check_id_columns;

/// Project the identifier columns plus one product column, renamed to
/// SALES.
///
/// `product` must be one of the table's value columns; anything else is an
/// `UnknownProduct` error listing the valid names.
pub fn filter_product(
    table: &WideTable,
    product: &str,
    id_columns: &[&str],
    value_columns: &[String],
) -> Result<Vec<LongRecord>, AppError> {
    if !value_columns.iter().any(|c| c == product) {
        return Err(AppError::unknown_product(product, value_columns));
    }
    let ids = check_id_columns(table, id_columns)?;
    let product_idx = table
        .column_index(product)
        .ok_or_else(|| AppError::unknown_product(product, value_columns))?;

    let mut out = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        let key = TimeKey::from_cells(&row[ids.datum], ids.hour.map(|i| &row[i]))?;
        let cell = &row[product_idx];
        let sales = if cell.is_null() {
            0.0
        } else {
            cell.as_number().ok_or_else(|| {
                AppError::data(format!("Non-numeric SALES value in '{product}': {cell:?}."))
            })?
        };
        out.push(LongRecord {
            key,
            product: product.to_string(),
            sales,
        });
    }
    Ok(out)
}
