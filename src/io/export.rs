//! Export long-form records to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per (time key, product) pair.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::LongRecord;
use crate::error::AppError;

/// Write melted records to a CSV file.
pub fn write_long_csv(path: &Path, records: &[LongRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "DATUM,HOUR,PRODUCT,SALES")
        .map_err(|e| AppError::data(format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let hour = r
            .key
            .hour
            .map(|h| h.to_string())
            .unwrap_or_default();
        writeln!(file, "{},{hour},{},{:.4}", r.key.date, r.product, r.sales)
            .map_err(|e| AppError::data(format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
