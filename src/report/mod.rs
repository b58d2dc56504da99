//! Plain-text reporting for the non-interactive subcommands.
//!
//! Formatting stays in one place so output changes are localized and the
//! reshape code never prints.

use crate::app::pipeline::RunOutput;
use crate::domain::DashConfig;
use crate::reshape::{ProductTotal, YearTotal};

/// Format the run summary (source, dataset shape, selection).
pub fn format_run_summary(run: &RunOutput, config: &DashConfig, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== pdash - pharma sales dashboard ===\n");
    out.push_str(&format!(
        "Granularity: {} (source table {})\n",
        config.granularity.display_name(),
        run.spec.table
    ));
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: {} | Products: {} | Long records: {}\n",
        run.table.row_count(),
        run.value_columns.len(),
        run.records.len()
    ));
    match &config.product {
        Some(p) => out.push_str(&format!("Product filter: {p}\n")),
        None => out.push_str("Product filter: all\n"),
    }
    out
}

/// Format per-product totals as an aligned two-column table.
pub fn format_product_totals(totals: &[ProductTotal]) -> String {
    let mut out = String::new();
    out.push_str("Total sales by product:\n");
    if totals.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    for t in totals {
        out.push_str(&format!("  {:<8} {:>12.2}\n", t.product, t.total));
    }
    out
}

/// Format per-year totals grouped by year.
pub fn format_year_totals(totals: &[YearTotal]) -> String {
    let mut out = String::new();
    out.push_str("Total sales by year:\n");
    if totals.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let mut current_year = None;
    for t in totals {
        if current_year != Some(t.year) {
            out.push_str(&format!("  {}\n", t.year));
            current_year = Some(t.year);
        }
        out.push_str(&format!("    {:<8} {:>12.2}\n", t.product, t.total));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_totals_render_aligned_rows() {
        let totals = vec![
            ProductTotal {
                product: "M01AB".to_string(),
                total: 8.0,
            },
            ProductTotal {
                product: "N02BE".to_string(),
                total: 123.456,
            },
        ];
        let text = format_product_totals(&totals);
        assert!(text.contains("M01AB"));
        assert!(text.contains("8.00"));
        assert!(text.contains("123.46"));
    }

    #[test]
    fn year_totals_group_under_year_headers() {
        let totals = vec![
            YearTotal {
                year: 2019,
                product: "R03".to_string(),
                total: 1.0,
            },
            YearTotal {
                year: 2020,
                product: "R03".to_string(),
                total: 2.0,
            },
        ];
        let text = format_year_totals(&totals);
        let year_2019 = text.find("2019").unwrap();
        let year_2020 = text.find("2020").unwrap();
        assert!(year_2019 < year_2020);
    }

    #[test]
    fn empty_aggregates_say_so() {
        assert!(format_product_totals(&[]).contains("(no data)"));
        assert!(format_year_totals(&[]).contains("(no data)"));
    }
}
