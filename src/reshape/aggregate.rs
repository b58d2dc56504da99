//! Grouping-sum aggregates over long-form records.

use std::collections::BTreeMap;

use crate::domain::LongRecord;

/// Total sales for one product across the loaded range.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTotal {
    pub product: String,
    pub total: f64,
}

/// Total sales for one (year, product) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub product: String,
    pub total: f64,
}

/// Sum sales per product. Ties in the grouping key are merged; output is
/// sorted by product code (callers may re-sort for presentation).
pub fn aggregate_by_product(records: &[LongRecord]) -> Vec<ProductTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.product.as_str()).or_insert(0.0) += r.sales;
    }
    totals
        .into_iter()
        .map(|(product, total)| ProductTotal {
            product: product.to_string(),
            total,
        })
        .collect()
}

/// Sum sales per (year, product), the year taken from the time key's date.
pub fn aggregate_by_year(records: &[LongRecord]) -> Vec<YearTotal> {
    let mut totals: BTreeMap<(i32, &str), f64> = BTreeMap::new();
    for r in records {
        *totals.entry((r.key.year(), r.product.as_str())).or_insert(0.0) += r.sales;
    }
    totals
        .into_iter()
        .map(|((year, product), total)| YearTotal {
            year,
            product: product.to_string(),
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, TimeKey};

    fn record(date: &str, product: &str, sales: f64) -> LongRecord {
        LongRecord {
            key: TimeKey::from_cells(&Cell::Text(date.to_string()), None).unwrap(),
            product: product.to_string(),
            sales,
        }
    }

    #[test]
    fn product_ties_are_merged() {
        let records = vec![
            record("2020-01-01", "M01AB", 5.0),
            record("2020-01-02", "M01AB", 3.0),
        ];
        let totals = aggregate_by_product(&records);
        assert_eq!(
            totals,
            vec![ProductTotal {
                product: "M01AB".to_string(),
                total: 8.0
            }]
        );
    }

    #[test]
    fn end_to_end_scenario_totals() {
        let records = vec![
            record("2020-01-01", "M01AB", 5.0),
            record("2020-01-01", "M01AE", 2.0),
            record("2020-01-02", "M01AB", 3.0),
            record("2020-01-02", "M01AE", 4.0),
        ];
        let totals = aggregate_by_product(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].product, "M01AB");
        assert_eq!(totals[0].total, 8.0);
        assert_eq!(totals[1].product, "M01AE");
        assert_eq!(totals[1].total, 6.0);
    }

    #[test]
    fn year_totals_split_on_the_date_year() {
        let records = vec![
            record("2019-12-31", "R03", 1.0),
            record("2020-01-01", "R03", 2.0),
            record("2020-06-01", "R03", 3.0),
        ];
        let totals = aggregate_by_year(&records);
        assert_eq!(
            totals,
            vec![
                YearTotal {
                    year: 2019,
                    product: "R03".to_string(),
                    total: 1.0
                },
                YearTotal {
                    year: 2020,
                    product: "R03".to_string(),
                    total: 5.0
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_by_product(&[]).is_empty());
        assert!(aggregate_by_year(&[]).is_empty());
    }
}
