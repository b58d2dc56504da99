//! Chart bindings: pure mapping from records and aggregates to renderable
//! specs.
//!
//! The renderers (plotters widget, ratatui bar chart) stay data-driven:
//! series, bounds, and labels are computed here, outside any draw call, so
//! the binding logic is testable without a terminal.

use chrono::{Datelike, NaiveDate};

use crate::domain::{Granularity, LongRecord, TimeKey};
use crate::reshape::{ProductTotal, YearTotal};

/// One renderable line series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// Index into the renderer's palette; stable per product position.
    pub color_index: usize,
    pub points: Vec<(f64, f64)>,
}

/// A complete line-chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// A complete bar-chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub bars: Vec<(String, u64)>,
}

/// X encoding for time keys: days from CE, plus a fractional hour for
/// hourly data. Monotone in the time key, so series stay ordered.
pub fn x_value(key: &TimeKey) -> f64 {
    let days = key.date.num_days_from_ce() as f64;
    match key.hour {
        Some(h) => days + h as f64 / 24.0,
        None => days,
    }
}

/// Tick formatter matching `x_value`.
pub fn format_x(value: f64) -> String {
    match NaiveDate::from_num_days_from_ce_opt(value.floor() as i32) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Bind long records to a multi-series time chart, one series per product
/// in first-seen order.
pub fn time_series_spec(records: &[LongRecord], granularity: Granularity) -> ChartSpec {
    let mut series: Vec<Series> = Vec::new();
    for r in records {
        let idx = match series.iter().position(|s| s.name == r.product) {
            Some(idx) => idx,
            None => {
                let color_index = series.len();
                series.push(Series {
                    name: r.product.clone(),
                    color_index,
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[idx].points.push((x_value(&r.key), r.sales));
    }

    let title = match series.as_slice() {
        [only] => format!("{} sales ({})", only.name, granularity.display_name()),
        _ => format!("Sales by product ({})", granularity.display_name()),
    };
    let x_label = match granularity {
        Granularity::Hourly => "date/hour",
        _ => "date",
    };

    ChartSpec {
        title,
        x_label: x_label.to_string(),
        y_label: "units sold".to_string(),
        series,
    }
}

impl ChartSpec {
    /// Padded axis bounds over all series; `None` when there is nothing
    /// finite to plot.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];
        for s in &self.series {
            for &(px, py) in &s.points {
                if !(px.is_finite() && py.is_finite()) {
                    continue;
                }
                x[0] = x[0].min(px);
                x[1] = x[1].max(px);
                y[0] = y[0].min(py);
                y[1] = y[1].max(py);
            }
        }
        if !(x[0].is_finite() && x[1].is_finite()) {
            return None;
        }
        if x[1] <= x[0] {
            x[1] = x[0] + 1.0;
        }
        let pad = ((y[1] - y[0]).abs() * 0.05).max(1e-9);
        Some((x, [(y[0] - pad).min(0.0), y[1] + pad]))
    }
}

/// Bind per-product totals to a bar chart.
pub fn product_totals_spec(totals: &[ProductTotal], granularity: Granularity) -> BarSpec {
    BarSpec {
        title: format!("Total sales by product ({})", granularity.display_name()),
        bars: totals
            .iter()
            .map(|t| (t.product.clone(), t.total.round().max(0.0) as u64))
            .collect(),
    }
}

/// Bind per-year totals to a bar chart.
///
/// With a product selected the bars are that product's yearly totals;
/// otherwise yearly sums across all products.
pub fn year_totals_spec(totals: &[YearTotal], product: Option<&str>) -> BarSpec {
    let mut bars: Vec<(String, u64)> = Vec::new();
    for t in totals {
        if let Some(p) = product {
            if t.product != p {
                continue;
            }
        }
        let label = t.year.to_string();
        match bars.iter_mut().find(|(year, _)| *year == label) {
            Some((_, total)) => *total += t.total.round().max(0.0) as u64,
            None => bars.push((label, t.total.round().max(0.0) as u64)),
        }
    }

    let title = match product {
        Some(p) => format!("{p} sales by year"),
        None => "Sales by year".to_string(),
    };
    BarSpec { title, bars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cell;

    fn record(date: &str, product: &str, sales: f64) -> LongRecord {
        LongRecord {
            key: TimeKey::from_cells(&Cell::Text(date.to_string()), None).unwrap(),
            product: product.to_string(),
            sales,
        }
    }

    #[test]
    fn one_series_per_product_in_first_seen_order() {
        let records = vec![
            record("2020-01-01", "M01AB", 5.0),
            record("2020-01-01", "M01AE", 2.0),
            record("2020-01-02", "M01AB", 3.0),
        ];
        let spec = time_series_spec(&records, Granularity::Daily);
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "M01AB");
        assert_eq!(spec.series[0].points.len(), 2);
        assert_eq!(spec.series[1].name, "M01AE");
        assert_eq!(spec.series[0].color_index, 0);
        assert_eq!(spec.series[1].color_index, 1);
    }

    #[test]
    fn binding_does_not_mutate_records() {
        let records = vec![record("2020-01-01", "R03", 1.0)];
        let before = records.clone();
        let _ = time_series_spec(&records, Granularity::Daily);
        assert_eq!(records, before);
    }

    #[test]
    fn single_product_titles_name_the_product() {
        let records = vec![record("2020-01-01", "R06", 1.0)];
        let spec = time_series_spec(&records, Granularity::Weekly);
        assert_eq!(spec.title, "R06 sales (weekly)");
    }

    #[test]
    fn x_values_are_monotone_within_a_day_of_hours() {
        let early = TimeKey {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hour: Some(3),
        };
        let late = TimeKey {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hour: Some(20),
        };
        assert!(x_value(&early) < x_value(&late));
        assert_eq!(format_x(x_value(&early)), "2020-01-01");
    }

    #[test]
    fn year_bars_sum_across_products_unless_filtered() {
        let totals = vec![
            YearTotal {
                year: 2019,
                product: "M01AB".to_string(),
                total: 10.0,
            },
            YearTotal {
                year: 2019,
                product: "M01AE".to_string(),
                total: 5.0,
            },
        ];
        let all = year_totals_spec(&totals, None);
        assert_eq!(all.bars, vec![("2019".to_string(), 15)]);

        let one = year_totals_spec(&totals, Some("M01AE"));
        assert_eq!(one.bars, vec![("2019".to_string(), 5)]);
    }

    #[test]
    fn empty_spec_has_no_bounds() {
        let spec = time_series_spec(&[], Granularity::Daily);
        assert!(spec.bounds().is_none());
    }
}
