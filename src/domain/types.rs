//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a pipeline run
//! - exported to CSV
//! - bound to chart specs without further conversion

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::table::Cell;
use crate::error::AppError;

/// Time-aggregation level of a sales dataset.
///
/// Each variant maps to one pre-aggregated warehouse table and one set of
/// identifier columns (see `reshape::resolve`). Hourly is the only level
/// whose time key carries an hour component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Hourly,
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }

    /// Cycle forward (for the TUI selector).
    pub fn next(self) -> Granularity {
        match self {
            Granularity::Hourly => Granularity::Daily,
            Granularity::Daily => Granularity::Weekly,
            Granularity::Weekly => Granularity::Monthly,
            Granularity::Monthly => Granularity::Hourly,
        }
    }

    /// Cycle backward (for the TUI selector).
    pub fn prev(self) -> Granularity {
        match self {
            Granularity::Hourly => Granularity::Monthly,
            Granularity::Daily => Granularity::Hourly,
            Granularity::Weekly => Granularity::Daily,
            Granularity::Monthly => Granularity::Weekly,
        }
    }
}

/// ATC product codes carried by the pre-aggregated sales tables.
///
/// The authoritative product set for a run is always the loaded table's
/// value columns; this list seeds the TUI product selector before the
/// first load and drives the offline sample generator.
pub const KNOWN_PRODUCTS: [&str; 8] = [
    "M01AB", "M01AE", "N02BA", "N02BE", "N05B", "N05C", "R03", "R06",
];

/// Which chart the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    /// Sales over time, one line per product (or one line when filtered).
    Series,
    /// Total sales per product across the loaded range.
    ProductTotals,
    /// Total sales per year (for the selected product, or all products).
    YearTotals,
}

impl ChartView {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartView::Series => "time series",
            ChartView::ProductTotals => "product totals",
            ChartView::YearTotals => "year totals",
        }
    }

    pub fn next(self) -> ChartView {
        match self {
            ChartView::Series => ChartView::ProductTotals,
            ChartView::ProductTotals => ChartView::YearTotals,
            ChartView::YearTotals => ChartView::Series,
        }
    }

    pub fn prev(self) -> ChartView {
        match self {
            ChartView::Series => ChartView::YearTotals,
            ChartView::ProductTotals => ChartView::Series,
            ChartView::YearTotals => ChartView::ProductTotals,
        }
    }
}

/// Session settings for one pipeline run.
///
/// Reconstructed per interaction; nothing else survives between runs.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub granularity: Granularity,
    /// `None` means all products.
    pub product: Option<String>,
    pub view: ChartView,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Daily,
            product: None,
            view: ChartView::Series,
        }
    }
}

/// The time key of one wide row: the `DATUM` date plus, for hourly data,
/// the `HOUR` component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeKey {
    pub date: NaiveDate,
    pub hour: Option<u32>,
}

/// Accepted `DATUM` formats: ISO dates and the US-style dates the source
/// tables were originally loaded with.
const DATUM_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

impl TimeKey {
    /// Parse a time key from identifier cells.
    ///
    /// `hour` is `Some` exactly when the hourly table is being reshaped.
    pub fn from_cells(datum: &Cell, hour: Option<&Cell>) -> Result<TimeKey, AppError> {
        let date = parse_datum(datum)?;
        let hour = match hour {
            None => None,
            Some(cell) => Some(parse_hour(cell)?),
        };
        Ok(TimeKey { date, hour })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

impl std::fmt::Display for TimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.hour {
            Some(h) => write!(f, "{} {h:02}h", self.date),
            None => write!(f, "{}", self.date),
        }
    }
}

fn parse_datum(cell: &Cell) -> Result<NaiveDate, AppError> {
    let raw = match cell {
        Cell::Text(s) => s.trim(),
        other => {
            return Err(AppError::data(format!(
                "DATUM cell is not a date string: {other:?}."
            )));
        }
    };

    // Hourly DATUM values carry a time suffix; the date part is enough
    // because HOUR is a separate column.
    let date_part = raw.split_whitespace().next().unwrap_or(raw);
    for fmt in DATUM_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
            return Ok(date);
        }
    }
    Err(AppError::data(format!("Invalid DATUM value '{raw}'.")))
}

fn parse_hour(cell: &Cell) -> Result<u32, AppError> {
    let value = cell
        .as_number()
        .ok_or_else(|| AppError::data(format!("HOUR cell is not numeric: {cell:?}.")))?;
    if !(0.0..24.0).contains(&value) || value.fract() != 0.0 {
        return Err(AppError::data(format!("Invalid HOUR value {value}.")));
    }
    Ok(value as u32)
}

/// One melted observation: a (time key, product, sales) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub key: TimeKey,
    pub product: String,
    pub sales: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_cycles_cover_all_variants() {
        for g in Granularity::ALL {
            assert_eq!(g.next().prev(), g);
            assert_eq!(g.prev().next(), g);
        }
    }

    #[test]
    fn time_key_parses_iso_and_us_dates() {
        let iso = TimeKey::from_cells(&Cell::Text("2020-01-02".to_string()), None).unwrap();
        let us = TimeKey::from_cells(&Cell::Text("1/2/2020".to_string()), None).unwrap();
        assert_eq!(iso, us);
        assert_eq!(iso.year(), 2020);
    }

    #[test]
    fn time_key_takes_date_part_of_timestamps() {
        let key = TimeKey::from_cells(
            &Cell::Text("2019-03-01 08:00:00".to_string()),
            Some(&Cell::Number(8.0)),
        )
        .unwrap();
        assert_eq!(key.date, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
        assert_eq!(key.hour, Some(8));
    }

    #[test]
    fn time_key_rejects_bad_hours() {
        let datum = Cell::Text("2019-03-01".to_string());
        assert!(TimeKey::from_cells(&datum, Some(&Cell::Number(24.0))).is_err());
        assert!(TimeKey::from_cells(&datum, Some(&Cell::Text("morning".to_string()))).is_err());
    }
}
