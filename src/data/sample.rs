//! Offline sample tables mirroring the warehouse schema.
//!
//! The generator exists so the dashboard runs without warehouse
//! credentials (demo mode) and so the pipeline can be exercised in tests
//! with realistic shapes. Output schemas match the warehouse tables per
//! granularity, including the metadata columns the resolver subtracts.

use chrono::{Datelike, Duration, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Cell, Granularity, KNOWN_PRODUCTS, WideTable};
use crate::error::AppError;

/// Settings for one generated table.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { rows: 120, seed: 42 }
    }
}

/// Approximate daily unit sales per product, in `KNOWN_PRODUCTS` order.
/// Loosely calibrated to the public pharmacy sales dataset the warehouse
/// tables were aggregated from.
const DAILY_BASE: [f64; 8] = [4.2, 3.1, 3.5, 28.0, 9.6, 2.4, 5.7, 6.3];

/// Relative noise around the base level.
const NOISE_REL: f64 = 0.25;

pub fn generate_sample(
    granularity: Granularity,
    config: &SampleConfig,
) -> Result<WideTable, AppError> {
    if config.rows == 0 {
        return Err(AppError::config("Sample row count must be > 0."));
    }
    let Some(start) = NaiveDate::from_ymd_opt(2019, 1, 1) else {
        return Err(AppError::data("Invalid sample start date."));
    };

    // Mix the granularity into the seed so each view gets its own draw.
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(granularity as u64));
    let noise = Normal::new(0.0, NOISE_REL)
        .map_err(|e| AppError::data(format!("Noise distribution error: {e}")))?;

    let scale = match granularity {
        Granularity::Hourly => 1.0 / 24.0,
        Granularity::Daily => 1.0,
        Granularity::Weekly => 7.0,
        Granularity::Monthly => 30.0,
    };

    let mut rows = Vec::with_capacity(config.rows);
    for i in 0..config.rows {
        let (date, hour) = step(start, granularity, i as i64)?;
        let mut row = Vec::new();

        match granularity {
            Granularity::Hourly => {
                row.push(Cell::Text(format!("{date} {hour:02}:00:00")));
                row.push(Cell::Number(hour as f64));
            }
            _ => row.push(Cell::Text(date.to_string())),
        }

        for base in DAILY_BASE {
            let level = base * scale * (1.0 + noise.sample(&mut rng));
            row.push(Cell::Number(level.max(0.0)));
        }

        match granularity {
            Granularity::Hourly | Granularity::Daily => {
                row.push(Cell::Number(date.year() as f64));
                row.push(Cell::Number(date.month() as f64));
                row.push(Cell::Text(date.format("%A").to_string()));
            }
            _ => {}
        }

        rows.push(row);
    }

    Ok(WideTable::new(columns_for(granularity), rows))
}

fn columns_for(granularity: Granularity) -> Vec<String> {
    let mut columns = vec!["DATUM".to_string()];
    if granularity == Granularity::Hourly {
        columns.push("HOUR".to_string());
    }
    columns.extend(KNOWN_PRODUCTS.iter().map(|p| p.to_string()));
    if matches!(granularity, Granularity::Hourly | Granularity::Daily) {
        columns.extend(["YEAR", "MONTH", "WEEKDAY_NAME"].map(String::from));
    }
    columns
}

fn step(start: NaiveDate, granularity: Granularity, i: i64) -> Result<(NaiveDate, u32), AppError> {
    let out = match granularity {
        Granularity::Hourly => {
            let date = start.checked_add_signed(Duration::days(i / 24));
            (date, (i % 24) as u32)
        }
        Granularity::Daily => (start.checked_add_signed(Duration::days(i)), 0),
        Granularity::Weekly => (start.checked_add_signed(Duration::weeks(i)), 0),
        Granularity::Monthly => (start.checked_add_months(Months::new(i as u32)), 0),
    };
    match out {
        (Some(date), hour) => Ok((date, hour)),
        (None, _) => Err(AppError::data("Sample date range overflow.")),
    }
}
