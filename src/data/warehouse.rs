//! Warehouse statement-API integration for the pre-aggregated sales tables.
//!
//! The warehouse is an external collaborator reached over its HTTP
//! statement endpoint: one read-only `SELECT * FROM <table>` per
//! granularity, result set in, `WideTable` out. Column names are
//! normalized at this boundary so the core only ever sees canonical names.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Cell, Granularity, WideTable, normalize_column_name};
use crate::error::AppError;
use crate::reshape::resolve;

const STATEMENTS_PATH: &str = "/api/v2/statements";
const STATEMENT_TIMEOUT_SECS: u32 = 60;

/// Connection settings, loaded from `.env`/process environment.
///
/// Treated as opaque: presence is required, values are passed through to
/// the warehouse unvalidated.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub account_url: String,
    pub token: String,
    pub database: String,
    pub schema: String,
    /// Optional compute warehouse to run the statement on.
    pub warehouse: Option<String>,
}

impl WarehouseConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            account_url: require("WAREHOUSE_ACCOUNT_URL")?,
            token: require("WAREHOUSE_TOKEN")?,
            database: require("WAREHOUSE_DATABASE")?,
            schema: require("WAREHOUSE_SCHEMA")?,
            warehouse: std::env::var("WAREHOUSE_NAME").ok(),
        })
    }
}

fn require(key: &str) -> Result<String, AppError> {
    std::env::var(key)
        .map_err(|_| AppError::config(format!("Missing {key} in environment (.env).")))
}

pub struct WarehouseClient {
    client: Client,
    config: WarehouseConfig,
}

impl WarehouseClient {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            client: Client::new(),
            config: WarehouseConfig::from_env()?,
        })
    }

    /// Load the wide sales table for one granularity.
    pub fn load_sales(&self, granularity: Granularity) -> Result<WideTable, AppError> {
        let spec = resolve(granularity);
        let table = self.query(&format!("SELECT * FROM {}", spec.table))?;
        tracing::info!(
            table = spec.table,
            rows = table.row_count(),
            "loaded sales table"
        );
        Ok(table)
    }

    /// Run one read-only statement and convert its result set.
    pub fn query(&self, statement: &str) -> Result<WideTable, AppError> {
        tracing::debug!(statement, "executing warehouse statement");

        let url = format!(
            "{}{STATEMENTS_PATH}",
            self.config.account_url.trim_end_matches('/')
        );
        let mut body = json!({
            "statement": statement,
            "timeout": STATEMENT_TIMEOUT_SECS,
            "database": self.config.database,
            "schema": self.config.schema,
        });
        if let Some(wh) = &self.config.warehouse {
            body["warehouse"] = json!(wh);
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .map_err(|e| AppError::connection(format!("Warehouse request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::connection(format!(
                "Warehouse request failed with status {}.",
                resp.status()
            )));
        }

        let body: StatementResponse = resp
            .json()
            .map_err(|e| AppError::connection(format!("Failed to parse warehouse response: {e}")))?;

        table_from_response(body)
    }
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    #[serde(rename = "resultSetMetaData")]
    metadata: ResultSetMetaData,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct ResultSetMetaData {
    #[serde(rename = "rowType")]
    row_type: Vec<ColumnType>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

fn table_from_response(body: StatementResponse) -> Result<WideTable, AppError> {
    let columns: Vec<String> = body
        .metadata
        .row_type
        .iter()
        .map(|c| normalize_column_name(&c.name))
        .collect();
    if columns.is_empty() {
        return Err(AppError::connection(
            "Warehouse returned a result set with no columns.",
        ));
    }

    let mut rows = Vec::with_capacity(body.data.len());
    for (idx, raw) in body.data.into_iter().enumerate() {
        if raw.len() != columns.len() {
            return Err(AppError::data(format!(
                "Row {idx} has {} values for {} columns.",
                raw.len(),
                columns.len()
            )));
        }
        rows.push(raw.into_iter().map(cell_from_raw).collect());
    }
    Ok(WideTable::new(columns, rows))
}

fn cell_from_raw(raw: Option<String>) -> Cell {
    match raw {
        None => Cell::Null,
        Some(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(s),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_set_converts_with_normalized_columns() {
        let raw = r#"{
            "resultSetMetaData": {
                "rowType": [
                    {"name": "datum"},
                    {"name": "M01AB"},
                    {"name": "Weekday Name"}
                ]
            },
            "data": [
                ["2020-01-01", "5.0", "Wednesday"],
                ["2020-01-02", null, "Thursday"]
            ]
        }"#;
        let body: StatementResponse = serde_json::from_str(raw).unwrap();
        let table = table_from_response(body).unwrap();

        assert_eq!(table.columns(), ["DATUM", "M01AB", "WEEKDAY_NAME"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][1], Cell::Number(5.0));
        assert_eq!(table.rows()[1][1], Cell::Null);
        assert_eq!(
            table.rows()[0][2],
            Cell::Text("Wednesday".to_string())
        );
    }

    #[test]
    fn empty_column_set_is_a_connection_failure() {
        let raw = r#"{"resultSetMetaData": {"rowType": []}, "data": []}"#;
        let body: StatementResponse = serde_json::from_str(raw).unwrap();
        let err = table_from_response(body).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Connection);
    }

    #[test]
    fn ragged_rows_are_a_data_error() {
        let raw = r#"{
            "resultSetMetaData": {"rowType": [{"name": "DATUM"}, {"name": "R03"}]},
            "data": [["2020-01-01"]]
        }"#;
        let body: StatementResponse = serde_json::from_str(raw).unwrap();
        let err = table_from_response(body).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Data);
    }
}
