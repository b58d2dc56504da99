//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the reshaping code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Granularity;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pdash", version, about = "Pharma sales dashboard (warehouse-backed)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load one granularity, print the run summary and aggregate tables.
    Show(ShowArgs),
    /// Print per-product totals only (useful for scripting).
    Totals(ShowArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying pipeline as `pdash show`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ShowArgs),
}

/// Common options for all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Time granularity of the sales dataset.
    #[arg(short = 'g', long, value_enum, default_value_t = Granularity::Daily)]
    pub granularity: Granularity,

    /// Single product code to filter on (e.g. M01AB). Default: all products.
    #[arg(short = 'p', long)]
    pub product: Option<String>,

    /// Use generated sample data instead of the warehouse.
    #[arg(long)]
    pub offline: bool,

    /// Number of sample rows per table (offline mode).
    #[arg(long, default_value_t = 120)]
    pub sample_rows: usize,

    /// Random seed for sample generation (offline mode).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export the long-form records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
