//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - picks the data source (warehouse or offline sample)
//! - runs the pipeline and prints reports
//! - writes optional exports
//! - hands off to the TUI

use clap::Parser;

use crate::cli::{Cli, Command, ShowArgs};
use crate::data::{DataSource, SampleConfig, WarehouseClient};
use crate::domain::{ChartView, DashConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pdash` and `pdash -g weekly` to behave like `pdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the dashboard one keystroke away.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => {
            init_tracing();
            handle_show(args, OutputMode::Full)
        }
        Command::Totals(args) => {
            init_tracing();
            handle_show(args, OutputMode::TotalsOnly)
        }
        // No tracing init here: the TUI owns the terminal and reports
        // through its status line instead.
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    TotalsOnly,
}

fn handle_show(args: ShowArgs, mode: OutputMode) -> Result<(), AppError> {
    let source = source_from_args(&args)?;
    let config = dash_config_from_args(&args);
    let run = pipeline::run_dashboard(&source, &config)?;

    match mode {
        OutputMode::Full => {
            print!(
                "{}",
                crate::report::format_run_summary(&run, &config, source.label())
            );
            println!();
            print!("{}", crate::report::format_product_totals(&run.product_totals));
            println!();
            print!("{}", crate::report::format_year_totals(&run.year_totals));
        }
        OutputMode::TotalsOnly => {
            print!("{}", crate::report::format_product_totals(&run.product_totals));
        }
    }

    if let Some(path) = &args.export {
        crate::io::write_long_csv(path, &run.records)?;
        println!("Exported {} records to {}.", run.records.len(), path.display());
    }

    Ok(())
}

/// Build the data source the user asked for.
pub fn source_from_args(args: &ShowArgs) -> Result<DataSource, AppError> {
    if args.offline {
        Ok(DataSource::Sample(SampleConfig {
            rows: args.sample_rows,
            seed: args.seed,
        }))
    } else {
        Ok(DataSource::Warehouse(WarehouseClient::from_env()?))
    }
}

pub fn dash_config_from_args(args: &ShowArgs) -> DashConfig {
    DashConfig {
        granularity: args.granularity,
        product: args.product.clone(),
        view: ChartView::Series,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Rewrite argv so `pdash` defaults to `pdash tui`.
///
/// Rules:
/// - `pdash`                      -> `pdash tui`
/// - `pdash -g weekly ...`        -> `pdash tui -g weekly ...`
/// - `pdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "totals" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
