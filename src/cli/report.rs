//! CLI commands for reports
//!
//! Every report prints to the terminal by default or writes CSV with
//! `--output`.

use clap::Subcommand;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{create_output, parse_optional_date, today};
use crate::config::Settings;
use crate::error::{JayloyError, JayloyResult};
use crate::reports::{
    BalanceSheet, FinanceMetrics, InventoryReport, MetricsWindow, PayrollReport, ReportPeriod,
    VatSummary, MAX_MONTHS,
};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Revenue, expenses, profit and the trailing monthly series
    #[command(alias = "pnl")]
    Summary {
        /// Months in the monthly series (default: from settings)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MONTHS)))]
        months: Option<u32>,

        /// Window start (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// Window end (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Print the metrics as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Output VAT, input VAT and the amount due
    Vat {
        /// current-month, last-month, last-3-months or ytd
        #[arg(short, long, default_value = "current-month")]
        period: String,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Assets, liabilities and equity
    #[command(alias = "balance")]
    BalanceSheet {
        /// current-month, last-month, last-3-months or ytd
        #[arg(short, long, default_value = "current-month")]
        period: String,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stock value, reorder alerts and top products
    Inventory {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Payroll sheet for active employees
    Payroll {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> JayloyResult<()> {
    match cmd {
        ReportCommands::Summary {
            months,
            start,
            end,
            json,
            output,
        } => {
            let window = MetricsWindow {
                months: months.unwrap_or(settings.report_months),
                start: parse_optional_date(start.as_deref())?,
                end: parse_optional_date(end.as_deref())?,
            };
            let report = FinanceMetrics::generate(storage, &window, today())?;
            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .map_err(|e| JayloyError::Export(e.to_string()))?;
                println!("{}", rendered);
                return Ok(());
            }
            emit(output.as_deref(), "Financial summary", &report.format_terminal(), |w| {
                report.export_csv(w)
            })
        }

        ReportCommands::Vat { period, output } => {
            let range = parse_period(&period)?.range(today());
            let report = VatSummary::generate(storage, range, settings.vat_rate_percent)?;
            emit(output.as_deref(), "VAT summary", &report.format_terminal(), |w| {
                report.export_csv(w)
            })
        }

        ReportCommands::BalanceSheet { period, output } => {
            let range = parse_period(&period)?.range(today());
            let report = BalanceSheet::generate(storage, range)?;
            emit(output.as_deref(), "Balance sheet", &report.format_terminal(), |w| {
                report.export_csv(w)
            })
        }

        ReportCommands::Inventory { output } => {
            let report = InventoryReport::generate(storage)?;
            emit(output.as_deref(), "Inventory report", &report.format_terminal(), |w| {
                report.export_csv(w)
            })
        }

        ReportCommands::Payroll { output } => {
            let report = PayrollReport::generate(storage)?;
            emit(output.as_deref(), "Payroll report", &report.format_terminal(), |w| {
                report.export_csv(w)
            })
        }
    }
}

fn parse_period(input: &str) -> JayloyResult<ReportPeriod> {
    ReportPeriod::parse(input).map_err(|e| {
        JayloyError::Validation(format!(
            "{}. Use current-month, last-month, last-3-months or ytd",
            e
        ))
    })
}

/// Print the terminal rendering, or write CSV when an output path is given
fn emit<F>(output: Option<&Path>, title: &str, terminal: &str, export: F) -> JayloyResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> JayloyResult<()>,
{
    match output {
        Some(path) => {
            let mut writer = create_output(path)?;
            export(&mut writer)?;
            writer
                .flush()
                .map_err(|e| JayloyError::Export(e.to_string()))?;
            println!("{} exported to: {}", title, path.display());
        }
        None => println!("{}", terminal),
    }
    Ok(())
}
