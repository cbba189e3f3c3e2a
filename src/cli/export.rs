//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats and restoring
//! from a full snapshot.

use clap::{Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::create_output;
use crate::error::{JayloyError, JayloyResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (full database)
    Json,
    /// YAML format (full database, human-readable)
    Yaml,
}

/// Collections that can be exported record-by-record
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollectionKind {
    Invoices,
    Expenses,
    BankTransactions,
    Employees,
    Products,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export invoices to CSV
    Invoices {
        /// Output file path
        output: PathBuf,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },

    /// Export every field of one collection to CSV
    Records {
        /// Collection to export
        #[arg(value_enum)]
        collection: CollectionKind,

        /// Output file path
        output: PathBuf,
    },

    /// Replace all data with a JSON or YAML export
    Restore {
        /// Export file (.json, .yaml or .yml)
        input: PathBuf,

        /// Confirm replacing the current data
        #[arg(long)]
        yes: bool,
    },

    /// Show export information without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> JayloyResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            finish(&mut writer)?;
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Invoices { output } => {
            let mut writer = create_output(&output)?;
            csv::export_invoices_csv(storage, &mut writer)?;
            finish(&mut writer)?;
            println!(
                "Exported {} invoices to: {}",
                storage.invoices.count()?,
                output.display()
            );
        }

        ExportCommands::Expenses { output } => {
            let mut writer = create_output(&output)?;
            csv::export_expenses_csv(storage, &mut writer)?;
            finish(&mut writer)?;
            println!(
                "Exported {} expenses to: {}",
                storage.expenses.count()?,
                output.display()
            );
        }

        ExportCommands::Records { collection, output } => {
            let mut writer = create_output(&output)?;
            let count = match collection {
                CollectionKind::Invoices => write_records(&storage.invoices.get_all()?, &mut writer)?,
                CollectionKind::Expenses => write_records(&storage.expenses.get_all()?, &mut writer)?,
                CollectionKind::BankTransactions => {
                    write_records(&storage.bank_transactions.get_all()?, &mut writer)?
                }
                CollectionKind::Employees => {
                    write_records(&storage.employees.get_all()?, &mut writer)?
                }
                CollectionKind::Products => write_records(&storage.products.get_all()?, &mut writer)?,
            };
            finish(&mut writer)?;
            println!("Exported {} records to: {}", count, output.display());
        }

        ExportCommands::Restore { input, yes } => handle_restore(storage, &input, yes)?,

        ExportCommands::Info => handle_export_info(storage)?,
    }

    Ok(())
}

fn write_records<T: serde::Serialize, W: Write>(records: &[T], writer: &mut W) -> JayloyResult<usize> {
    csv::export_records_csv(records, writer)?;
    Ok(records.len())
}

fn finish<W: Write>(writer: &mut W) -> JayloyResult<()> {
    writer
        .flush()
        .map_err(|e| JayloyError::Export(e.to_string()))
}

fn handle_restore(storage: &Storage, input: &Path, confirmed: bool) -> JayloyResult<()> {
    let content = fs::read_to_string(input).map_err(|e| {
        JayloyError::Import(format!("Failed to read {}: {}", input.display(), e))
    })?;

    let is_yaml = matches!(
        input.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let export = if is_yaml {
        yaml::import_from_yaml(&content)?
    } else {
        json::import_from_json(&content)?
    };

    let counts = format!(
        "{} invoices, {} expenses, {} bank lines, {} employees, {} products",
        export.invoices.len(),
        export.expenses.len(),
        export.bank_transactions.len(),
        export.employees.len(),
        export.products.len()
    );

    if !confirmed {
        println!("Export contains {}.", counts);
        println!("Re-run with --yes to replace the current data.");
        return Ok(());
    }

    export.restore(storage)?;
    println!("Restored {}", counts);
    Ok(())
}

/// Show export information
fn handle_export_info(storage: &Storage) -> JayloyResult<()> {
    let export = json::FullExport::from_storage(storage)?;

    println!("Export Information");
    println!("==================\n");

    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Invoices:           {}", export.metadata.invoice_count);
    println!("  Expenses:           {}", export.metadata.expense_count);
    println!("  Bank transactions:  {}", export.metadata.bank_transaction_count);
    println!("  Employees:          {}", export.metadata.employee_count);
    println!("  Products:           {}", export.metadata.product_count);

    if let (Some(earliest), Some(latest)) = (
        &export.metadata.earliest_record,
        &export.metadata.latest_record,
    ) {
        println!("\nRecord Date Range: {} to {}", earliest, latest);
    }

    println!("\nExamples:");
    println!("  jayloy export all backup.json --pretty");
    println!("  jayloy export invoices invoices.csv");
    println!("  jayloy export records products products.csv");

    Ok(())
}
