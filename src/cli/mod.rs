//! CLI command handlers
//!
//! Bridges the clap argument definitions with the service layer. Handlers
//! print user-facing output and return errors for `main` to report.

pub mod bank;
pub mod expense;
pub mod export;
pub mod history;
pub mod inventory;
pub mod invoice;
pub mod payroll;
pub mod report;

pub use bank::{handle_bank_command, BankCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use history::handle_history_command;
pub use inventory::{handle_inventory_command, InventoryCommands};
pub use invoice::{handle_invoice_command, InvoiceCommands};
pub use payroll::{handle_payroll_command, PayrollCommands};
pub use report::{handle_report_command, ReportCommands};

use chrono::NaiveDate;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{JayloyError, JayloyResult};
use crate::models::Money;

/// Today's date in local time, the reference date for every command
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(input: &str) -> JayloyResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        JayloyError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", input))
    })
}

pub(crate) fn parse_optional_date(input: Option<&str>) -> JayloyResult<Option<NaiveDate>> {
    input.map(parse_date).transpose()
}

/// Parse an amount argument such as `1250`, `1,250.00` or `$12.50`
pub(crate) fn parse_money(input: &str, field: &str) -> JayloyResult<Money> {
    Money::parse(input).map_err(|e| {
        JayloyError::Validation(format!("Invalid {}: '{}'. {}", field, input, e))
    })
}

pub(crate) fn parse_optional_money(input: Option<&str>, field: &str) -> JayloyResult<Option<Money>> {
    input.map(|v| parse_money(v, field)).transpose()
}

/// Open an output file for a CSV or snapshot export
pub(crate) fn create_output(path: &Path) -> JayloyResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        JayloyError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1,250.50", "amount").unwrap().cents(), 125050);
        assert!(parse_money("abc", "amount").is_err());
    }
}
