//! JSON Export functionality
//!
//! Exports every collection to a single versioned JSON document and restores
//! a store from one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::models::{BankTransaction, Employee, Expense, Invoice, Product};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub bank_transactions: Vec<BankTransaction>,
    pub employees: Vec<Employee>,
    pub products: Vec<Product>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub invoice_count: usize,
    pub expense_count: usize,
    pub bank_transaction_count: usize,
    pub employee_count: usize,
    pub product_count: usize,

    /// Earliest invoice or expense date
    pub earliest_record: Option<String>,

    /// Latest invoice or expense date
    pub latest_record: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> JayloyResult<Self> {
        let invoices = storage.invoices.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let bank_transactions = storage.bank_transactions.get_all()?;
        let employees = storage.employees.get_all()?;
        let products = storage.products.get_all()?;

        let dates = || {
            invoices
                .iter()
                .map(|i| i.issue_date)
                .chain(expenses.iter().map(|e| e.date))
        };

        let metadata = ExportMetadata {
            invoice_count: invoices.len(),
            expense_count: expenses.len(),
            bank_transaction_count: bank_transactions.len(),
            employee_count: employees.len(),
            product_count: products.len(),
            earliest_record: dates().min().map(|d| d.to_string()),
            latest_record: dates().max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            invoices,
            expenses,
            bank_transactions,
            employees,
            products,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let invoice_ids: HashSet<_> = self.invoices.iter().map(|i| i.id).collect();
        let expense_ids: HashSet<_> = self.expenses.iter().map(|e| e.id).collect();

        // Reconciliation links must point at records in the same export
        for txn in &self.bank_transactions {
            if let Some(invoice_id) = txn.matched_invoice_id {
                if !invoice_ids.contains(&invoice_id) {
                    return Err(format!(
                        "Bank transaction {} references unknown invoice {}",
                        txn.id, invoice_id
                    ));
                }
            }
            if let Some(expense_id) = txn.matched_expense_id {
                if !expense_ids.contains(&expense_id) {
                    return Err(format!(
                        "Bank transaction {} references unknown expense {}",
                        txn.id, expense_id
                    ));
                }
            }
        }

        Ok(())
    }

    /// Replace every collection in storage with the exported records
    pub fn restore(self, storage: &Storage) -> JayloyResult<()> {
        storage.invoices.replace_all(self.invoices)?;
        storage.expenses.replace_all(self.expenses)?;
        storage.bank_transactions.replace_all(self.bank_transactions)?;
        storage.employees.replace_all(self.employees)?;
        storage.products.replace_all(self.products)?;
        storage.save_all()
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> JayloyResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| JayloyError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> JayloyResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| JayloyError::Import(e.to_string()))?;

    export.validate().map_err(JayloyError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::JayloyPaths;
    use crate::config::Settings;
    use crate::models::{ExpenseId, InvoiceItem, Money};
    use crate::services::{BankService, ExpenseService, InvoiceService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JayloyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .add_record(&storage.expenses, Expense::new("Shell", Money::from_cents(900), date(3), "Fuel"))
            .unwrap();
        storage
            .add_record(&storage.expenses, Expense::new("Cafe", Money::from_cents(400), date(20), "Meals"))
            .unwrap();

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.expense_count, 2);
        assert_eq!(export.metadata.earliest_record.as_deref(), Some("2025-02-03"));
        assert_eq!(export.metadata.latest_record.as_deref(), Some("2025-02-20"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_restores_storage() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .add_record(&storage.expenses, Expense::new("Shell", Money::from_cents(900), date(3), "Fuel"))
            .unwrap();

        let mut json_output = Vec::new();
        export_full_json(&storage, &mut json_output, true).unwrap();
        let imported = import_from_json(&String::from_utf8(json_output).unwrap()).unwrap();

        let (_other_dir, target) = create_test_storage();
        imported.restore(&target).unwrap();

        let reloaded = target.expenses.get_all().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].vendor, "Shell");
    }

    #[test]
    fn test_dangling_match_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let mut txn = BankTransaction::new(date(5), "Card payment", Money::from_cents(-900));
        txn.reconciled = true;
        txn.matched_expense_id = Some(ExpenseId::new());
        storage.add_record(&storage.bank_transactions, txn).unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        assert!(export.validate().unwrap_err().contains("unknown expense"));
    }

    #[test]
    fn test_export_after_deleting_matched_records_restores() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let bank = BankService::new(&storage, &settings);

        let expense = ExpenseService::new(&storage)
            .create(Expense::new("Shell", Money::from_cents(900), date(3), "Fuel"))
            .unwrap();
        let debit = bank
            .add(BankTransaction::new(date(4), "SHELL 042", Money::from_cents(-900)))
            .unwrap();
        bank.match_expense(debit.id, expense.id).unwrap();

        let invoices = InvoiceService::new(&storage, &settings);
        let invoice = invoices
            .create(Invoice::new(
                "INV-7",
                "Mekong Traders",
                date(1),
                date(28),
                vec![InvoiceItem::new("Design", 1.0, Money::from_cents(10000))],
                0.0,
            ))
            .unwrap();
        let credit = bank
            .add(BankTransaction::new(date(10), "MEKONG TRADERS", invoice.total))
            .unwrap();
        bank.match_invoice(credit.id, invoice.id).unwrap();

        ExpenseService::new(&storage).delete(expense.id).unwrap();
        invoices.delete(invoice.id).unwrap();

        let mut json_output = Vec::new();
        export_full_json(&storage, &mut json_output, false).unwrap();
        let imported = import_from_json(&String::from_utf8(json_output).unwrap()).unwrap();

        assert_eq!(imported.bank_transactions.len(), 2);
        assert!(imported.bank_transactions.iter().all(|t| !t.reconciled
            && t.matched_expense_id.is_none()
            && t.matched_invoice_id.is_none()));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();

        let json = serde_json::to_string(&export).unwrap();
        assert!(matches!(import_from_json(&json), Err(JayloyError::Import(_))));
    }
}
