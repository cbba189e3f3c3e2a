//! Storage layer for Jayloy
//!
//! One JSON array file per collection with atomic writes, plus the audit log
//! that every mutating service call appends to.

pub mod collection;
pub mod file_io;

pub use collection::{Collection, Record};
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::JayloyPaths;
use crate::error::JayloyError;
use crate::models::{BankTransaction, Employee, Expense, Invoice, Product};

/// Main storage coordinator that provides access to all collections
pub struct Storage {
    paths: JayloyPaths,
    pub invoices: Collection<Invoice>,
    pub expenses: Collection<Expense>,
    pub bank_transactions: Collection<BankTransaction>,
    pub employees: Collection<Employee>,
    pub products: Collection<Product>,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: JayloyPaths) -> Result<Self, JayloyError> {
        paths.ensure_directories()?;

        Ok(Self {
            invoices: Collection::new(paths.invoices_file()),
            expenses: Collection::new(paths.expenses_file()),
            bank_transactions: Collection::new(paths.bank_transactions_file()),
            employees: Collection::new(paths.employees_file()),
            products: Collection::new(paths.products_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &JayloyPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all collections from disk
    pub fn load_all(&self) -> Result<(), JayloyError> {
        self.invoices.load()?;
        self.expenses.load()?;
        self.bank_transactions.load()?;
        self.employees.load()?;
        self.products.load()?;
        Ok(())
    }

    /// Save all collections to disk
    pub fn save_all(&self) -> Result<(), JayloyError> {
        self.invoices.save()?;
        self.expenses.save()?;
        self.bank_transactions.save()?;
        self.employees.save()?;
        self.products.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), JayloyError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update; the diff is computed from the serialized snapshots
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), JayloyError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), JayloyError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Add a record, persist its collection and audit the creation
    ///
    /// A failed save takes the record back out of memory.
    pub fn add_record<T: Record>(&self, collection: &Collection<T>, record: T) -> Result<T, JayloyError> {
        let stored = collection.add(record)?;
        if let Err(e) = collection.save() {
            collection.remove(stored.id())?;
            return Err(e);
        }
        self.log_create(
            T::AUDIT_TYPE,
            stored.id().to_string(),
            Some(stored.label()),
            &stored,
        )?;
        Ok(stored)
    }

    /// Replace a record, persist its collection and audit the change
    ///
    /// A failed save puts `before` back in memory.
    pub fn update_record<T: Record>(
        &self,
        collection: &Collection<T>,
        before: &T,
        after: T,
    ) -> Result<T, JayloyError> {
        if !collection.replace(after.clone())? {
            return Err(JayloyError::NotFound {
                entity_type: T::ENTITY,
                identifier: before.id().to_string(),
            });
        }
        if let Err(e) = collection.save() {
            collection.replace(before.clone())?;
            return Err(e);
        }
        self.log_update(
            T::AUDIT_TYPE,
            after.id().to_string(),
            Some(after.label()),
            before,
            &after,
        )?;
        Ok(after)
    }

    /// Remove a record, persist its collection and audit the deletion
    ///
    /// A failed save restores the record at its old position.
    pub fn delete_record<T: Record>(&self, collection: &Collection<T>, id: T::Id) -> Result<T, JayloyError> {
        let (index, removed) = collection.take(id)?.ok_or_else(|| JayloyError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        })?;
        if let Err(e) = collection.save() {
            collection.restore(index, removed)?;
            return Err(e);
        }
        self.log_delete(
            T::AUDIT_TYPE,
            removed.id().to_string(),
            Some(removed.label()),
            &removed,
        )?;
        Ok(removed)
    }

    /// Unreconcile every bank line that `is_linked` selects
    ///
    /// Called when a matched invoice or expense is deleted so no line keeps
    /// a reference to a missing record. Returns the number of lines cleared.
    pub fn release_bank_matches(
        &self,
        is_linked: impl Fn(&BankTransaction) -> bool,
    ) -> Result<usize, JayloyError> {
        let linked: Vec<_> = self
            .bank_transactions
            .get_all()?
            .into_iter()
            .filter(|txn| is_linked(txn))
            .collect();
        for before in &linked {
            let mut txn = before.clone();
            txn.clear_match();
            self.update_record(&self.bank_transactions, before, txn)?;
        }
        Ok(linked.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Money, Product};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JayloyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn paper() -> Product {
        Product::new(
            "Printer paper",
            "PAP-A4",
            Money::from_cents(600),
            Money::from_cents(450),
            10,
            "Office",
        )
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_record_lifecycle_is_persisted_and_audited() {
        let (temp_dir, storage) = create_test_storage();

        let stored = storage.add_record(&storage.products, paper()).unwrap();
        assert!(temp_dir
            .path()
            .join("data")
            .join("jayloy_products.json")
            .exists());

        let mut changed = stored.clone();
        changed.stock = 4;
        storage
            .update_record(&storage.products, &stored, changed)
            .unwrap();
        storage.delete_record(&storage.products, stored.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(
            ops,
            vec![Operation::Create, Operation::Update, Operation::Delete]
        );
        assert_eq!(entries[1].diff_summary.as_deref(), Some("stock: 10 -> 4"));
        assert_eq!(storage.products.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let err = storage
            .delete_record(&storage.products, paper().id)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_failed_save_leaves_memory_unchanged() {
        let (temp_dir, storage) = create_test_storage();
        let first = storage.add_record(&storage.products, paper()).unwrap();
        let second = storage.add_record(&storage.products, paper()).unwrap();

        // A directory where the temp file should go makes every save fail
        fs::create_dir(
            temp_dir
                .path()
                .join("data")
                .join("jayloy_products.json.tmp"),
        )
        .unwrap();

        assert!(storage.add_record(&storage.products, paper()).is_err());
        assert_eq!(storage.products.count().unwrap(), 2);

        let mut changed = first.clone();
        changed.stock = 0;
        assert!(storage
            .update_record(&storage.products, &first, changed)
            .is_err());
        assert_eq!(storage.products.get(first.id).unwrap().unwrap().stock, 10);

        assert!(storage.delete_record(&storage.products, first.id).is_err());
        let ids: Vec<_> = storage
            .products
            .get_all()
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);

        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_release_bank_matches() {
        let (_temp_dir, storage) = create_test_storage();
        let expense = storage
            .add_record(
                &storage.expenses,
                Expense::new(
                    "Shell",
                    Money::from_cents(2000),
                    NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                    "Fuel",
                ),
            )
            .unwrap();
        let mut line = BankTransaction::new(
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            "SHELL 123",
            Money::from_cents(-2000),
        );
        line.reconciled = true;
        line.matched_expense_id = Some(expense.id);
        let line = storage.add_record(&storage.bank_transactions, line).unwrap();
        let other = storage
            .add_record(
                &storage.bank_transactions,
                BankTransaction::new(
                    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                    "Unrelated",
                    Money::from_cents(-100),
                ),
            )
            .unwrap();

        let released = storage
            .release_bank_matches(|txn| txn.matched_expense_id == Some(expense.id))
            .unwrap();

        assert_eq!(released, 1);
        let line = storage.bank_transactions.get(line.id).unwrap().unwrap();
        assert!(!line.reconciled);
        assert!(line.matched_expense_id.is_none());
        assert_eq!(storage.bank_transactions.get(other.id).unwrap().unwrap(), other);
    }

    #[test]
    fn test_reload_sees_saved_records() {
        let (temp_dir, storage) = create_test_storage();
        storage.add_record(&storage.products, paper()).unwrap();

        let reopened =
            Storage::new(JayloyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.products.count().unwrap(), 1);
    }
}
