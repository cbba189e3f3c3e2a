//! Generic repository for one persisted collection
//!
//! A collection is a JSON array stored under a fixed key. Records keep their
//! insertion order, and every mutation is followed by a whole-array rewrite
//! (last write wins, no partial-update concurrency control).

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::audit::EntityType;
use crate::error::JayloyError;
use crate::models::{
    BankTransaction, BankTransactionId, Employee, EmployeeId, Expense, ExpenseId, Invoice,
    InvoiceId, Product, ProductId,
};

use super::file_io::{read_json, write_json_atomic};

/// A record type that can live in a `Collection`
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Display;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    /// Entity type recorded in the audit log
    const AUDIT_TYPE: EntityType;

    fn id(&self) -> Self::Id;

    /// Short label for listings and audit entries
    fn label(&self) -> String;

    /// Whether user input (id prefix, short id, or natural key) selects this record
    fn matches(&self, input: &str) -> bool;

    /// Give the record a fresh id and, where tracked, a creation timestamp
    fn assign_identity(&mut self, now: DateTime<Utc>);
}

impl Record for Invoice {
    type Id = InvoiceId;
    const ENTITY: &'static str = "Invoice";
    const AUDIT_TYPE: EntityType = EntityType::Invoice;

    fn id(&self) -> InvoiceId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {}", self.invoice_number, self.customer_name)
    }

    fn matches(&self, input: &str) -> bool {
        self.id.matches(input) || self.invoice_number.eq_ignore_ascii_case(input.trim())
    }

    fn assign_identity(&mut self, now: DateTime<Utc>) {
        self.id = InvoiceId::new();
        self.created_at = now;
    }
}

impl Record for Expense {
    type Id = ExpenseId;
    const ENTITY: &'static str = "Expense";
    const AUDIT_TYPE: EntityType = EntityType::Expense;

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {}", self.date, self.vendor)
    }

    fn matches(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn assign_identity(&mut self, now: DateTime<Utc>) {
        self.id = ExpenseId::new();
        self.created_at = now;
    }
}

impl Record for BankTransaction {
    type Id = BankTransactionId;
    const ENTITY: &'static str = "Bank transaction";
    const AUDIT_TYPE: EntityType = EntityType::BankTransaction;

    fn id(&self) -> BankTransactionId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {}", self.date, self.description)
    }

    fn matches(&self, input: &str) -> bool {
        self.id.matches(input)
    }

    fn assign_identity(&mut self, _now: DateTime<Utc>) {
        self.id = BankTransactionId::new();
    }
}

impl Record for Employee {
    type Id = EmployeeId;
    const ENTITY: &'static str = "Employee";
    const AUDIT_TYPE: EntityType = EntityType::Employee;

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, input: &str) -> bool {
        self.id.matches(input) || self.name.eq_ignore_ascii_case(input.trim())
    }

    fn assign_identity(&mut self, _now: DateTime<Utc>) {
        self.id = EmployeeId::new();
    }
}

impl Record for Product {
    type Id = ProductId;
    const ENTITY: &'static str = "Product";
    const AUDIT_TYPE: EntityType = EntityType::Product;

    fn id(&self) -> ProductId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.sku)
    }

    fn matches(&self, input: &str) -> bool {
        self.id.matches(input) || self.sku.eq_ignore_ascii_case(input.trim())
    }

    fn assign_identity(&mut self, _now: DateTime<Utc>) {
        self.id = ProductId::new();
    }
}

/// Repository for one collection, backed by a JSON array file
pub struct Collection<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the collection from disk; a missing file is an empty collection
    pub fn load(&self) -> Result<(), JayloyError> {
        let records: Vec<T> = read_json(&self.path)?;
        let mut data = self.write_lock()?;
        *data = records;
        Ok(())
    }

    /// Persist the whole collection
    pub fn save(&self) -> Result<(), JayloyError> {
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Append a record under a freshly assigned identity and return the stored copy
    pub fn add(&self, mut record: T) -> Result<T, JayloyError> {
        record.assign_identity(Utc::now());
        self.insert(record.clone())?;
        Ok(record)
    }

    /// Append a record keeping its current identity
    pub fn insert(&self, record: T) -> Result<(), JayloyError> {
        let mut data = self.write_lock()?;
        data.push(record);
        Ok(())
    }

    /// Replace the record with the same id; returns false when absent
    pub fn replace(&self, record: T) -> Result<bool, JayloyError> {
        let mut data = self.write_lock()?;
        match data.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a record by id, returning it if it existed
    pub fn remove(&self, id: T::Id) -> Result<Option<T>, JayloyError> {
        Ok(self.take(id)?.map(|(_, record)| record))
    }

    /// Remove a record by id along with the position it held
    pub fn take(&self, id: T::Id) -> Result<Option<(usize, T)>, JayloyError> {
        let mut data = self.write_lock()?;
        let position = data.iter().position(|r| r.id() == id);
        Ok(position.map(|idx| (idx, data.remove(idx))))
    }

    /// Put a record back at `index`, or at the end if the collection shrank
    pub fn restore(&self, index: usize, record: T) -> Result<(), JayloyError> {
        let mut data = self.write_lock()?;
        let index = index.min(data.len());
        data.insert(index, record);
        Ok(())
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, JayloyError> {
        let data = self.read_lock()?;
        Ok(data.iter().find(|r| r.id() == id).cloned())
    }

    /// Resolve user input to a single record
    pub fn find(&self, input: &str) -> Result<Option<T>, JayloyError> {
        let data = self.read_lock()?;
        let mut hits = data.iter().filter(|r| r.matches(input));
        match (hits.next(), hits.next()) {
            (Some(record), None) => Ok(Some(record.clone())),
            (Some(_), Some(_)) => Err(JayloyError::Validation(format!(
                "'{}' matches more than one {}",
                input,
                T::ENTITY.to_lowercase()
            ))),
            _ => Ok(None),
        }
    }

    /// All records in insertion order
    pub fn get_all(&self) -> Result<Vec<T>, JayloyError> {
        Ok(self.read_lock()?.clone())
    }

    pub fn count(&self) -> Result<usize, JayloyError> {
        Ok(self.read_lock()?.len())
    }

    /// Swap in a full collection (used by snapshot import)
    pub fn replace_all(&self, records: Vec<T>) -> Result<(), JayloyError> {
        *self.write_lock()? = records;
        Ok(())
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<T>>, JayloyError> {
        self.data
            .read()
            .map_err(|e| JayloyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<T>>, JayloyError> {
        self.data
            .write()
            .map_err(|e| JayloyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_collection() -> (TempDir, Collection<Expense>) {
        let temp_dir = TempDir::new().unwrap();
        let collection = Collection::new(temp_dir.path().join("jayloy_expenses.json"));
        (temp_dir, collection)
    }

    fn expense(vendor: &str, cents: i64) -> Expense {
        Expense::new(
            vendor,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Office",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, collection) = create_test_collection();
        collection.load().unwrap();
        assert_eq!(collection.count().unwrap(), 0);
    }

    #[test]
    fn test_add_assigns_new_identity() {
        let (_temp_dir, collection) = create_test_collection();
        let draft = expense("Shell", 2000);
        let draft_id = draft.id;

        let stored = collection.add(draft).unwrap();

        assert_ne!(stored.id, draft_id);
        assert_eq!(collection.get(stored.id).unwrap().unwrap().vendor, "Shell");
    }

    #[test]
    fn test_insertion_order_preserved_across_save() {
        let (temp_dir, collection) = create_test_collection();
        for (vendor, cents) in [("Zeta", 100), ("Alpha", 200), ("Mid", 300)] {
            collection.add(expense(vendor, cents)).unwrap();
        }
        collection.save().unwrap();

        let reloaded: Collection<Expense> =
            Collection::new(temp_dir.path().join("jayloy_expenses.json"));
        reloaded.load().unwrap();
        let vendors: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.vendor)
            .collect();
        assert_eq!(vendors, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_replace_and_remove() {
        let (_temp_dir, collection) = create_test_collection();
        let mut stored = collection.add(expense("Shell", 2000)).unwrap();

        stored.amount = Money::from_cents(2500);
        assert!(collection.replace(stored.clone()).unwrap());
        assert_eq!(collection.get(stored.id).unwrap().unwrap().amount.cents(), 2500);

        assert!(collection.remove(stored.id).unwrap().is_some());
        assert!(collection.remove(stored.id).unwrap().is_none());
        assert!(!collection.replace(stored).unwrap());
    }

    #[test]
    fn test_take_and_restore_keep_position() {
        let (_temp_dir, collection) = create_test_collection();
        let ids: Vec<_> = [("A", 100), ("B", 200), ("C", 300)]
            .into_iter()
            .map(|(vendor, cents)| collection.add(expense(vendor, cents)).unwrap().id)
            .collect();

        let (index, taken) = collection.take(ids[1]).unwrap().unwrap();
        assert_eq!(index, 1);
        collection.restore(index, taken).unwrap();

        let order: Vec<_> = collection.get_all().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, collection) = create_test_collection();
        let stored = collection.add(expense("Shell", 2000)).unwrap();

        let found = collection.find(&stored.id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert!(collection.find("exp-zzzzzzzz").unwrap().is_none());
    }
}
