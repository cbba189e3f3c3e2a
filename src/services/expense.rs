//! Expense service
//!
//! Manual expense entry plus saving receipts decoded from the parsing
//! endpoint. Income records share the collection and are told apart by kind.

use chrono::NaiveDate;

use crate::error::{JayloyError, JayloyResult};
use crate::models::{Expense, ExpenseId, ExpenseKind, ExpensePatch};
use crate::receipt;
use crate::storage::Storage;

/// Listing filter; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the vendor or description
    pub search: Option<String>,
    pub category: Option<String>,
    pub kind: Option<ExpenseKind>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                expense.vendor.to_lowercase().contains(&term)
                    || expense.description.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |c| &expense.category == c);
        let matches_kind = self.kind.map_or(true, |k| expense.kind == k);
        matches_search && matches_category && matches_kind
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, mut expense: Expense) -> JayloyResult<Expense> {
        expense.vendor = expense.vendor.trim().to_string();
        expense.category = expense.category.trim().to_string();
        expense.validate().map_err(JayloyError::Validation)?;

        self.storage.add_record(&self.storage.expenses, expense)
    }

    pub fn get(&self, id: ExpenseId) -> JayloyResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    pub fn find(&self, identifier: &str) -> JayloyResult<Option<Expense>> {
        self.storage.expenses.find(identifier)
    }

    /// Matching records, oldest first (ties keep insertion order)
    pub fn list(&self, filter: &ExpenseFilter) -> JayloyResult<Vec<Expense>> {
        let mut expenses: Vec<_> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        expenses.sort_by_key(|e| e.date);
        Ok(expenses)
    }

    /// Distinct category labels in first-seen order
    pub fn categories(&self) -> JayloyResult<Vec<String>> {
        let mut seen: Vec<String> = Vec::new();
        for expense in self.storage.expenses.get_all()? {
            if !seen.contains(&expense.category) {
                seen.push(expense.category);
            }
        }
        Ok(seen)
    }

    pub fn update(&self, id: ExpenseId, patch: ExpensePatch) -> JayloyResult<Expense> {
        let before = self
            .get(id)?
            .ok_or_else(|| JayloyError::expense_not_found(id.to_string()))?;

        let mut expense = before.clone();
        patch.apply(&mut expense);
        expense.validate().map_err(JayloyError::Validation)?;

        self.storage
            .update_record(&self.storage.expenses, &before, expense)
    }

    /// Delete an expense and unreconcile any bank line matched to it
    pub fn delete(&self, id: ExpenseId) -> JayloyResult<Expense> {
        let removed = self.storage.delete_record(&self.storage.expenses, id)?;
        self.storage
            .release_bank_matches(|txn| txn.matched_expense_id == Some(id))?;
        Ok(removed)
    }

    /// Decode endpoint responses and save each receipt that decodes cleanly
    ///
    /// Results line up with the input; a failed receipt is reported in its
    /// slot and does not stop the others from being saved.
    pub fn import_receipts<I, S>(&self, bodies: I, today: NaiveDate) -> Vec<JayloyResult<Expense>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        receipt::decode_batch(bodies)
            .into_iter()
            .map(|decoded| {
                let draft = decoded?.to_expense_draft(today)?;
                self.create(draft)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::JayloyPaths;
    use crate::models::Money;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JayloyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_list_sorted_by_date() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        service
            .create(Expense::new("Shell", Money::from_cents(2000), date(2025, 3, 9), "Fuel"))
            .unwrap();
        service
            .create(Expense::new("Office Depot", Money::from_cents(5000), date(2025, 3, 1), "Office"))
            .unwrap();

        let vendors: Vec<_> = service
            .list(&ExpenseFilter::default())
            .unwrap()
            .into_iter()
            .map(|e| e.vendor)
            .collect();
        assert_eq!(vendors, vec!["Office Depot", "Shell"]);
    }

    #[test]
    fn test_filter_by_kind_and_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        service
            .create(Expense::new("Shell", Money::from_cents(2000), date(2025, 3, 9), "Fuel"))
            .unwrap();
        service
            .create(Expense::income("Client", Money::from_cents(9000), date(2025, 3, 2), "Sales"))
            .unwrap();

        let income = service
            .list(&ExpenseFilter {
                kind: Some(ExpenseKind::Income),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(income.len(), 1);

        let fuel = service
            .list(&ExpenseFilter {
                category: Some("Fuel".into()),
                search: Some("she".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(fuel.len(), 1);
        assert_eq!(service.categories().unwrap(), vec!["Fuel", "Sales"]);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let err = service
            .create(Expense::new("Shell", Money::from_cents(-1), date(2025, 3, 9), "Fuel"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_import_receipts_saves_successes_only() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let good = serde_json::json!({
            "description": "```json\n{\"vendor\": \"Brown Coffee\", \"date\": \"2025-02-03\", \"total_amount\": 4.5}\n```"
        })
        .to_string();
        let bad = r#"{"error": "GOOGLE_API_KEY is not configured"}"#.to_string();

        let results = service.import_receipts(vec![bad, good], date(2025, 6, 1));

        assert!(results[0].is_err());
        let saved = results[1].as_ref().unwrap();
        assert_eq!(saved.vendor, "Brown Coffee");
        assert_eq!(saved.category, "Uncategorized");
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }
}
