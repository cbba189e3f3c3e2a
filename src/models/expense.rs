//! Expense model
//!
//! An expense record is either money going out (`expense`) or an ad-hoc
//! receipt of money (`income`). Only the former feeds expense totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;

/// Direction of an expense record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    #[default]
    Expense,
    Income,
}

impl ExpenseKind {
    /// Parse from user input or a receipt payload (`EXPENSE`, `income`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => f.pad("expense"),
            Self::Income => f.pad("income"),
        }
    }
}

/// A line item on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: u32,
    pub name: String,
    pub amount: Money,
    pub currency: String,
    /// Accounting classification (Asset, Liability, ...) when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A recorded expense or income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub vendor: String,

    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    /// Free-text category label used for the category breakdown
    pub category: String,

    #[serde(default)]
    pub tax: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ExpenseItem>,

    #[serde(rename = "type", default)]
    pub kind: ExpenseKind,

    pub currency: String,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense of kind `expense`
    pub fn new(
        vendor: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            vendor: vendor.into(),
            amount,
            date,
            description: String::new(),
            category: category.into(),
            tax: Money::zero(),
            receipt_url: None,
            items: Vec::new(),
            kind: ExpenseKind::Expense,
            currency: "USD".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Create a new record of kind `income`
    pub fn income(
        vendor: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        let mut expense = Self::new(vendor, amount, date, category);
        expense.kind = ExpenseKind::Income;
        expense
    }

    pub fn is_expense(&self) -> bool {
        self.kind == ExpenseKind::Expense
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.vendor.trim().is_empty() {
            return Err("Vendor is required".into());
        }
        if self.category.trim().is_empty() {
            return Err("Category is required".into());
        }
        if self.amount.is_negative() {
            return Err("Amount cannot be negative".into());
        }
        if self.tax.is_negative() {
            return Err("Tax cannot be negative".into());
        }
        Ok(())
    }
}

/// Partial update for an expense
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub vendor: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tax: Option<Money>,
    pub kind: Option<ExpenseKind>,
    pub currency: Option<String>,
}

impl ExpensePatch {
    pub fn apply(self, expense: &mut Expense) {
        if let Some(v) = self.vendor {
            expense.vendor = v;
        }
        if let Some(v) = self.amount {
            expense.amount = v;
        }
        if let Some(v) = self.date {
            expense.date = v;
        }
        if let Some(v) = self.description {
            expense.description = v;
        }
        if let Some(v) = self.category {
            expense.category = v;
        }
        if let Some(v) = self.tax {
            expense.tax = v;
        }
        if let Some(v) = self.kind {
            expense.kind = v;
        }
        if let Some(v) = self.currency {
            expense.currency = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let expense = Expense::new(
            "Brown Coffee",
            Money::from_cents(450),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            "Meals",
        );
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 4.5);
        assert!(json.get("items").is_none());
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let raw = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "vendor": "Shell", "amount": 20, "category": "Fuel",
            "currency": "USD", "created_at": "2025-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Expense>(raw).is_err());
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let raw = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "vendor": "Shell", "amount": 20, "date": "yesterday",
            "category": "Fuel", "currency": "USD",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Expense>(raw).is_err());
    }

    #[test]
    fn test_patch() {
        let mut expense = Expense::new(
            "Shell",
            Money::from_cents(2000),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            "Fuel",
        );
        ExpensePatch {
            amount: Some(Money::from_cents(2500)),
            kind: Some(ExpenseKind::Income),
            ..Default::default()
        }
        .apply(&mut expense);

        assert_eq!(expense.amount.cents(), 2500);
        assert!(!expense.is_expense());
        assert_eq!(expense.vendor, "Shell");
    }

    #[test]
    fn test_validate() {
        let mut expense = Expense::new(
            " ",
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            "Fuel",
        );
        assert!(expense.validate().is_err());
        expense.vendor = "Shell".into();
        assert!(expense.validate().is_ok());
    }
}
