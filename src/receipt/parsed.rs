//! Parsed receipt payload and conversion into an expense draft

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JayloyError, JayloyResult};
use crate::models::{Expense, ExpenseId, ExpenseItem, ExpenseKind, Money};

const UNKNOWN_VENDOR: &str = "Unknown Vendor";
const UNCATEGORIZED: &str = "Uncategorized";

/// One line extracted from a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Receipt data as produced by the parsing model
///
/// Every field is optional because the model omits or nulls whatever it
/// cannot read. Defaults are applied by `to_expense_draft`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    #[serde(default)]
    pub vendor: Option<String>,

    /// "EXPENSE" or "INCOME", in any case
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, alias = "amount")]
    pub total_amount: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tax: Option<f64>,

    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

impl ParsedReceipt {
    pub fn kind(&self) -> ExpenseKind {
        self.kind
            .as_deref()
            .and_then(ExpenseKind::parse)
            .unwrap_or_default()
    }

    /// Build a new expense from the receipt
    ///
    /// A missing date falls back to `today`; a date that is present but not
    /// `YYYY-MM-DD` is rejected.
    pub fn to_expense_draft(&self, today: NaiveDate) -> JayloyResult<Expense> {
        let date = match non_blank(&self.date) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                JayloyError::Receipt(format!("unrecognized receipt date '{}'", raw))
            })?,
            None => today,
        };

        let amount = self.total_amount.unwrap_or(0.0);
        if !amount.is_finite() || amount < 0.0 {
            return Err(JayloyError::Receipt(format!(
                "invalid total amount {}",
                amount
            )));
        }

        let currency = non_blank(&self.currency).unwrap_or("USD").to_string();

        Ok(Expense {
            id: ExpenseId::new(),
            vendor: non_blank(&self.vendor).unwrap_or(UNKNOWN_VENDOR).to_string(),
            amount: Money::from_decimal(amount),
            date,
            description: non_blank(&self.description).unwrap_or_default().to_string(),
            category: non_blank(&self.category).unwrap_or(UNCATEGORIZED).to_string(),
            tax: Money::from_decimal(self.tax.filter(|t| t.is_finite()).unwrap_or(0.0)),
            receipt_url: None,
            items: self
                .items
                .iter()
                .map(|item| ExpenseItem {
                    id: item.id,
                    name: item.name.clone(),
                    amount: Money::from_decimal(item.amount),
                    currency: item.currency.clone().unwrap_or_else(|| currency.clone()),
                    category: item.category.clone(),
                })
                .collect(),
            kind: self.kind(),
            currency,
            created_at: Utc::now(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let expense = ParsedReceipt::default().to_expense_draft(today()).unwrap();

        assert_eq!(expense.vendor, "Unknown Vendor");
        assert_eq!(expense.category, "Uncategorized");
        assert_eq!(expense.date, today());
        assert_eq!(expense.amount, Money::zero());
        assert_eq!(expense.kind, ExpenseKind::Expense);
        assert_eq!(expense.currency, "USD");
    }

    #[test]
    fn test_full_payload() {
        let receipt: ParsedReceipt = serde_json::from_str(
            r#"{
                "vendor": "Lucky Supermarket",
                "type": "INCOME",
                "description": null,
                "date": "2025-02-03",
                "total_amount": 12.75,
                "items": [
                    {"id": 1, "name": "Rice", "amount": 10.0, "currency": "USD", "category": "Asset"},
                    {"id": 2, "name": "UNKNOWN", "amount": 2.75}
                ]
            }"#,
        )
        .unwrap();

        let expense = receipt.to_expense_draft(today()).unwrap();

        assert_eq!(expense.vendor, "Lucky Supermarket");
        assert_eq!(expense.kind, ExpenseKind::Income);
        assert_eq!(expense.description, "");
        assert_eq!(expense.amount.cents(), 1275);
        assert_eq!(expense.items.len(), 2);
        assert_eq!(expense.items[1].currency, "USD");
        assert_eq!(expense.items[0].category.as_deref(), Some("Asset"));
    }

    #[test]
    fn test_amount_alias() {
        let receipt: ParsedReceipt =
            serde_json::from_str(r#"{"amount": 100, "type": "EXPENSE"}"#).unwrap();
        assert_eq!(receipt.total_amount, Some(100.0));
    }

    #[test]
    fn test_bad_date_rejected() {
        let receipt = ParsedReceipt {
            date: Some("03/02/2025".into()),
            ..Default::default()
        };
        assert!(matches!(
            receipt.to_expense_draft(today()),
            Err(JayloyError::Receipt(_))
        ));
    }
}
