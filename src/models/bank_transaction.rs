//! Bank statement line model
//!
//! Imported bank lines are reconciled by linking them to an invoice (credits)
//! or an expense (debits).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BankTransactionId, ExpenseId, InvoiceId};
use super::money::Money;

/// Direction of a bank line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankTransactionKind {
    Debit,
    Credit,
}

impl BankTransactionKind {
    /// Derive the kind from a signed statement amount
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

impl fmt::Display for BankTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => f.pad("debit"),
            Self::Credit => f.pad("credit"),
        }
    }
}

/// A single imported bank statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: BankTransactionId,

    pub date: NaiveDate,

    pub description: String,

    /// Signed amount as shown on the statement
    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: BankTransactionKind,

    /// Running balance reported by the bank
    #[serde(default)]
    pub balance: Money,

    #[serde(default)]
    pub reconciled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_invoice_id: Option<InvoiceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_expense_id: Option<ExpenseId>,
}

impl BankTransaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Money) -> Self {
        Self {
            id: BankTransactionId::new(),
            date,
            description: description.into(),
            amount,
            kind: BankTransactionKind::from_amount(amount),
            balance: Money::zero(),
            reconciled: false,
            matched_invoice_id: None,
            matched_expense_id: None,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == BankTransactionKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == BankTransactionKind::Debit
    }

    /// Drop any invoice or expense link and mark the line unreconciled
    pub fn clear_match(&mut self) {
        self.reconciled = false;
        self.matched_invoice_id = None;
        self.matched_expense_id = None;
    }

    /// Amount with a +/- sign taken from the kind, e.g. `+$5000.00`
    pub fn signed_display(&self) -> String {
        let sign = if self.is_credit() { '+' } else { '-' };
        format!("{}{}", sign, self.amount.abs())
    }
}

/// Partial update for a bank line
#[derive(Debug, Clone, Default)]
pub struct BankTransactionPatch {
    pub description: Option<String>,
    pub reconciled: Option<bool>,
    pub matched_invoice_id: Option<InvoiceId>,
    pub matched_expense_id: Option<ExpenseId>,
}

impl BankTransactionPatch {
    pub fn apply(self, txn: &mut BankTransaction) {
        if let Some(v) = self.description {
            txn.description = v;
        }
        if let Some(v) = self.reconciled {
            txn.reconciled = v;
        }
        if let Some(v) = self.matched_invoice_id {
            txn.matched_invoice_id = Some(v);
        }
        if let Some(v) = self.matched_expense_id {
            txn.matched_expense_id = Some(v);
        }
    }
}
