//! Bank reconciliation service
//!
//! Bank lines are reconciled by hand: for each unreconciled line the service
//! proposes invoices (for credits) or expenses (for debits) whose amount is
//! within the configured tolerance, and the user confirms one of them.

use crate::config::Settings;
use crate::error::{JayloyError, JayloyResult};
use crate::models::{
    BankTransaction, BankTransactionId, BankTransactionPatch, Expense, ExpenseId, Invoice,
    InvoiceId, Money,
};
use crate::storage::Storage;

/// Counts and totals across all imported bank lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankSummary {
    pub reconciled: usize,
    pub unreconciled: usize,
    pub total_credits: Money,
    pub total_debits: Money,
}

/// Service for bank lines and their reconciliation
pub struct BankService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> BankService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record a single bank line
    pub fn add(&self, mut txn: BankTransaction) -> JayloyResult<BankTransaction> {
        if txn.description.trim().is_empty() {
            return Err(JayloyError::Validation(
                "Bank transaction description is required".into(),
            ));
        }
        txn.clear_match();

        self.storage.add_record(&self.storage.bank_transactions, txn)
    }

    pub fn get(&self, id: BankTransactionId) -> JayloyResult<Option<BankTransaction>> {
        self.storage.bank_transactions.get(id)
    }

    pub fn find(&self, identifier: &str) -> JayloyResult<Option<BankTransaction>> {
        self.storage.bank_transactions.find(identifier)
    }

    pub fn list(&self) -> JayloyResult<Vec<BankTransaction>> {
        self.storage.bank_transactions.get_all()
    }

    pub fn reconciled(&self) -> JayloyResult<Vec<BankTransaction>> {
        Ok(self.list()?.into_iter().filter(|t| t.reconciled).collect())
    }

    pub fn unreconciled(&self) -> JayloyResult<Vec<BankTransaction>> {
        Ok(self.list()?.into_iter().filter(|t| !t.reconciled).collect())
    }

    fn within_tolerance(&self, candidate: Money, line: &BankTransaction) -> bool {
        (candidate - line.amount.abs()).abs() < self.settings.match_tolerance
    }

    /// Invoices whose total is within tolerance of a credit line
    pub fn potential_invoice_matches(&self, txn: &BankTransaction) -> JayloyResult<Vec<Invoice>> {
        if !txn.is_credit() {
            return Ok(Vec::new());
        }
        Ok(self
            .storage
            .invoices
            .get_all()?
            .into_iter()
            .filter(|i| self.within_tolerance(i.total, txn))
            .collect())
    }

    /// Expenses whose amount is within tolerance of a debit line
    pub fn potential_expense_matches(&self, txn: &BankTransaction) -> JayloyResult<Vec<Expense>> {
        if !txn.is_debit() {
            return Ok(Vec::new());
        }
        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| self.within_tolerance(e.amount, txn))
            .collect())
    }

    fn unreconciled_line(&self, id: BankTransactionId) -> JayloyResult<BankTransaction> {
        let txn = self
            .get(id)?
            .ok_or_else(|| JayloyError::bank_transaction_not_found(id.to_string()))?;
        if txn.reconciled {
            return Err(JayloyError::Reconciliation(format!(
                "Bank transaction {} is already reconciled",
                txn.id
            )));
        }
        Ok(txn)
    }

    /// Link a credit line to an invoice and mark it reconciled
    pub fn match_invoice(
        &self,
        txn_id: BankTransactionId,
        invoice_id: InvoiceId,
    ) -> JayloyResult<BankTransaction> {
        let before = self.unreconciled_line(txn_id)?;
        if !before.is_credit() {
            return Err(JayloyError::Reconciliation(
                "Only credit lines can be matched to invoices".into(),
            ));
        }
        self.storage
            .invoices
            .get(invoice_id)?
            .ok_or_else(|| JayloyError::invoice_not_found(invoice_id.to_string()))?;

        let mut txn = before.clone();
        BankTransactionPatch {
            reconciled: Some(true),
            matched_invoice_id: Some(invoice_id),
            ..Default::default()
        }
        .apply(&mut txn);

        self.storage
            .update_record(&self.storage.bank_transactions, &before, txn)
    }

    /// Link a debit line to an expense and mark it reconciled
    pub fn match_expense(
        &self,
        txn_id: BankTransactionId,
        expense_id: ExpenseId,
    ) -> JayloyResult<BankTransaction> {
        let before = self.unreconciled_line(txn_id)?;
        if !before.is_debit() {
            return Err(JayloyError::Reconciliation(
                "Only debit lines can be matched to expenses".into(),
            ));
        }
        self.storage
            .expenses
            .get(expense_id)?
            .ok_or_else(|| JayloyError::expense_not_found(expense_id.to_string()))?;

        let mut txn = before.clone();
        BankTransactionPatch {
            reconciled: Some(true),
            matched_expense_id: Some(expense_id),
            ..Default::default()
        }
        .apply(&mut txn);

        self.storage
            .update_record(&self.storage.bank_transactions, &before, txn)
    }

    /// Undo a match
    pub fn unmatch(&self, txn_id: BankTransactionId) -> JayloyResult<BankTransaction> {
        let before = self
            .get(txn_id)?
            .ok_or_else(|| JayloyError::bank_transaction_not_found(txn_id.to_string()))?;
        if !before.reconciled {
            return Err(JayloyError::Reconciliation(format!(
                "Bank transaction {} is not reconciled",
                before.id
            )));
        }

        let mut txn = before.clone();
        txn.clear_match();

        self.storage
            .update_record(&self.storage.bank_transactions, &before, txn)
    }

    pub fn delete(&self, id: BankTransactionId) -> JayloyResult<BankTransaction> {
        self.storage.delete_record(&self.storage.bank_transactions, id)
    }

    pub fn summary(&self) -> JayloyResult<BankSummary> {
        Ok(self
            .list()?
            .iter()
            .fold(BankSummary::default(), |mut acc, t| {
                if t.reconciled {
                    acc.reconciled += 1;
                } else {
                    acc.unreconciled += 1;
                }
                if t.is_credit() {
                    acc.total_credits += t.amount.abs();
                } else {
                    acc.total_debits += t.amount.abs();
                }
                acc
            }))
    }
}
