//! Invoice service
//!
//! Creation, listing, status changes and deletion of customer invoices.
//! Totals are always recomputed from the items before a write.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Invoice, InvoiceId, InvoicePatch, InvoiceStatus};
use crate::storage::Storage;

/// Listing filter; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Case-insensitive substring of the customer name or invoice number
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                invoice.customer_name.to_lowercase().contains(&term)
                    || invoice.invoice_number.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_status = self.status.map_or(true, |s| invoice.status == s);
        matches_search && matches_status
    }
}

/// Service for invoice management
pub struct InvoiceService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> InvoiceService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Validate and store a new invoice
    pub fn create(&self, mut invoice: Invoice) -> JayloyResult<Invoice> {
        if invoice.items.is_empty() {
            return Err(JayloyError::Validation(
                "Invoice must have at least one item".into(),
            ));
        }
        invoice.customer_name = invoice.customer_name.trim().to_string();
        invoice.recalculate(self.settings.vat_rate_percent);
        invoice
            .validate()
            .map_err(|e| JayloyError::Validation(e.to_string()))?;

        self.storage.add_record(&self.storage.invoices, invoice)
    }

    pub fn get(&self, id: InvoiceId) -> JayloyResult<Option<Invoice>> {
        self.storage.invoices.get(id)
    }

    /// Find an invoice by id prefix or invoice number
    pub fn find(&self, identifier: &str) -> JayloyResult<Option<Invoice>> {
        self.storage.invoices.find(identifier)
    }

    pub fn list(&self, filter: &InvoiceFilter) -> JayloyResult<Vec<Invoice>> {
        Ok(self
            .storage
            .invoices
            .get_all()?
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect())
    }

    pub fn update(&self, id: InvoiceId, patch: InvoicePatch) -> JayloyResult<Invoice> {
        let before = self
            .get(id)?
            .ok_or_else(|| JayloyError::invoice_not_found(id.to_string()))?;

        let mut invoice = before.clone();
        patch.apply(&mut invoice, self.settings.vat_rate_percent);
        if invoice.items.is_empty() {
            return Err(JayloyError::Validation(
                "Invoice must have at least one item".into(),
            ));
        }
        invoice
            .validate()
            .map_err(|e| JayloyError::Validation(e.to_string()))?;

        self.storage
            .update_record(&self.storage.invoices, &before, invoice)
    }

    pub fn set_status(&self, id: InvoiceId, status: InvoiceStatus) -> JayloyResult<Invoice> {
        self.update(id, InvoicePatch::status(status))
    }

    pub fn mark_paid(&self, id: InvoiceId) -> JayloyResult<Invoice> {
        self.set_status(id, InvoiceStatus::Paid)
    }

    /// Flag sent invoices whose due date has passed; returns how many changed
    pub fn mark_overdue(&self, today: NaiveDate) -> JayloyResult<usize> {
        let overdue: Vec<_> = self
            .storage
            .invoices
            .get_all()?
            .into_iter()
            .filter(|i| i.status == InvoiceStatus::Sent && i.due_date < today)
            .collect();

        for invoice in &overdue {
            self.set_status(invoice.id, InvoiceStatus::Overdue)?;
        }
        Ok(overdue.len())
    }

    /// Delete an invoice and unreconcile any bank line matched to it
    pub fn delete(&self, id: InvoiceId) -> JayloyResult<Invoice> {
        let removed = self.storage.delete_record(&self.storage.invoices, id)?;
        self.storage
            .release_bank_matches(|txn| txn.matched_invoice_id == Some(id))?;
        Ok(removed)
    }
}
