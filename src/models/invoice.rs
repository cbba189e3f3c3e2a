//! Invoice model
//!
//! Invoices move through draft -> sent -> paid (or overdue). Only paid
//! invoices count as revenue; only sent invoices count as outstanding.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::InvoiceId;
use super::money::Money;

/// Lifecycle status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    /// Parse a status from user input (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        };
        f.pad(label)
    }
}

/// A billed line on an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub rate: Money,
    /// quantity x rate, kept in sync by `Invoice::recalculate`
    #[serde(default)]
    pub amount: Money,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: Money) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            amount: rate.scale(quantity),
        }
    }
}

/// A customer invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,

    pub invoice_number: String,

    pub customer_name: String,

    #[serde(default)]
    pub customer_email: String,

    #[serde(default)]
    pub customer_address: String,

    pub issue_date: NaiveDate,

    pub due_date: NaiveDate,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,

    #[serde(default)]
    pub subtotal: Money,

    /// VAT charged on the subtotal
    #[serde(default)]
    pub tax: Money,

    pub total: Money,

    pub currency: String,

    #[serde(default)]
    pub status: InvoiceStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Create a draft invoice and compute its totals from the items
    pub fn new(
        invoice_number: impl Into<String>,
        customer_name: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        items: Vec<InvoiceItem>,
        vat_rate: f64,
    ) -> Self {
        let mut invoice = Self {
            id: InvoiceId::new(),
            invoice_number: invoice_number.into(),
            customer_name: customer_name.into(),
            customer_email: String::new(),
            customer_address: String::new(),
            issue_date,
            due_date,
            items,
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
            currency: "USD".to_string(),
            status: InvoiceStatus::Draft,
            notes: None,
            created_at: Utc::now(),
        };
        invoice.recalculate(vat_rate);
        invoice
    }

    /// Default invoice number derived from the creation instant
    pub fn default_number(now: DateTime<Utc>) -> String {
        format!("INV-{}", now.timestamp_millis())
    }

    /// Recompute item amounts, subtotal, VAT and total
    pub fn recalculate(&mut self, vat_rate: f64) {
        for item in &mut self.items {
            item.amount = item.rate.scale(item.quantity);
        }
        self.subtotal = self.items.iter().map(|i| i.amount).sum();
        self.tax = self.subtotal.percent(vat_rate);
        self.total = self.subtotal + self.tax;
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn is_outstanding(&self) -> bool {
        self.status == InvoiceStatus::Sent
    }

    /// Validate the invoice
    pub fn validate(&self) -> Result<(), InvoiceValidationError> {
        if self.invoice_number.trim().is_empty() {
            return Err(InvoiceValidationError::EmptyNumber);
        }
        if self.customer_name.trim().is_empty() {
            return Err(InvoiceValidationError::EmptyCustomer);
        }
        if self.due_date < self.issue_date {
            return Err(InvoiceValidationError::DueBeforeIssue);
        }
        if self.total.is_negative() {
            return Err(InvoiceValidationError::NegativeTotal);
        }
        for item in &self.items {
            if item.description.trim().is_empty() {
                return Err(InvoiceValidationError::EmptyItemDescription);
            }
            if item.quantity <= 0.0 {
                return Err(InvoiceValidationError::NonPositiveQuantity);
            }
        }
        Ok(())
    }
}

/// Partial update for an invoice; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub items: Option<Vec<InvoiceItem>>,
    pub currency: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
}

impl InvoicePatch {
    pub fn status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply the patch; totals are recomputed when the items change
    pub fn apply(self, invoice: &mut Invoice, vat_rate: f64) {
        if let Some(v) = self.invoice_number {
            invoice.invoice_number = v;
        }
        if let Some(v) = self.customer_name {
            invoice.customer_name = v;
        }
        if let Some(v) = self.customer_email {
            invoice.customer_email = v;
        }
        if let Some(v) = self.customer_address {
            invoice.customer_address = v;
        }
        if let Some(v) = self.issue_date {
            invoice.issue_date = v;
        }
        if let Some(v) = self.due_date {
            invoice.due_date = v;
        }
        if let Some(v) = self.currency {
            invoice.currency = v;
        }
        if let Some(v) = self.status {
            invoice.status = v;
        }
        if let Some(v) = self.notes {
            invoice.notes = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(items) = self.items {
            invoice.items = items;
            invoice.recalculate(vat_rate);
        }
    }
}

/// Validation errors for invoices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceValidationError {
    EmptyNumber,
    EmptyCustomer,
    DueBeforeIssue,
    NegativeTotal,
    EmptyItemDescription,
    NonPositiveQuantity,
}

impl fmt::Display for InvoiceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNumber => write!(f, "Invoice number is required"),
            Self::EmptyCustomer => write!(f, "Customer name is required"),
            Self::DueBeforeIssue => write!(f, "Due date cannot be before the issue date"),
            Self::NegativeTotal => write!(f, "Invoice total cannot be negative"),
            Self::EmptyItemDescription => write!(f, "Item description is required"),
            Self::NonPositiveQuantity => write!(f, "Item quantity must be greater than 0"),
        }
    }
}

impl std::error::Error for InvoiceValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_totals_include_vat() {
        let invoice = Invoice::new(
            "INV-1",
            "Angkor Supplies",
            date(2025, 3, 1),
            date(2025, 3, 31),
            vec![
                InvoiceItem::new("Consulting", 2.0, Money::from_cents(5000)),
                InvoiceItem::new("Travel", 1.0, Money::from_cents(2500)),
            ],
            10.0,
        );

        assert_eq!(invoice.subtotal.cents(), 12500);
        assert_eq!(invoice.tax.cents(), 1250);
        assert_eq!(invoice.total.cents(), 13750);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[test]
    fn test_validate_due_before_issue() {
        let invoice = Invoice::new(
            "INV-1",
            "Customer",
            date(2025, 3, 10),
            date(2025, 3, 1),
            vec![],
            10.0,
        );
        assert_eq!(invoice.validate(), Err(InvoiceValidationError::DueBeforeIssue));
    }

    #[test]
    fn test_patch_status_only() {
        let mut invoice = Invoice::new(
            "INV-1",
            "Customer",
            date(2025, 3, 1),
            date(2025, 3, 31),
            vec![InvoiceItem::new("Work", 1.0, Money::from_cents(10000))],
            10.0,
        );
        InvoicePatch::status(InvoiceStatus::Paid).apply(&mut invoice, 10.0);

        assert!(invoice.is_paid());
        assert_eq!(invoice.total.cents(), 11000);
        assert_eq!(invoice.customer_name, "Customer");
    }

    #[test]
    fn test_status_parse_and_wire_format() {
        assert_eq!(InvoiceStatus::parse("PAID"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::parse("void"), None);
        assert_eq!(serde_json::to_string(&InvoiceStatus::Sent).unwrap(), "\"sent\"");
    }

    #[test]
    fn test_default_number() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(Invoice::default_number(now), "INV-1700000000123");
    }
}
