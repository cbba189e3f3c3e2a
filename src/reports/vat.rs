//! VAT summary
//!
//! Output VAT is charged on paid revenue and input VAT is reclaimed on
//! expenses, both at a flat rate over the same date range.

use serde::Serialize;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::models::{Expense, Invoice, Money};
use crate::storage::Storage;

use super::period::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VatSummary {
    pub period: DateRange,
    pub rate_percent: f64,
    pub revenue: Money,
    pub expenses: Money,
    pub output_vat: Money,
    pub input_vat: Money,
    /// Output minus input; negative means a refund position
    pub vat_due: Money,
}

impl VatSummary {
    pub fn generate(storage: &Storage, period: DateRange, rate_percent: f64) -> JayloyResult<Self> {
        let invoices = storage.invoices.get_all()?;
        let expenses = storage.expenses.get_all()?;
        Ok(Self::compute(&invoices, &expenses, period, rate_percent))
    }

    pub fn compute(
        invoices: &[Invoice],
        expenses: &[Expense],
        period: DateRange,
        rate_percent: f64,
    ) -> Self {
        let revenue: Money = invoices
            .iter()
            .filter(|i| i.is_paid() && period.contains(i.issue_date))
            .map(|i| i.total)
            .sum();
        let spent: Money = expenses
            .iter()
            .filter(|e| e.is_expense() && period.contains(e.date))
            .map(|e| e.amount)
            .sum();

        let output_vat = revenue.percent(rate_percent);
        let input_vat = spent.percent(rate_percent);

        Self {
            period,
            rate_percent,
            revenue,
            expenses: spent,
            output_vat,
            input_vat,
            vat_due: output_vat - input_vat,
        }
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("VAT Summary: {}\n", self.period));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>16}\n", "Taxable revenue", self.revenue));
        output.push_str(&format!("{:<30} {:>16}\n", "Taxable expenses", self.expenses));
        output.push_str(&format!(
            "{:<30} {:>16}\n",
            format!("Output VAT ({}%)", self.rate_percent),
            self.output_vat
        ));
        output.push_str(&format!(
            "{:<30} {:>16}\n",
            format!("Input VAT ({}%)", self.rate_percent),
            self.input_vat
        ));
        output.push_str(&"-".repeat(48));
        output.push('\n');
        let label = if self.vat_due.is_negative() {
            "VAT refundable"
        } else {
            "VAT due"
        };
        output.push_str(&format!("{:<30} {:>16}\n", label, self.vat_due.abs()));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> JayloyResult<()> {
        let io = |e: std::io::Error| JayloyError::Export(e.to_string());
        writeln!(writer, "Start,End,Revenue,Expenses,Output VAT,Input VAT,VAT Due").map_err(io)?;
        writeln!(
            writer,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            self.period.start,
            self.period.end,
            self.revenue.to_decimal(),
            self.expenses.to_decimal(),
            self.output_vat.to_decimal(),
            self.input_vat.to_decimal(),
            self.vat_due.to_decimal()
        )
        .map_err(io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceItem, InvoiceStatus};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid_invoice(cents: i64, issued: NaiveDate) -> Invoice {
        let mut invoice = Invoice::new(
            "INV-1",
            "Customer",
            issued,
            issued,
            vec![InvoiceItem::new("Work", 1.0, Money::from_cents(cents))],
            0.0,
        );
        invoice.status = InvoiceStatus::Paid;
        invoice
    }

    fn june() -> DateRange {
        DateRange::new(date(2025, 6, 1), date(2025, 6, 30))
    }

    #[test]
    fn test_vat_due() {
        let invoices = vec![paid_invoice(100000, date(2025, 6, 10))];
        let expenses = vec![Expense::new("Supplier", Money::from_cents(40000), date(2025, 6, 12), "Stock")];

        let vat = VatSummary::compute(&invoices, &expenses, june(), 10.0);

        assert_eq!(vat.output_vat.cents(), 10000);
        assert_eq!(vat.input_vat.cents(), 4000);
        assert_eq!(vat.vat_due.cents(), 6000);
    }

    #[test]
    fn test_out_of_range_and_unpaid_ignored() {
        let mut draft = paid_invoice(50000, date(2025, 6, 10));
        draft.status = InvoiceStatus::Draft;
        let invoices = vec![draft, paid_invoice(50000, date(2025, 5, 31))];
        let expenses = vec![Expense::income("Client", Money::from_cents(9000), date(2025, 6, 2), "Sales")];

        let vat = VatSummary::compute(&invoices, &expenses, june(), 10.0);

        assert!(vat.revenue.is_zero());
        assert!(vat.expenses.is_zero());
        assert!(vat.vat_due.is_zero());
    }

    #[test]
    fn test_refund_position() {
        let expenses = vec![Expense::new("Supplier", Money::from_cents(20000), date(2025, 6, 12), "Stock")];
        let vat = VatSummary::compute(&[], &expenses, june(), 10.0);

        assert_eq!(vat.vat_due.cents(), -2000);
        assert!(vat.format_terminal().contains("VAT refundable"));
    }

    #[test]
    fn test_export_csv() {
        let invoices = vec![paid_invoice(100000, date(2025, 6, 10))];
        let vat = VatSummary::compute(&invoices, &[], june(), 10.0);

        let mut out = Vec::new();
        vat.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("2025-06-01,2025-06-30,1000.00,0.00,100.00,0.00,100.00"));
    }
}
