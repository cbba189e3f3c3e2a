//! Simplified balance sheet
//!
//! Cash is approximated by paid revenue less expenses over the period and
//! receivables by every invoice still awaiting payment. Liabilities are not
//! tracked, so equity equals total assets.

use serde::Serialize;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::models::{Expense, Invoice, Money};
use crate::storage::Storage;

use super::period::DateRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheetLine {
    pub label: &'static str,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    pub period: DateRange,
    pub cash: Money,
    pub accounts_receivable: Money,
    pub accounts_payable: Money,
}

impl BalanceSheet {
    pub fn generate(storage: &Storage, period: DateRange) -> JayloyResult<Self> {
        let invoices = storage.invoices.get_all()?;
        let expenses = storage.expenses.get_all()?;
        Ok(Self::compute(&invoices, &expenses, period))
    }

    pub fn compute(invoices: &[Invoice], expenses: &[Expense], period: DateRange) -> Self {
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

        Self {
            period,
            cash: revenue - spent,
            accounts_receivable: invoices
                .iter()
                .filter(|i| i.is_outstanding())
                .map(|i| i.total)
                .sum(),
            accounts_payable: Money::zero(),
        }
    }

    pub fn total_assets(&self) -> Money {
        self.cash + self.accounts_receivable
    }

    pub fn total_liabilities(&self) -> Money {
        self.accounts_payable
    }

    pub fn owners_equity(&self) -> Money {
        self.total_assets() - self.total_liabilities()
    }

    pub fn lines(&self) -> Vec<(&'static str, Vec<BalanceSheetLine>)> {
        vec![
            (
                "Assets",
                vec![
                    BalanceSheetLine { label: "Cash & Bank", amount: self.cash },
                    BalanceSheetLine { label: "Accounts Receivable", amount: self.accounts_receivable },
                    BalanceSheetLine { label: "Total Assets", amount: self.total_assets() },
                ],
            ),
            (
                "Liabilities",
                vec![
                    BalanceSheetLine { label: "Accounts Payable", amount: self.accounts_payable },
                    BalanceSheetLine { label: "Total Liabilities", amount: self.total_liabilities() },
                ],
            ),
            (
                "Equity",
                vec![BalanceSheetLine { label: "Owner's Equity", amount: self.owners_equity() }],
            ),
        ]
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Balance Sheet: {}\n", self.period));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        for (section, lines) in self.lines() {
            output.push_str(&format!("{}\n", section));
            for line in lines {
                output.push_str(&format!("  {:<28} {:>16}\n", line.label, line.amount));
            }
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> JayloyResult<()> {
        let io = |e: std::io::Error| JayloyError::Export(e.to_string());
        writeln!(writer, "Section,Line,Amount").map_err(io)?;
        for (section, lines) in self.lines() {
            for line in lines {
                writeln!(writer, "{},{},{:.2}", section, line.label, line.amount.to_decimal())
                    .map_err(io)?;
            }
        }
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

    fn invoice(status: InvoiceStatus, cents: i64, issued: NaiveDate) -> Invoice {
        let mut invoice = Invoice::new(
            "INV-1",
            "Customer",
            issued,
            issued,
            vec![InvoiceItem::new("Work", 1.0, Money::from_cents(cents))],
            0.0,
        );
        invoice.status = status;
        invoice
    }

    #[test]
    fn test_balance_sheet_balances() {
        let period = DateRange::new(date(2025, 6, 1), date(2025, 6, 30));
        let invoices = vec![
            invoice(InvoiceStatus::Paid, 50000, date(2025, 6, 5)),
            invoice(InvoiceStatus::Sent, 20000, date(2025, 6, 7)),
            // Receivables are not limited to the period
            invoice(InvoiceStatus::Sent, 5000, date(2024, 12, 1)),
        ];
        let expenses = vec![Expense::new("Landlord", Money::from_cents(30000), date(2025, 6, 1), "Rent")];

        let sheet = BalanceSheet::compute(&invoices, &expenses, period);

        assert_eq!(sheet.cash.cents(), 20000);
        assert_eq!(sheet.accounts_receivable.cents(), 25000);
        assert_eq!(sheet.total_assets().cents(), 45000);
        assert_eq!(sheet.owners_equity(), sheet.total_assets());
    }

    #[test]
    fn test_export_csv() {
        let period = DateRange::new(date(2025, 6, 1), date(2025, 6, 30));
        let sheet = BalanceSheet::compute(&[], &[], period);
        let mut out = Vec::new();
        sheet.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("Equity,Owner's Equity,0.00"));
    }
}
