//! Bank statement display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::BankTransaction;
use crate::services::BankSummary;

#[derive(Tabled)]
struct BankRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Matched")]
    matched: String,
}

pub fn format_bank_transaction_list(transactions: &[BankTransaction]) -> String {
    let rows = transactions
        .iter()
        .map(|t| BankRow {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: truncate(&t.description, 32),
            amount: t.signed_display(),
            matched: match (t.matched_invoice_id, t.matched_expense_id) {
                (Some(invoice_id), _) => invoice_id.to_string(),
                (None, Some(expense_id)) => expense_id.to_string(),
                (None, None) if t.reconciled => "yes".to_string(),
                (None, None) => String::new(),
            },
        })
        .collect();
    render_table(rows, "No bank transactions found.\n")
}

pub fn format_bank_summary(summary: &BankSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("  Reconciled:    {}\n", summary.reconciled));
    output.push_str(&format!("  Unreconciled:  {}\n", summary.unreconciled));
    output.push_str(&format!("  Credits:       {}\n", summary.total_credits));
    output.push_str(&format!("  Debits:        {}\n", summary.total_debits));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_signed_amounts() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let lines = vec![
            BankTransaction::new(date, "Client payment", Money::from_cents(500000)),
            BankTransaction::new(date, "Card fee", Money::from_cents(-250)),
        ];

        let output = format_bank_transaction_list(&lines);
        assert!(output.contains("+$5000.00"));
        assert!(output.contains("-$2.50"));
    }
}
