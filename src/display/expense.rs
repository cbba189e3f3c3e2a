//! Expense display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Expense;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Type")]
    kind: String,
}

pub fn format_expense_list(expenses: &[Expense]) -> String {
    let rows = expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            date: e.date.to_string(),
            vendor: truncate(&e.vendor, 24),
            category: e.category.clone(),
            amount: e.amount.to_string(),
            kind: e.kind.to_string(),
        })
        .collect();
    render_table(rows, "No expenses found.\n")
}

pub fn format_expense_details(expense: &Expense) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.vendor));
    output.push_str(&format!("  ID:          {}\n", expense.id));
    output.push_str(&format!("  Date:        {}\n", expense.date));
    output.push_str(&format!("  Amount:      {} {}\n", expense.amount, expense.currency));
    output.push_str(&format!("  Tax:         {}\n", expense.tax));
    output.push_str(&format!("  Category:    {}\n", expense.category));
    output.push_str(&format!("  Type:        {}\n", expense.kind));
    if !expense.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", expense.description));
    }
    if let Some(url) = &expense.receipt_url {
        output.push_str(&format!("  Receipt:     {}\n", url));
    }

    if !expense.items.is_empty() {
        output.push_str("\n  Items:\n");
        for item in &expense.items {
            output.push_str(&format!(
                "    {:<30} {:>12} {}\n",
                truncate(&item.name, 30),
                item.amount,
                item.currency
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_list_and_details() {
        let expense = Expense::new(
            "Total Gas Station",
            Money::from_cents(3550),
            NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            "Fuel",
        );

        let list = format_expense_list(std::slice::from_ref(&expense));
        assert!(list.contains("Total Gas Station"));
        assert!(list.contains("$35.50"));

        let details = format_expense_details(&expense);
        assert!(details.contains("Category:    Fuel"));
        assert!(!details.contains("Items:"));
    }
}
