//! Invoice display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Invoice;

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format invoices as a table
pub fn format_invoice_list(invoices: &[Invoice]) -> String {
    let rows = invoices
        .iter()
        .map(|i| InvoiceRow {
            id: i.id.to_string(),
            number: i.invoice_number.clone(),
            customer: truncate(&i.customer_name, 24),
            issued: i.issue_date.to_string(),
            due: i.due_date.to_string(),
            total: i.total.to_string(),
            status: i.status.to_string(),
        })
        .collect();
    render_table(rows, "No invoices found.\n")
}

/// Format a single invoice with its line items
pub fn format_invoice_details(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.invoice_number));
    output.push_str(&format!("  ID:        {}\n", invoice.id));
    output.push_str(&format!("  Customer:  {}\n", invoice.customer_name));
    if !invoice.customer_email.is_empty() {
        output.push_str(&format!("  Email:     {}\n", invoice.customer_email));
    }
    output.push_str(&format!("  Issued:    {}\n", invoice.issue_date));
    output.push_str(&format!("  Due:       {}\n", invoice.due_date));
    output.push_str(&format!("  Status:    {}\n", invoice.status));

    output.push_str(&format!(
        "\n  {:<30} {:>8} {:>12} {:>12}\n",
        "Description", "Qty", "Rate", "Amount"
    ));
    for item in &invoice.items {
        output.push_str(&format!(
            "  {:<30} {:>8} {:>12} {:>12}\n",
            truncate(&item.description, 30),
            item.quantity,
            item.rate,
            item.amount
        ));
    }

    output.push_str(&format!("\n  {:<51} {:>12}\n", "Subtotal", invoice.subtotal));
    output.push_str(&format!("  {:<51} {:>12}\n", "VAT", invoice.tax));
    output.push_str(&format!("  {:<51} {:>12}\n", "Total", invoice.total));

    if let Some(notes) = &invoice.notes {
        output.push_str(&format!("\n  Notes: {}\n", notes));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceItem, Money};
    use chrono::NaiveDate;

    fn invoice() -> Invoice {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        Invoice::new(
            "INV-42",
            "Acme",
            date,
            date,
            vec![InvoiceItem::new("Consulting", 2.0, Money::from_cents(10000))],
            10.0,
        )
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_invoice_list(&[]), "No invoices found.\n");
    }

    #[test]
    fn test_list_contains_row() {
        let output = format_invoice_list(&[invoice()]);
        assert!(output.contains("INV-42"));
        assert!(output.contains("$220.00"));
        assert!(output.contains("draft"));
    }

    #[test]
    fn test_details_show_totals() {
        let output = format_invoice_details(&invoice());
        assert!(output.contains("Consulting"));
        assert!(output.contains("$200.00"));
        assert!(output.contains("$20.00"));
    }
}
