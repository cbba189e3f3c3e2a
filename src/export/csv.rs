//! CSV Export functionality
//!
//! A generic exporter for any serializable record list, plus fixed-column
//! exports for invoices and expenses.

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::storage::Storage;

/// Export records as CSV, taking the header from the first record's fields
///
/// Field order follows declaration order. Nested values (arrays, objects)
/// are written as inline JSON. An empty slice writes nothing.
pub fn export_records_csv<T, W>(records: &[T], writer: &mut W) -> JayloyResult<()>
where
    T: Serialize,
    W: Write,
{
    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| JayloyError::Export(e.to_string()))?;

    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(_) => {
            return Err(JayloyError::Export(
                "Only records with named fields can be exported".into(),
            ))
        }
        None => return Ok(()),
    };

    writeln!(
        writer,
        "{}",
        headers
            .iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(",")
    )
    .map_err(|e| JayloyError::Export(e.to_string()))?;

    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| format_cell(row.get(h).unwrap_or(&Value::Null)))
            .collect();
        writeln!(writer, "{}", cells.join(","))
            .map_err(|e| JayloyError::Export(e.to_string()))?;
    }

    Ok(())
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape_csv(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => escape_csv(&nested.to_string()),
    }
}

/// Export all invoices to CSV
pub fn export_invoices_csv<W: Write>(storage: &Storage, writer: &mut W) -> JayloyResult<()> {
    writeln!(
        writer,
        "Invoice Number,Customer,Issue Date,Due Date,Subtotal,Tax,Total,Currency,Status"
    )
    .map_err(|e| JayloyError::Export(e.to_string()))?;

    for invoice in storage.invoices.get_all()? {
        writeln!(
            writer,
            "{},{},{},{},{:.2},{:.2},{:.2},{},{}",
            escape_csv(&invoice.invoice_number),
            escape_csv(&invoice.customer_name),
            invoice.issue_date,
            invoice.due_date,
            invoice.subtotal.to_decimal(),
            invoice.tax.to_decimal(),
            invoice.total.to_decimal(),
            invoice.currency,
            invoice.status
        )
        .map_err(|e| JayloyError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export all expense records to CSV
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: &mut W) -> JayloyResult<()> {
    writeln!(
        writer,
        "Date,Vendor,Category,Description,Amount,Tax,Currency,Type"
    )
    .map_err(|e| JayloyError::Export(e.to_string()))?;

    for expense in storage.expenses.get_all()? {
        writeln!(
            writer,
            "{},{},{},{},{:.2},{:.2},{},{}",
            expense.date,
            escape_csv(&expense.vendor),
            escape_csv(&expense.category),
            escape_csv(&expense.description),
            expense.amount.to_decimal(),
            expense.tax.to_decimal(),
            expense.currency,
            expense.kind
        )
        .map_err(|e| JayloyError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Escape a string for CSV format
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::JayloyPaths;
    use crate::models::{Expense, Invoice, InvoiceItem, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JayloyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[derive(Serialize)]
    struct Row {
        name: String,
        qty: i32,
        note: Option<String>,
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,\"b\""), "\"a,\"\"b\"\"\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_generic_export_header_follows_field_order() {
        let rows = vec![
            Row { name: "Paper, A4".into(), qty: 3, note: None },
            Row { name: "Pens".into(), qty: 10, note: Some("blue".into()) },
        ];

        let mut out = Vec::new();
        export_records_csv(&rows, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,qty,note\n\"Paper, A4\",3,\nPens,10,blue\n"
        );
    }

    #[test]
    fn test_generic_export_empty_writes_nothing() {
        let mut out = Vec::new();
        export_records_csv::<Row, _>(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_generic_export_of_models() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let expenses = vec![Expense::new("Shell", Money::from_cents(1050), date, "Fuel")];

        let mut out = Vec::new();
        export_records_csv(&expenses, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,vendor,amount,date"));
        assert!(lines.next().unwrap().contains(",Shell,10.5,2025-03-04,"));
    }

    #[test]
    fn test_export_invoices_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let invoice = Invoice::new(
            "INV-7",
            "Acme, Ltd",
            date,
            date,
            vec![InvoiceItem::new("Design", 2.0, Money::from_cents(5000))],
            10.0,
        );
        storage.add_record(&storage.invoices, invoice).unwrap();

        let mut out = Vec::new();
        export_invoices_csv(&storage, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.contains("Invoice Number,Customer"));
        assert!(csv.contains("INV-7,\"Acme, Ltd\",2025-03-04,2025-03-04,100.00,10.00,110.00,USD,draft"));
    }

    #[test]
    fn test_export_expenses_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        storage
            .add_record(&storage.expenses, Expense::new("Shell", Money::from_cents(2000), date, "Fuel"))
            .unwrap();

        let mut out = Vec::new();
        export_expenses_csv(&storage, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.contains("2025-03-04,Shell,Fuel,,20.00,0.00,USD,expense"));
    }
}
