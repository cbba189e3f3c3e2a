//! Display formatting for terminal output
//!
//! List views are rendered as tables; detail views are plain aligned text.

pub mod bank;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod product;

pub use bank::{format_bank_summary, format_bank_transaction_list};
pub use employee::{format_employee_details, format_employee_list};
pub use expense::{format_expense_details, format_expense_list};
pub use invoice::{format_invoice_details, format_invoice_list};
pub use product::{format_product_details, format_product_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Truncate a string to a maximum display length
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
