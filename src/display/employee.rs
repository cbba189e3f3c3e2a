//! Employee display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Employee;

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_employee_list(employees: &[Employee]) -> String {
    let rows = employees
        .iter()
        .map(|e| EmployeeRow {
            id: e.id.to_string(),
            name: truncate(&e.name, 24),
            position: e.position.clone(),
            gross: e.gross_salary().to_string(),
            net: e.net_salary.to_string(),
            status: e.status.to_string(),
        })
        .collect();
    render_table(rows, "No employees found.\n")
}

pub fn format_employee_details(employee: &Employee) -> String {
    let mut output = String::new();

    output.push_str(&format!("Employee: {}\n", employee.name));
    output.push_str(&format!("  ID:          {}\n", employee.id));
    output.push_str(&format!("  Position:    {}\n", employee.position));
    output.push_str(&format!("  Start date:  {}\n", employee.start_date));
    output.push_str(&format!("  Status:      {}\n", employee.status));
    output.push('\n');
    output.push_str(&format!("  Base salary: {:>12}\n", employee.base_salary));
    output.push_str(&format!("  Allowances:  {:>12}\n", employee.allowances));
    output.push_str(&format!("  NSSF:        {:>12}\n", employee.nssf_deduction));
    output.push_str(&format!("  Tax:         {:>12}\n", employee.tax_deduction));
    output.push_str(&format!("  Net pay:     {:>12}\n", employee.net_salary));

    output
}
