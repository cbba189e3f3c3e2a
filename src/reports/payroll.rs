//! Payroll report
//!
//! Per-employee pay slips for active staff plus the monthly totals.

use serde::Serialize;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::export::escape_csv;
use crate::models::{Employee, Money};
use crate::services::PayrollSummary;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipRow {
    pub name: String,
    pub position: String,
    pub gross: Money,
    pub nssf: Money,
    pub tax: Money,
    pub net: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollReport {
    pub rows: Vec<PayslipRow>,
    pub summary: PayrollSummary,
}

impl PayrollReport {
    pub fn generate(storage: &Storage) -> JayloyResult<Self> {
        Ok(Self::compute(&storage.employees.get_all()?))
    }

    pub fn compute(employees: &[Employee]) -> Self {
        let rows = employees
            .iter()
            .filter(|e| e.is_active())
            .map(|e| PayslipRow {
                name: e.name.clone(),
                position: e.position.clone(),
                gross: e.gross_salary(),
                nssf: e.nssf_deduction,
                tax: e.tax_deduction,
                net: e.net_salary,
            })
            .collect();

        Self {
            rows,
            summary: PayrollSummary::from_employees(employees),
        }
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<22} {:<16} {:>12} {:>10} {:>10} {:>12}\n",
            "Employee", "Position", "Gross", "NSSF", "Tax", "Net"
        ));
        output.push_str(&"-".repeat(86));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<22} {:<16} {:>12} {:>10} {:>10} {:>12}\n",
                row.name, row.position, row.gross, row.nssf, row.tax, row.net
            ));
        }

        output.push_str(&"-".repeat(86));
        output.push('\n');
        output.push_str(&format!(
            "{:<39} {:>12} {:>10} {:>10} {:>12}\n",
            format!("TOTAL ({} active)", self.summary.headcount),
            self.summary.total_gross,
            self.summary.total_nssf,
            self.summary.total_tax,
            self.summary.total_net
        ));
        output.push_str(&format!("\nEmployer cost: {}\n", self.summary.total_cost()));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> JayloyResult<()> {
        let io = |e: std::io::Error| JayloyError::Export(e.to_string());
        writeln!(writer, "Employee,Position,Gross,NSSF,Tax,Net").map_err(io)?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{:.2},{:.2},{:.2},{:.2}",
                escape_csv(&row.name),
                escape_csv(&row.position),
                row.gross.to_decimal(),
                row.nssf.to_decimal(),
                row.tax.to_decimal(),
                row.net.to_decimal()
            )
            .map_err(io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeStatus;
    use crate::services::PayrollRules;
    use chrono::NaiveDate;

    fn employee(name: &str, base_cents: i64) -> Employee {
        let mut e = Employee::new(
            name,
            "Staff",
            Money::from_cents(base_cents),
            Money::zero(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        PayrollRules::default().apply_to(&mut e);
        e
    }

    #[test]
    fn test_only_active_employees_reported() {
        let mut gone = employee("Dara", 50000);
        gone.status = EmployeeStatus::Inactive;
        let employees = vec![employee("Sokha", 100000), gone, employee("Vanna", 600000)];

        let report = PayrollReport::compute(&employees);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.summary.headcount, 2);
        assert_eq!(report.summary.total_gross.cents(), 700000);
        assert_eq!(report.summary.total_nssf.cents(), 4000 + 20000);
        assert_eq!(report.summary.total_tax.cents(), 45000);
        assert_eq!(report.summary.total_net.cents(), 96000 + 535000);
    }

    #[test]
    fn test_export_csv() {
        let report = PayrollReport::compute(&[employee("Sokha", 100000)]);
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("Sokha,Staff,1000.00,40.00,0.00,960.00"));
    }
}
