//! Payroll CLI commands

use clap::Subcommand;

use super::{parse_money, parse_optional_date, parse_optional_money, today};
use crate::config::Settings;
use crate::display::{format_employee_details, format_employee_list};
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Employee, EmployeePatch, Money};
use crate::reports::PayrollReport;
use crate::services::PayrollService;
use crate::storage::Storage;

/// Payroll subcommands
#[derive(Subcommand)]
pub enum PayrollCommands {
    /// Add an employee
    Hire {
        /// Full name
        name: String,
        /// Monthly base salary
        base_salary: String,
        /// Job title
        #[arg(short, long, default_value = "")]
        position: String,
        /// Monthly allowances
        #[arg(short, long)]
        allowances: Option<String>,
        /// Start date (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<String>,
    },
    /// List employees
    List {
        /// Include inactive employees
        #[arg(short, long)]
        all: bool,
    },
    /// Show an employee's pay breakdown
    Show {
        /// Employee name or ID
        employee: String,
    },
    /// Edit an employee
    Edit {
        /// Employee name or ID
        employee: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        base_salary: Option<String>,
        #[arg(long)]
        allowances: Option<String>,
    },
    /// Mark an employee inactive
    Deactivate {
        /// Employee name or ID
        employee: String,
    },
    /// Delete an employee record
    Delete {
        /// Employee name or ID
        employee: String,
    },
    /// Recompute deductions for every employee with the current rules
    Run,
    /// Monthly payroll sheet for active employees
    Summary,
}

/// Handle a payroll command
pub fn handle_payroll_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PayrollCommands,
) -> JayloyResult<()> {
    let service = PayrollService::new(storage, &settings.payroll);

    let find = |input: &str| -> JayloyResult<Employee> {
        service
            .find(input)?
            .ok_or_else(|| JayloyError::employee_not_found(input))
    };

    match cmd {
        PayrollCommands::Hire {
            name,
            base_salary,
            position,
            allowances,
            start,
        } => {
            let employee = Employee::new(
                name,
                position,
                parse_money(&base_salary, "base salary")?,
                parse_optional_money(allowances.as_deref(), "allowances")?.unwrap_or(Money::zero()),
                parse_optional_date(start.as_deref())?.unwrap_or_else(today),
            );
            let employee = service.hire(employee)?;
            println!("Hired {} ({})", employee.name, employee.id);
            println!("  Gross: {}", employee.gross_salary());
            println!("  Net:   {}", employee.net_salary);
        }

        PayrollCommands::List { all } => {
            print!("{}", format_employee_list(&service.list(all)?));
        }

        PayrollCommands::Show { employee } => {
            print!("{}", format_employee_details(&find(&employee)?));
        }

        PayrollCommands::Edit {
            employee,
            name,
            position,
            base_salary,
            allowances,
        } => {
            let found = find(&employee)?;
            let patch = EmployeePatch {
                name,
                position,
                base_salary: parse_optional_money(base_salary.as_deref(), "base salary")?,
                allowances: parse_optional_money(allowances.as_deref(), "allowances")?,
                ..Default::default()
            };
            let updated = service.update(found.id, patch)?;
            println!("Updated {}: net pay {}", updated.name, updated.net_salary);
        }

        PayrollCommands::Deactivate { employee } => {
            let found = find(&employee)?;
            let updated = service.deactivate(found.id)?;
            println!("{} is now {}", updated.name, updated.status);
        }

        PayrollCommands::Delete { employee } => {
            let found = find(&employee)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted employee: {}", deleted.name);
        }

        PayrollCommands::Run => {
            let changed = service.run()?;
            println!("Payroll recalculated: {} employee(s) updated", changed);
        }

        PayrollCommands::Summary => {
            print!("{}", PayrollReport::generate(storage)?.format_terminal());
        }
    }

    Ok(())
}
