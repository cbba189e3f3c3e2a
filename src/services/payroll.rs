//! Payroll service
//!
//! Deductions follow the Cambodian rules: a capped NSSF contribution on gross
//! pay, then a flat salary tax on the part of the remainder above a threshold.
//! The computed figures are stored on the employee record whenever its salary
//! inputs change.

use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Employee, EmployeeId, EmployeePatch, EmployeeStatus, Money};
use crate::storage::Storage;

/// Deduction parameters, configurable through `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRules {
    #[serde(default = "default_nssf_rate")]
    pub nssf_rate_percent: f64,

    /// Upper bound on the monthly NSSF contribution
    #[serde(default = "default_nssf_cap")]
    pub nssf_cap: Money,

    /// Taxable income at or below this amount is not taxed
    #[serde(default = "default_tax_threshold")]
    pub tax_threshold: Money,

    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,
}

fn default_nssf_rate() -> f64 {
    4.0
}

fn default_nssf_cap() -> Money {
    Money::from_cents(20000)
}

fn default_tax_threshold() -> Money {
    Money::from_cents(130000)
}

fn default_tax_rate() -> f64 {
    10.0
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            nssf_rate_percent: default_nssf_rate(),
            nssf_cap: default_nssf_cap(),
            tax_threshold: default_tax_threshold(),
            tax_rate_percent: default_tax_rate(),
        }
    }
}

/// Result of running the rules over one gross salary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollBreakdown {
    pub gross: Money,
    pub nssf: Money,
    pub taxable: Money,
    pub tax: Money,
    pub net: Money,
}

impl PayrollRules {
    pub fn calculate(&self, gross: Money) -> PayrollBreakdown {
        let nssf = gross.percent(self.nssf_rate_percent).min(self.nssf_cap);
        let taxable = gross - nssf;
        let tax = if taxable > self.tax_threshold {
            (taxable - self.tax_threshold).percent(self.tax_rate_percent)
        } else {
            Money::zero()
        };

        PayrollBreakdown {
            gross,
            nssf,
            taxable,
            tax,
            net: gross - nssf - tax,
        }
    }

    /// Store freshly computed deductions on an employee
    pub fn apply_to(&self, employee: &mut Employee) -> PayrollBreakdown {
        let breakdown = self.calculate(employee.gross_salary());
        employee.nssf_deduction = breakdown.nssf;
        employee.tax_deduction = breakdown.tax;
        employee.net_salary = breakdown.net;
        breakdown
    }
}

/// Monthly totals over active employees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollSummary {
    pub headcount: usize,
    pub total_gross: Money,
    pub total_nssf: Money,
    pub total_tax: Money,
    pub total_net: Money,
}

impl PayrollSummary {
    /// Sum the stored deduction figures of active employees
    pub fn from_employees(employees: &[Employee]) -> Self {
        employees
            .iter()
            .filter(|e| e.is_active())
            .fold(Self::default(), |mut acc, e| {
                acc.headcount += 1;
                acc.total_gross += e.gross_salary();
                acc.total_nssf += e.nssf_deduction;
                acc.total_tax += e.tax_deduction;
                acc.total_net += e.net_salary;
                acc
            })
    }

    /// Employer-side cost: gross pay plus the NSSF contribution
    pub fn total_cost(&self) -> Money {
        self.total_gross + self.total_nssf
    }
}

/// Service for employee management and payroll
pub struct PayrollService<'a> {
    storage: &'a Storage,
    rules: &'a PayrollRules,
}

impl<'a> PayrollService<'a> {
    pub fn new(storage: &'a Storage, rules: &'a PayrollRules) -> Self {
        Self { storage, rules }
    }

    /// Add an employee with deductions computed from the current rules
    pub fn hire(&self, mut employee: Employee) -> JayloyResult<Employee> {
        employee.name = employee.name.trim().to_string();
        employee.validate().map_err(JayloyError::Validation)?;
        self.rules.apply_to(&mut employee);

        self.storage.add_record(&self.storage.employees, employee)
    }

    pub fn get(&self, id: EmployeeId) -> JayloyResult<Option<Employee>> {
        self.storage.employees.get(id)
    }

    /// Find an employee by id prefix or exact name
    pub fn find(&self, identifier: &str) -> JayloyResult<Option<Employee>> {
        self.storage.employees.find(identifier)
    }

    pub fn list(&self, include_inactive: bool) -> JayloyResult<Vec<Employee>> {
        let employees = self.storage.employees.get_all()?;
        Ok(if include_inactive {
            employees
        } else {
            employees.into_iter().filter(|e| e.is_active()).collect()
        })
    }

    /// Apply a partial update; salary changes recompute the deductions
    pub fn update(&self, id: EmployeeId, patch: EmployeePatch) -> JayloyResult<Employee> {
        let before = self
            .get(id)?
            .ok_or_else(|| JayloyError::employee_not_found(id.to_string()))?;

        let mut employee = before.clone();
        let recompute = patch.changes_salary();
        patch.apply(&mut employee);
        employee.validate().map_err(JayloyError::Validation)?;
        if recompute {
            self.rules.apply_to(&mut employee);
        }

        self.storage
            .update_record(&self.storage.employees, &before, employee)
    }

    pub fn deactivate(&self, id: EmployeeId) -> JayloyResult<Employee> {
        self.update(
            id,
            EmployeePatch {
                status: Some(EmployeeStatus::Inactive),
                ..Default::default()
            },
        )
    }

    pub fn delete(&self, id: EmployeeId) -> JayloyResult<Employee> {
        self.storage.delete_record(&self.storage.employees, id)
    }

    /// Recompute stored deductions for every employee, e.g. after a rules change
    pub fn run(&self) -> JayloyResult<usize> {
        let mut changed = 0;
        for before in self.storage.employees.get_all()? {
            let mut employee = before.clone();
            self.rules.apply_to(&mut employee);
            if employee != before {
                self.storage.employees.replace(employee.clone())?;
                self.storage.log_update(
                    EntityType::Employee,
                    employee.id.to_string(),
                    Some(employee.name.clone()),
                    &before,
                    &employee,
                )?;
                changed += 1;
            }
        }
        if changed > 0 {
            self.storage.employees.save()?;
        }
        Ok(changed)
    }

    pub fn summary(&self) -> JayloyResult<PayrollSummary> {
        Ok(PayrollSummary::from_employees(
            &self.storage.employees.get_all()?,
        ))
    }
}
