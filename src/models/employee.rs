//! Employee model
//!
//! Deduction fields are derived from the salary inputs by the payroll rules
//! and stored alongside them so reports read the figures that were paid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EmployeeId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.pad("active"),
            Self::Inactive => f.pad("inactive"),
        }
    }
}

/// An employee on the payroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub position: String,
    pub base_salary: Money,
    #[serde(default)]
    pub allowances: Money,
    #[serde(default)]
    pub nssf_deduction: Money,
    #[serde(default)]
    pub tax_deduction: Money,
    #[serde(default)]
    pub net_salary: Money,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Create an active employee; deductions start at zero until payroll runs
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        base_salary: Money,
        allowances: Money,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: EmployeeId::new(),
            name: name.into(),
            position: position.into(),
            base_salary,
            allowances,
            nssf_deduction: Money::zero(),
            tax_deduction: Money::zero(),
            net_salary: base_salary + allowances,
            start_date,
            status: EmployeeStatus::Active,
        }
    }

    pub fn gross_salary(&self) -> Money {
        self.base_salary + self.allowances
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Employee name is required".into());
        }
        if !self.base_salary.is_positive() {
            return Err("Base salary must be greater than 0".into());
        }
        if self.allowances.is_negative() {
            return Err("Allowances cannot be negative".into());
        }
        Ok(())
    }
}

/// Partial update for an employee
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub base_salary: Option<Money>,
    pub allowances: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    /// Whether the patch touches an input of the deduction calculation
    pub fn changes_salary(&self) -> bool {
        self.base_salary.is_some() || self.allowances.is_some()
    }

    pub fn apply(self, employee: &mut Employee) {
        if let Some(v) = self.name {
            employee.name = v;
        }
        if let Some(v) = self.position {
            employee.position = v;
        }
        if let Some(v) = self.base_salary {
            employee.base_salary = v;
        }
        if let Some(v) = self.allowances {
            employee.allowances = v;
        }
        if let Some(v) = self.start_date {
            employee.start_date = v;
        }
        if let Some(v) = self.status {
            employee.status = v;
        }
    }
}
