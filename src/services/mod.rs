//! Service layer for Jayloy
//!
//! Services validate input, delegate persistence to the storage layer and
//! record every mutation in the audit log.

pub mod bank;
pub mod expense;
pub mod import;
pub mod inventory;
pub mod invoice;
pub mod payroll;

pub use bank::{BankService, BankSummary};
pub use expense::{ExpenseFilter, ExpenseService};
pub use import::{ImportResult, ImportService};
pub use inventory::{InventoryService, ProductFilter};
pub use invoice::{InvoiceFilter, InvoiceService};
pub use payroll::{PayrollBreakdown, PayrollRules, PayrollService, PayrollSummary};
