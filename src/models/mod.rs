//! Core data models for Jayloy
//!
//! Record types for every persisted collection plus the shared `Money` and
//! typed id wrappers. Each record has a matching `*Patch` type for partial
//! updates so the store never merges untyped field maps.

pub mod bank_transaction;
pub mod employee;
pub mod expense;
pub mod ids;
pub mod invoice;
pub mod money;
pub mod product;

pub use bank_transaction::{BankTransaction, BankTransactionKind, BankTransactionPatch};
pub use employee::{Employee, EmployeePatch, EmployeeStatus};
pub use expense::{Expense, ExpenseItem, ExpenseKind, ExpensePatch};
pub use ids::{BankTransactionId, EmployeeId, ExpenseId, InvoiceId, ProductId};
pub use invoice::{Invoice, InvoiceItem, InvoicePatch, InvoiceStatus};
pub use money::Money;
pub use product::{Product, ProductPatch, StockStatus};
