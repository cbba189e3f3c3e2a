//! Jayloy Books - small-business bookkeeping
//!
//! Invoices, expenses, payroll, inventory and bank reconciliation kept in
//! plain JSON files, with a pure aggregator that turns invoices and expenses
//! into headline totals, a trailing monthly series and a category breakdown.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Record types, `Money` and typed ids
//! - `storage`: One JSON array file per collection
//! - `audit`: Append-only change log
//! - `services`: Validation and business rules per collection
//! - `receipt`: Decoding of receipt-parse endpoint responses
//! - `reports`: Finance metrics, VAT, inventory, payroll and balance sheet
//! - `export`: CSV, JSON and YAML export
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use jayloy::reports::{compute_metrics, MetricsWindow};
//!
//! let metrics = compute_metrics(&invoices, &expenses, &MetricsWindow::default(), today);
//! println!("{}", metrics.format_terminal());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod receipt;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{JayloyError, JayloyResult};
