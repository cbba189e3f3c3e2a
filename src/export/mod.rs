//! Export module for Jayloy
//!
//! - CSV: generic record export plus fixed-column invoice and expense sheets
//! - JSON: versioned snapshot of every collection, also used for restore
//! - YAML: the same snapshot in a human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{escape_csv, export_expenses_csv, export_invoices_csv, export_records_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
