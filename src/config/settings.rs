//! User settings for Jayloy
//!
//! Manages preferences such as the currency symbol, the default reporting
//! window, VAT rate, payroll rules and the reconciliation match tolerance.

use serde::{Deserialize, Serialize};

use super::paths::JayloyPaths;
use crate::error::JayloyError;
use crate::models::Money;
use crate::services::payroll::PayrollRules;

/// User settings for Jayloy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Default currency code for new records
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Number of trailing months in the dashboard series
    #[serde(default = "default_report_months")]
    pub report_months: u32,

    /// VAT rate in percent, applied to invoices and the VAT summary
    #[serde(default = "default_vat_rate")]
    pub vat_rate_percent: f64,

    /// Maximum difference for a bank line to be offered as a match
    #[serde(default = "default_match_tolerance")]
    pub match_tolerance: Money,

    /// Payroll deduction rules
    #[serde(default)]
    pub payroll: PayrollRules,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_report_months() -> u32 {
    6
}

fn default_vat_rate() -> f64 {
    10.0
}

fn default_match_tolerance() -> Money {
    Money::from_cents(100)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            currency_code: default_currency_code(),
            report_months: default_report_months(),
            vat_rate_percent: default_vat_rate(),
            match_tolerance: default_match_tolerance(),
            payroll: PayrollRules::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &JayloyPaths) -> Result<Self, JayloyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| JayloyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                JayloyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &JayloyPaths) -> Result<(), JayloyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| JayloyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| JayloyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
