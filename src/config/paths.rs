//! Path management for Jayloy
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `JAYLOY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/jayloy` or `~/.config/jayloy`
//! 3. Windows: `%APPDATA%\jayloy`

use std::path::PathBuf;

use crate::error::JayloyError;

/// Fixed namespace keys for each persisted collection
pub const INVOICES_KEY: &str = "jayloy_invoices";
pub const EXPENSES_KEY: &str = "jayloy_expenses";
pub const BANK_TRANSACTIONS_KEY: &str = "jayloy_bank_transactions";
pub const EMPLOYEES_KEY: &str = "jayloy_employees";
pub const PRODUCTS_KEY: &str = "jayloy_products";

/// Manages all paths used by Jayloy
#[derive(Debug, Clone)]
pub struct JayloyPaths {
    base_dir: PathBuf,
}

impl JayloyPaths {
    /// Create a new JayloyPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, JayloyError> {
        let base_dir = if let Ok(custom) = std::env::var("JAYLOY_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create JayloyPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/jayloy/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/jayloy/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path of the JSON array stored under a collection key
    pub fn collection_file(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", key))
    }

    pub fn invoices_file(&self) -> PathBuf {
        self.collection_file(INVOICES_KEY)
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.collection_file(EXPENSES_KEY)
    }

    pub fn bank_transactions_file(&self) -> PathBuf {
        self.collection_file(BANK_TRANSACTIONS_KEY)
    }

    pub fn employees_file(&self) -> PathBuf {
        self.collection_file(EMPLOYEES_KEY)
    }

    pub fn products_file(&self) -> PathBuf {
        self.collection_file(PRODUCTS_KEY)
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), JayloyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| JayloyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| JayloyError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Jayloy has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, JayloyError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                JayloyError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("jayloy"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, JayloyError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| JayloyError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("jayloy"))
}
