//! YAML Export functionality
//!
//! Same document as the JSON export, in a format that is easier to read and
//! diff by hand.

use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> JayloyResult<()> {
    let export = FullExport::from_storage(storage)?;
    let io = |e: std::io::Error| JayloyError::Export(e.to_string());

    writeln!(writer, "# Jayloy Books Full Export").map_err(io)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io)?;
    writeln!(writer).map_err(io)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| JayloyError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> JayloyResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| JayloyError::Import(e.to_string()))?;

    export.validate().map_err(JayloyError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::JayloyPaths;
    use crate::models::{Money, Product};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(JayloyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let product = Product::new(
            "Printer paper",
            "PAP-A4",
            Money::from_cents(600),
            Money::from_cents(450),
            10,
            "Office",
        );
        storage.add_record(&storage.products, product).unwrap();

        let mut out = Vec::new();
        export_full_yaml(&storage, &mut out).unwrap();
        let yaml = String::from_utf8(out).unwrap();
        assert!(yaml.starts_with("# Jayloy Books Full Export"));

        let imported = import_from_yaml(&yaml).unwrap();
        assert_eq!(imported.products.len(), 1);
        assert_eq!(imported.products[0].sku, "PAP-A4");
    }
}
