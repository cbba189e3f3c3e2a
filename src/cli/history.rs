//! Audit history command

use crate::error::JayloyResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_history_command(storage: &Storage, limit: usize, verbose: bool) -> JayloyResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    for entry in entries {
        if verbose {
            println!("{}", entry.format_human_readable());
        } else {
            println!(
                "{} {:<6} {:<15} {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.operation.to_string(),
                entry.entity_type.to_string(),
                entry.entity_name.as_deref().unwrap_or(&entry.entity_id)
            );
        }
    }

    Ok(())
}
