//! Bank statement import
//!
//! Reads `Date,Description,Amount[,Balance]` CSV statements into bank lines.
//! The header row is optional, several common date layouts are accepted and
//! lines already present (same date, description and amount) are skipped.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{JayloyError, JayloyResult};
use crate::models::{BankTransaction, Money};
use crate::storage::Storage;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m/%d/%y", "%d-%m-%Y",
];

/// A statement row before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub balance: Option<Money>,
}

impl StatementLine {
    fn is_same_as(&self, txn: &BankTransaction) -> bool {
        txn.date == self.date && txn.amount == self.amount && txn.description == self.description
    }

    fn into_transaction(self) -> BankTransaction {
        let mut txn = BankTransaction::new(self.date, self.description, self.amount);
        if let Some(balance) = self.balance {
            txn.balance = balance;
        }
        txn
    }
}

/// Outcome of a statement import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub imported_ids: Vec<String>,
    /// Error messages keyed by line number
    pub errors: HashMap<usize, String>,
}

/// Parse a statement without touching storage
///
/// Each entry carries the 1-based line number it came from.
pub fn parse_statement<R: Read>(
    reader: R,
) -> JayloyResult<Vec<(usize, Result<StatementLine, String>)>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut lines = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let row_number = idx + 1;
        let record =
            record.map_err(|e| JayloyError::Import(format!("Line {}: {}", row_number, e)))?;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        // A leading row whose first cell is not a date is the header
        if idx == 0 && parse_date(record.get(0).unwrap_or_default()).is_err() {
            continue;
        }

        lines.push((row_number, parse_record(&record)));
    }
    Ok(lines)
}

fn parse_record(record: &StringRecord) -> Result<StatementLine, String> {
    if record.len() < 3 {
        return Err(format!(
            "expected at least 3 columns (Date,Description,Amount), found {}",
            record.len()
        ));
    }

    let date = parse_date(&record[0])?;
    let description = record[1].to_string();
    if description.is_empty() {
        return Err("missing description".into());
    }
    let amount = parse_amount(&record[2])?;
    let balance = match record.get(3) {
        Some(raw) if !raw.is_empty() => Some(parse_amount(raw)?),
        _ => None,
    };

    Ok(StatementLine {
        date,
        description,
        amount,
        balance,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Amounts may use accounting negatives, e.g. `(45.00)`
fn parse_amount(s: &str) -> Result<Money, String> {
    let (negated, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let amount =
        Money::parse(body).map_err(|e| format!("Could not parse amount: '{}' ({})", s, e))?;
    Ok(if negated { -amount.abs() } else { amount })
}

/// Service that stores parsed statement lines
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn import_statement<R: Read>(&self, reader: R) -> JayloyResult<ImportResult> {
        let mut result = ImportResult::default();
        let mut existing = self.storage.bank_transactions.get_all()?;

        for (row_number, parsed) in parse_statement(reader)? {
            let line = match parsed {
                Ok(line) => line,
                Err(message) => {
                    result.errors.insert(row_number, message);
                    continue;
                }
            };

            if existing.iter().any(|t| line.is_same_as(t)) {
                result.duplicates_skipped += 1;
                continue;
            }

            let stored = self
                .storage
                .add_record(&self.storage.bank_transactions, line.into_transaction())?;
            result.imported_ids.push(stored.id.to_string());
            result.imported += 1;
            existing.push(stored);
        }

        Ok(result)
    }
}
