//! Bank reconciliation CLI commands

use clap::Subcommand;
use std::fs::File;
use std::path::PathBuf;

use super::{parse_money, parse_optional_date, parse_optional_money, today};
use crate::config::Settings;
use crate::display::{format_bank_summary, format_bank_transaction_list};
use crate::error::{JayloyError, JayloyResult};
use crate::models::BankTransaction;
use crate::services::{BankService, ExpenseService, ImportService, InvoiceService};
use crate::storage::Storage;

/// Bank subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// Import a statement CSV (Date,Description,Amount[,Balance])
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Add a single statement line
    Add {
        /// Signed amount (negative for money out)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Statement description
        description: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Running balance reported by the bank
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<String>,
    },
    /// List statement lines
    List {
        /// Only lines not yet matched
        #[arg(short, long, conflicts_with = "reconciled")]
        unreconciled: bool,
        /// Only matched lines
        #[arg(short, long)]
        reconciled: bool,
    },
    /// Show candidate invoices or expenses for a line
    Suggest {
        /// Bank transaction ID
        transaction: String,
    },
    /// Match a line to an invoice (credits) or an expense (debits)
    Match {
        /// Bank transaction ID
        transaction: String,
        /// Invoice number or ID
        #[arg(long, conflicts_with = "expense", required_unless_present = "expense")]
        invoice: Option<String>,
        /// Expense ID
        #[arg(long)]
        expense: Option<String>,
    },
    /// Undo a match
    Unmatch {
        /// Bank transaction ID
        transaction: String,
    },
    /// Delete a statement line
    Delete {
        /// Bank transaction ID
        transaction: String,
    },
    /// Reconciliation progress and totals
    Summary,
}

/// Handle a bank command
pub fn handle_bank_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BankCommands,
) -> JayloyResult<()> {
    let service = BankService::new(storage, settings);

    let find = |input: &str| -> JayloyResult<BankTransaction> {
        service
            .find(input)?
            .ok_or_else(|| JayloyError::bank_transaction_not_found(input))
    };

    match cmd {
        BankCommands::Import { file } => {
            let reader = File::open(&file).map_err(|e| {
                JayloyError::Import(format!("Failed to open {}: {}", file.display(), e))
            })?;
            let result = ImportService::new(storage).import_statement(reader)?;

            println!("Imported {} statement line(s)", result.imported);
            if result.duplicates_skipped > 0 {
                println!("Skipped {} duplicate(s)", result.duplicates_skipped);
            }
            let mut errors: Vec<_> = result.errors.into_iter().collect();
            errors.sort();
            for (line, message) in errors {
                eprintln!("  line {}: {}", line, message);
            }
        }

        BankCommands::Add {
            amount,
            description,
            date,
            balance,
        } => {
            let date = parse_optional_date(date.as_deref())?.unwrap_or_else(today);
            let mut txn = BankTransaction::new(date, description, parse_money(&amount, "amount")?);
            if let Some(balance) = parse_optional_money(balance.as_deref(), "balance")? {
                txn.balance = balance;
            }
            let txn = service.add(txn)?;
            println!("Added {} line: {} ({})", txn.kind, txn.signed_display(), txn.id);
        }

        BankCommands::List {
            unreconciled,
            reconciled,
        } => {
            let lines = if unreconciled {
                service.unreconciled()?
            } else if reconciled {
                service.reconciled()?
            } else {
                service.list()?
            };
            print!("{}", format_bank_transaction_list(&lines));
        }

        BankCommands::Suggest { transaction } => {
            let txn = find(&transaction)?;
            println!("{} {} {}", txn.date, txn.description, txn.signed_display());
            println!();
            if txn.is_credit() {
                let candidates = service.potential_invoice_matches(&txn)?;
                if candidates.is_empty() {
                    println!("No matching invoices.");
                }
                for invoice in candidates {
                    println!(
                        "  {}  {:<12} {:<24} {:>12}  {}",
                        invoice.id,
                        invoice.invoice_number,
                        invoice.customer_name,
                        invoice.total,
                        invoice.status
                    );
                }
            } else {
                let candidates = service.potential_expense_matches(&txn)?;
                if candidates.is_empty() {
                    println!("No matching expenses.");
                }
                for expense in candidates {
                    println!(
                        "  {}  {}  {:<24} {:>12}",
                        expense.id, expense.date, expense.vendor, expense.amount
                    );
                }
            }
        }

        BankCommands::Match {
            transaction,
            invoice,
            expense,
        } => {
            let txn = find(&transaction)?;
            if let Some(invoice) = invoice {
                let target = InvoiceService::new(storage, settings)
                    .find(&invoice)?
                    .ok_or_else(|| JayloyError::invoice_not_found(&invoice))?;
                service.match_invoice(txn.id, target.id)?;
                println!("Matched {} to invoice {}", txn.id, target.invoice_number);
            } else if let Some(expense) = expense {
                let target = ExpenseService::new(storage)
                    .find(&expense)?
                    .ok_or_else(|| JayloyError::expense_not_found(&expense))?;
                service.match_expense(txn.id, target.id)?;
                println!("Matched {} to expense {} ({})", txn.id, target.vendor, target.id);
            }
        }

        BankCommands::Unmatch { transaction } => {
            let txn = find(&transaction)?;
            service.unmatch(txn.id)?;
            println!("Unmatched {}", txn.id);
        }

        BankCommands::Delete { transaction } => {
            let txn = find(&transaction)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted bank line: {} {}", deleted.date, deleted.description);
        }

        BankCommands::Summary => {
            print!("{}", format_bank_summary(&service.summary()?));
        }
    }

    Ok(())
}
