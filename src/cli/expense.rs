//! Expense CLI commands

use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

use super::{parse_money, parse_optional_date, parse_optional_money, today};
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Expense, ExpenseKind, ExpensePatch};
use crate::services::{ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Vendor name
        vendor: String,
        /// Amount (e.g., "12.50")
        amount: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Category
        #[arg(short, long, default_value = "Uncategorized")]
        category: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Tax included in the amount
        #[arg(long)]
        tax: Option<String>,
        /// Record money received instead of spent
        #[arg(long)]
        income: bool,
    },
    /// List expenses
    List {
        /// Filter by vendor or description
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by type (expense, income)
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Show expense details
    Show {
        /// Expense ID
        expense: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID
        expense: String,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        expense: String,
    },
    /// List the categories in use
    Categories,
    /// Save expenses from receipt-parse responses (one JSON body per file)
    ImportReceipt {
        /// Files holding the parse endpoint's response body
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> JayloyResult<()> {
    let service = ExpenseService::new(storage);

    let find = |input: &str| -> JayloyResult<Expense> {
        service
            .find(input)?
            .ok_or_else(|| JayloyError::expense_not_found(input))
    };

    match cmd {
        ExpenseCommands::Add {
            vendor,
            amount,
            date,
            category,
            description,
            tax,
            income,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let date = parse_optional_date(date.as_deref())?.unwrap_or_else(today);
            let mut expense = if income {
                Expense::income(vendor, amount, date, category)
            } else {
                Expense::new(vendor, amount, date, category)
            };
            expense.description = description.unwrap_or_default();
            if let Some(tax) = parse_optional_money(tax.as_deref(), "tax")? {
                expense.tax = tax;
            }

            let expense = service.create(expense)?;
            println!("Recorded {}: {} {}", expense.kind, expense.vendor, expense.amount);
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List {
            search,
            category,
            kind,
        } => {
            let kind = kind
                .as_deref()
                .map(|k| {
                    ExpenseKind::parse(k).ok_or_else(|| {
                        JayloyError::Validation(format!(
                            "Invalid type: '{}'. Valid types: expense, income",
                            k
                        ))
                    })
                })
                .transpose()?;
            let filter = ExpenseFilter {
                search,
                category,
                kind,
            };
            print!("{}", format_expense_list(&service.list(&filter)?));
        }

        ExpenseCommands::Show { expense } => {
            print!("{}", format_expense_details(&find(&expense)?));
        }

        ExpenseCommands::Edit {
            expense,
            vendor,
            amount,
            date,
            category,
            description,
        } => {
            let found = find(&expense)?;
            let patch = ExpensePatch {
                vendor,
                amount: parse_optional_money(amount.as_deref(), "amount")?,
                date: parse_optional_date(date.as_deref())?,
                category,
                description,
                ..Default::default()
            };
            let updated = service.update(found.id, patch)?;
            println!("Updated expense: {} {}", updated.vendor, updated.amount);
        }

        ExpenseCommands::Delete { expense } => {
            let found = find(&expense)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted expense: {} {}", deleted.vendor, deleted.amount);
        }

        ExpenseCommands::Categories => {
            let categories = service.categories()?;
            if categories.is_empty() {
                println!("No categories in use.");
            }
            for category in categories {
                println!("{}", category);
            }
        }

        ExpenseCommands::ImportReceipt { files } => {
            let mut bodies = Vec::with_capacity(files.len());
            for file in &files {
                bodies.push(fs::read_to_string(file).map_err(|e| {
                    JayloyError::Import(format!("Failed to read {}: {}", file.display(), e))
                })?);
            }

            let results = service.import_receipts(&bodies, today());
            let mut saved = 0;
            for (file, result) in files.iter().zip(results) {
                match result {
                    Ok(expense) => {
                        saved += 1;
                        println!(
                            "{}: saved {} {} ({})",
                            file.display(),
                            expense.vendor,
                            expense.amount,
                            expense.id
                        );
                    }
                    Err(e) => eprintln!("{}: {}", file.display(), e),
                }
            }
            println!("Imported {} of {} receipt(s)", saved, files.len());
        }
    }

    Ok(())
}
