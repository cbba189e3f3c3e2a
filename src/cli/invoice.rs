//! Invoice CLI commands

use chrono::{Duration, Utc};
use clap::Subcommand;

use super::{parse_date, parse_money, parse_optional_date, today};
use crate::config::Settings;
use crate::display::{format_invoice_details, format_invoice_list};
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Invoice, InvoiceItem, InvoicePatch, InvoiceStatus};
use crate::services::{InvoiceFilter, InvoiceService};
use crate::storage::Storage;

/// Days between issue and due date when no due date is given
const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 30;

/// Invoice subcommands
#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// Create a draft invoice
    Create {
        /// Customer name
        customer: String,
        /// Line item as "description:quantity:rate" (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,
        /// Invoice number (default: INV-<timestamp>)
        #[arg(short, long)]
        number: Option<String>,
        /// Customer email
        #[arg(long)]
        email: Option<String>,
        /// Issue date (YYYY-MM-DD, default: today)
        #[arg(long)]
        issued: Option<String>,
        /// Due date (YYYY-MM-DD, default: 30 days after issue)
        #[arg(long)]
        due: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List invoices
    List {
        /// Filter by customer name or invoice number
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (draft, sent, paid, overdue)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show invoice details
    Show {
        /// Invoice number or ID
        invoice: String,
    },
    /// Change an invoice's status
    Status {
        /// Invoice number or ID
        invoice: String,
        /// New status (draft, sent, paid, overdue)
        status: String,
    },
    /// Mark an invoice as sent
    Send {
        /// Invoice number or ID
        invoice: String,
    },
    /// Mark an invoice as paid
    Pay {
        /// Invoice number or ID
        invoice: String,
    },
    /// Flag sent invoices that are past their due date
    MarkOverdue,
    /// Delete an invoice
    Delete {
        /// Invoice number or ID
        invoice: String,
    },
}

/// Parse a `description:quantity:rate` item argument
fn parse_item(input: &str) -> JayloyResult<InvoiceItem> {
    let mut parts = input.rsplitn(3, ':');
    let (rate, quantity, description) = match (parts.next(), parts.next(), parts.next()) {
        (Some(rate), Some(quantity), Some(description)) => (rate, quantity, description),
        _ => {
            return Err(JayloyError::Validation(format!(
                "Invalid item '{}'. Use description:quantity:rate",
                input
            )))
        }
    };

    let quantity: f64 = quantity.trim().parse().map_err(|_| {
        JayloyError::Validation(format!("Invalid quantity '{}' in item '{}'", quantity, input))
    })?;

    Ok(InvoiceItem::new(
        description.trim(),
        quantity,
        parse_money(rate, "rate")?,
    ))
}

fn parse_status(input: &str) -> JayloyResult<InvoiceStatus> {
    InvoiceStatus::parse(input).ok_or_else(|| {
        JayloyError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: draft, sent, paid, overdue",
            input
        ))
    })
}

/// Handle an invoice command
pub fn handle_invoice_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InvoiceCommands,
) -> JayloyResult<()> {
    let service = InvoiceService::new(storage, settings);

    let find = |input: &str| -> JayloyResult<Invoice> {
        service
            .find(input)?
            .ok_or_else(|| JayloyError::invoice_not_found(input))
    };

    match cmd {
        InvoiceCommands::Create {
            customer,
            items,
            number,
            email,
            issued,
            due,
            notes,
        } => {
            let items = items
                .iter()
                .map(|i| parse_item(i))
                .collect::<JayloyResult<Vec<_>>>()?;
            let issue_date = parse_optional_date(issued.as_deref())?.unwrap_or_else(today);
            let due_date = match due {
                Some(d) => parse_date(&d)?,
                None => issue_date + Duration::days(DEFAULT_PAYMENT_TERMS_DAYS),
            };

            let mut invoice = Invoice::new(
                number.unwrap_or_else(|| Invoice::default_number(Utc::now())),
                customer,
                issue_date,
                due_date,
                items,
                settings.vat_rate_percent,
            );
            invoice.currency = settings.currency_code.clone();
            invoice.customer_email = email.unwrap_or_default();
            invoice.notes = notes;

            let invoice = service.create(invoice)?;
            println!("Created invoice: {}", invoice.invoice_number);
            println!("  Customer: {}", invoice.customer_name);
            println!("  Total:    {}", invoice.total);
            println!("  Due:      {}", invoice.due_date);
            println!("  ID:       {}", invoice.id);
        }

        InvoiceCommands::List { search, status } => {
            let filter = InvoiceFilter {
                search,
                status: status.as_deref().map(parse_status).transpose()?,
            };
            print!("{}", format_invoice_list(&service.list(&filter)?));
        }

        InvoiceCommands::Show { invoice } => {
            print!("{}", format_invoice_details(&find(&invoice)?));
        }

        InvoiceCommands::Status { invoice, status } => {
            let found = find(&invoice)?;
            let updated = service.set_status(found.id, parse_status(&status)?)?;
            println!("Invoice {} is now {}", updated.invoice_number, updated.status);
        }

        InvoiceCommands::Send { invoice } => {
            let found = find(&invoice)?;
            let updated = service.update(found.id, InvoicePatch::status(InvoiceStatus::Sent))?;
            println!("Invoice {} marked as sent", updated.invoice_number);
        }

        InvoiceCommands::Pay { invoice } => {
            let found = find(&invoice)?;
            let updated = service.mark_paid(found.id)?;
            println!(
                "Invoice {} marked as paid ({})",
                updated.invoice_number, updated.total
            );
        }

        InvoiceCommands::MarkOverdue => {
            let count = service.mark_overdue(today())?;
            println!("Marked {} invoice(s) as overdue", count);
        }

        InvoiceCommands::Delete { invoice } => {
            let found = find(&invoice)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted invoice: {}", deleted.invoice_number);
        }
    }

    Ok(())
}
