use anyhow::Result;
use clap::{Parser, Subcommand};

use jayloy::cli::{
    handle_bank_command, handle_expense_command, handle_export_command, handle_history_command,
    handle_inventory_command, handle_invoice_command, handle_payroll_command,
    handle_report_command,
};
use jayloy::config::{paths::JayloyPaths, settings::Settings};
use jayloy::reports::MAX_MONTHS;
use jayloy::storage::Storage;

#[derive(Parser)]
#[command(
    name = "jayloy",
    author = "Jayloy",
    version,
    about = "Small-business bookkeeping from the command line",
    long_about = "Jayloy Books keeps invoices, expenses, payroll, inventory and bank \
                  statements in plain JSON files and turns them into financial \
                  summaries, VAT figures and reconciliation reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoice management commands
    #[command(subcommand)]
    Invoice(jayloy::cli::InvoiceCommands),

    /// Expense and receipt commands
    #[command(subcommand)]
    Expense(jayloy::cli::ExpenseCommands),

    /// Bank statement import and reconciliation
    #[command(subcommand)]
    Bank(jayloy::cli::BankCommands),

    /// Employees and payroll
    #[command(subcommand)]
    Payroll(jayloy::cli::PayrollCommands),

    /// Products and stock levels
    #[command(subcommand, alias = "stock")]
    Inventory(jayloy::cli::InventoryCommands),

    /// Financial reports
    #[command(subcommand)]
    Report(jayloy::cli::ReportCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(jayloy::cli::ExportCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Include before/after values
        #[arg(short, long)]
        verbose: bool,
    },

    /// Initialize the data directory
    Init,

    /// Show or change settings
    Config {
        /// Currency symbol used in output
        #[arg(long)]
        currency_symbol: Option<String>,

        /// Currency code for new records (e.g. USD, KHR)
        #[arg(long)]
        currency_code: Option<String>,

        /// Default number of months in the summary report
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MONTHS)))]
        months: Option<u32>,

        /// VAT rate in percent
        #[arg(long)]
        vat_rate: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = JayloyPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Invoice(cmd)) => handle_invoice_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Bank(cmd)) => handle_bank_command(&storage, &settings, cmd)?,
        Some(Commands::Payroll(cmd)) => handle_payroll_command(&storage, &settings, cmd)?,
        Some(Commands::Inventory(cmd)) => handle_inventory_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::History { limit, verbose }) => {
            handle_history_command(&storage, limit, verbose)?
        }
        Some(Commands::Init) => {
            println!("Initializing Jayloy at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Run 'jayloy invoice create --help' to record your first invoice.");
        }
        Some(Commands::Config {
            currency_symbol,
            currency_code,
            months,
            vat_rate,
        }) => {
            let changed = currency_symbol.is_some()
                || currency_code.is_some()
                || months.is_some()
                || vat_rate.is_some();
            if let Some(v) = currency_symbol {
                settings.currency_symbol = v;
            }
            if let Some(v) = currency_code {
                settings.currency_code = v;
            }
            if let Some(v) = months {
                settings.report_months = v;
            }
            if let Some(v) = vat_rate {
                settings.vat_rate_percent = v;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Jayloy Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:          {} ({})", settings.currency_symbol, settings.currency_code);
            println!("  Report months:     {}", settings.report_months);
            println!("  VAT rate:          {}%", settings.vat_rate_percent);
            println!("  Match tolerance:   {}", settings.match_tolerance);
            println!("  NSSF rate:         {}%", settings.payroll.nssf_rate_percent);
            println!("  NSSF cap:          {}", settings.payroll.nssf_cap);
            println!("  Tax threshold:     {}", settings.payroll.tax_threshold);
            println!("  Tax rate:          {}%", settings.payroll.tax_rate_percent);
        }
        None => {
            println!("Jayloy Books - small-business bookkeeping");
            println!();
            println!("Run 'jayloy --help' for usage information.");
        }
    }

    Ok(())
}
