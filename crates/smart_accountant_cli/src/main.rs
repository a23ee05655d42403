//! Smart Accountant CLI: invoices, expenses and customers from the terminal.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use smart_accountant_core::db::open_db;
use smart_accountant_core::{InvoiceStatus, RecordStore, SqliteKeyValueRepository, StoreOptions};
use std::path::PathBuf;

mod commands;
mod config;
mod format;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "smart-accountant", version)]
#[command(about = "Small-business bookkeeping: invoices, expenses, customers")]
#[command(after_help = "\
QUICK START:
  smart-accountant customer add --name \"Acme\"
  smart-accountant invoice add --customer Acme --amount 1500 --status paid
  smart-accountant dashboard")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SMART_ACCOUNTANT_DB")]
    db: Option<PathBuf>,
    /// Directory for rolling log files
    #[arg(long, global = true, env = "SMART_ACCOUNTANT_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "SMART_ACCOUNTANT_LOG_LEVEL")]
    log_level: Option<String>,
    /// Year shown by the revenue chart (default: current year)
    #[arg(long, global = true)]
    year: Option<i32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals, net profit and recent transactions
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Manage expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Invoice counts and profit margin
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Paid revenue per month
    Chart,
    /// Show or change company settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Delete all data and restore default settings
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Subcommands for `smart-accountant invoice`
#[derive(Subcommand)]
pub enum InvoiceCommand {
    /// Record a new invoice
    Add {
        /// Customer name (default: general customer)
        #[arg(long, default_value = "")]
        customer: String,
        #[arg(long)]
        amount: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "pending")]
        status: InvoiceStatus,
    },
    /// List invoices
    List(ListArgs),
    /// Delete an invoice
    Delete(DeleteArgs),
}

/// Subcommands for `smart-accountant expense`
#[derive(Subcommand)]
pub enum ExpenseCommand {
    /// Record a new expense
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        amount: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List expenses
    List(ListArgs),
    /// Delete an expense
    Delete(DeleteArgs),
}

/// Subcommands for `smart-accountant customer`
#[derive(Subcommand)]
pub enum CustomerCommand {
    /// Add a customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// List customers
    List(ListArgs),
    /// Delete a customer (invoices keep the name)
    Delete(DeleteArgs),
}

/// Subcommands for `smart-accountant settings`
#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Replace company name and currency
    Set {
        #[arg(long)]
        company: String,
        /// Currency symbol (blank restores the default)
        #[arg(long, default_value = "")]
        currency: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-sensitive text to look for (customer, title or name)
    #[arg(short, long, default_value = "")]
    search: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Row number as shown by `list`
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    row: Option<usize>,
    /// Stable record id
    #[arg(long)]
    id: Option<uuid::Uuid>,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.db, cli.log_dir, cli.log_level, None);

    if let Some(log_dir) = config.log_dir.to_str() {
        if let Err(err) = smart_accountant_core::init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let conn = open_db(&config.db_path)
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    let repo = SqliteKeyValueRepository::new(&conn);

    let mut options = StoreOptions::default();
    if let Some(year) = cli.year {
        options.chart_year = year;
    }
    let mut store = RecordStore::open(repo, options).context("Failed to load records")?;

    match cli.command {
        Commands::Dashboard { json } => commands::cmd_dashboard(&store, json),
        Commands::Invoice(command) => commands::cmd_invoice(&mut store, command),
        Commands::Expense(command) => commands::cmd_expense(&mut store, command),
        Commands::Customer(command) => commands::cmd_customer(&mut store, command),
        Commands::Report { json } => commands::cmd_report(&store, json),
        Commands::Chart => commands::cmd_chart(&store),
        Commands::Settings(command) => commands::cmd_settings(&mut store, command),
        Commands::Reset { yes } => commands::cmd_reset(&mut store, yes),
    }
}
