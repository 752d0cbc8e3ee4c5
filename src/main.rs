use anyhow::Result;
use clap::{Parser, Subcommand};

use cardledger::cli::{
    handle_account_command, handle_bill_command, handle_card_command, handle_export_command,
    handle_purchase_command, handle_transaction_command,
};
use cardledger::config::{LedgerPaths, Settings};
use cardledger::display::format_balance_summary;
use cardledger::logging::init_tracing;
use cardledger::services::{aggregate_balances, AccountService};
use cardledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cardledger",
    version,
    about = "Credit card bills, installments and balances from the terminal",
    long_about = "cardledger tracks credit cards with their billing cycles, splits \
                  purchases into installments posted to monthly bills, records bill \
                  payments and summarizes balances per account."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(cardledger::cli::AccountCommands),

    /// Credit card management commands
    #[command(subcommand)]
    Card(cardledger::cli::CardCommands),

    /// Card purchase commands
    #[command(subcommand)]
    Purchase(cardledger::cli::PurchaseCommands),

    /// Bill commands
    #[command(subcommand)]
    Bill(cardledger::cli::BillCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(cardledger::cli::TransactionCommands),

    /// Show balances grouped by account
    Summary,

    /// Export data to CSV
    #[command(subcommand)]
    Export(cardledger::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    AccountService::new(&storage).ensure_default_account(&settings)?;

    match cli.command {
        Some(Commands::Account(cmd)) => handle_account_command(&storage, cmd)?,
        Some(Commands::Card(cmd)) => handle_card_command(&storage, &settings, cmd)?,
        Some(Commands::Purchase(cmd)) => handle_purchase_command(&storage, &settings, cmd)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Summary) => {
            let transactions = storage.transactions.get_all()?;
            let accounts = storage.accounts.get_all()?;
            let entries = aggregate_balances(&transactions, &accounts, &settings.keywords);
            print!("{}", format_balance_summary(&entries, &settings));
        }
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialized cardledger at: {}", paths.data_dir().display());
            println!();
            println!("Next steps:");
            println!("  cardledger card create <name> --limit <amount> --closing-day <d> --due-day <d>");
            println!("  cardledger purchase add <card> <amount> <description>");
        }
        Some(Commands::Config) => {
            println!("cardledger Configuration");
            println!("========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Default account:     {}", settings.default_account_name);
            println!("  Minimum payment:     {}%", settings.minimum_payment_percent);
            println!("  Late fee:            {}%", settings.late_fee_percent);
        }
        None => {
            println!("cardledger - credit card bills and balances");
            println!();
            println!("Run 'cardledger --help' for usage information.");
        }
    }

    Ok(())
}
