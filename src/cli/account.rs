//! Account CLI commands

use clap::Subcommand;

use crate::display::format_account_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountType};
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, cash, credit_card, other)
        #[arg(short = 't', long = "type", default_value = "checking")]
        account_type: String,
        /// Bank code
        #[arg(long)]
        bank: Option<String>,
        /// Branch (agency) number
        #[arg(long)]
        agency: Option<String>,
        /// Account number at the bank
        #[arg(long)]
        number: Option<String>,
    },
    /// List all accounts
    List,
    /// Make an account the default one
    Default {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> LedgerResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            bank,
            agency,
            number,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: checking, savings, cash, credit_card, other",
                    account_type
                ))
            })?;

            let account = service.create_account(
                Account::new(name, account_type).with_bank_details(bank, agency, number),
            )?;
            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            if let Some(bank) = &account.bank_id {
                println!(
                    "  Bank: {} / {} / {}",
                    bank,
                    account.agency.as_deref().unwrap_or("-"),
                    account.account_number.as_deref().unwrap_or("-")
                );
            }
            println!("  ID:   {}", account.id);
        }

        AccountCommands::List => {
            print!("{}", format_account_list(&service.list()?));
        }

        AccountCommands::Default { account } => {
            let found = service.require(&account)?;
            let updated = service.set_default(found.id)?;
            println!("Default account: {}", updated.name);
        }
    }

    Ok(())
}
