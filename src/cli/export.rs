//! CLI commands for CSV export

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_bills_csv, export_installments_csv, export_transactions_csv};
use crate::services::CardService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export bills to CSV
    Bills {
        /// Output file path
        output: PathBuf,
        /// Only bills of this card
        #[arg(short, long)]
        card: Option<String>,
    },

    /// Export the installment schedule to CSV
    Installments {
        /// Output file path
        output: PathBuf,
        /// Only installments of this card
        #[arg(short, long)]
        card: Option<String>,
    },

    /// Export transactions to CSV
    Transactions {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LedgerResult<()> {
    let cards = CardService::new(storage);

    let (count, what, output) = match cmd {
        ExportCommands::Bills { output, card } => {
            let card_id = card.map(|c| cards.require(&c)).transpose()?.map(|c| c.id);
            let count = export_bills_csv(storage, create_writer(&output)?, card_id)?;
            (count, "bills", output)
        }
        ExportCommands::Installments { output, card } => {
            let card_id = card.map(|c| cards.require(&c)).transpose()?.map(|c| c.id);
            let count = export_installments_csv(storage, create_writer(&output)?, card_id)?;
            (count, "installments", output)
        }
        ExportCommands::Transactions { output } => {
            let count = export_transactions_csv(storage, create_writer(&output)?)?;
            (count, "transactions", output)
        }
    };

    tracing::info!(count, kind = what, path = %output.display(), "export written");
    println!("Exported {} {} to: {}", count, what, output.display());
    Ok(())
}

fn create_writer(output: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}
