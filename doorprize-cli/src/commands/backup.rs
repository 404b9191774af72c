use super::admin::require_admin;
use super::participants::confirm;
use crate::config::CliConfig;
use clap::Subcommand;
use doorprize_core::{BackupManager, Result};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write the roster to a checksummed JSON backup
    Create {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replace the roster with the contents of a backup
    Restore {
        /// Backup file path
        #[arg(short, long)]
        input: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_backup_command(
    cmd: BackupCommands,
    manager: &BackupManager,
    config: &CliConfig,
) -> Result<()> {
    match cmd {
        BackupCommands::Create { output } => {
            println!("Creating backup...");
            let count = manager.export_to_file(&output).await?;
            println!("Backed up {} participants to {}", count, output.display());
        }

        BackupCommands::Restore { input, force } => {
            // verify before asking so a corrupt file never reaches the prompt
            let backup = BackupManager::read_file(&input).await?;

            println!(
                "Backup from {} holds {} participants",
                backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                backup.participants.len()
            );

            require_admin(config)?;
            if !force && !confirm("Replace the current roster with this backup?")? {
                println!("Restore cancelled");
                return Ok(());
            }

            let restored = manager.import_from_file(&input).await?;
            println!("Restored {} participants", restored);
        }
    }

    Ok(())
}
