mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use doorprize_core::{BackupManager, DoorprizeError, SqliteParticipantStore, Storage};
use doorprize_draw::DrawError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "doorprize")]
#[command(about = "Door-prize registration and live winner draws")]
#[command(version)]
struct Cli {
    /// Data directory for the participant database and config.json
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Participant registration and roster commands
    #[command(subcommand)]
    Participant(commands::ParticipantCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(commands::BackupCommands),

    /// Run an animated draw over the registered participants
    Draw(commands::DrawArgs),

    /// Organiser password commands
    #[command(subcommand)]
    Admin(commands::AdminCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "doorprize={0},doorprize_core={0},doorprize_draw={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(CliConfig::default_data_dir);
    tokio::fs::create_dir_all(&data_dir).await?;

    let mut config = CliConfig::load_or_create(&data_dir).await?;
    let storage = Arc::new(Storage::new(&data_dir.join("doorprize.db")).await?);
    let store = Arc::new(SqliteParticipantStore::new(storage));

    let result = match cli.command {
        Commands::Participant(cmd) => {
            commands::handle_participant_command(cmd, store.as_ref(), &config)
                .await
                .map_err(DrawError::from)
        }
        Commands::Backup(cmd) => {
            let manager = BackupManager::new(store.clone());
            commands::handle_backup_command(cmd, &manager, &config)
                .await
                .map_err(DrawError::from)
        }
        Commands::Draw(args) => commands::handle_draw_command(args, store.as_ref(), &config).await,
        Commands::Admin(cmd) => commands::handle_admin_command(cmd, &mut config, &data_dir)
            .await
            .map_err(DrawError::from),
    };

    if let Err(e) = result {
        match e {
            DrawError::EmptyPool => {
                eprintln!("Error: No participants registered");
                eprintln!("Use 'doorprize participant import' to load a roster");
            }
            DrawError::InvalidCount {
                requested,
                pool_size,
            } => {
                eprintln!("Error: Cannot draw {} winners", requested);
                eprintln!("Choose between 1 and {} winners", pool_size);
            }
            DrawError::Store(DoorprizeError::DuplicateRegistration { name, unit }) => {
                eprintln!("Error: {} ({}) is already registered", name, unit);
            }
            DrawError::Store(DoorprizeError::InvalidCsvHeader { found }) => {
                eprintln!("Error: Unexpected CSV header '{}'", found);
                eprintln!("Use 'doorprize participant template' for the expected layout");
            }
            DrawError::Store(DoorprizeError::AdminRejected) => {
                eprintln!("Error: Wrong admin password");
            }
            DrawError::Store(DoorprizeError::BackupChecksumMismatch) => {
                eprintln!("Error: Backup file is corrupt or was edited by hand");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
