use super::admin::require_admin;
use crate::config::CliConfig;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use doorprize_core::{
    parse_csv, plan_import, unit_stats, DoorprizeError, ImportMode, Participant, ParticipantStore,
    Result, CSV_TEMPLATE,
};
use std::path::PathBuf;

const PREVIEW_ROWS: usize = 10;

#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Register a single participant
    Register {
        /// Participant name
        name: String,
        /// Work unit or department
        unit: String,
    },
    /// Bulk import participants from a CSV file
    Import {
        /// CSV file with a `nama,unit` header
        file: PathBuf,
        /// Replace the current roster instead of appending to it
        #[arg(long)]
        replace: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write a CSV template for bulk import
    Template {
        /// Output file path
        #[arg(short, long, default_value = "participants.csv")]
        output: PathBuf,
    },
    /// List registered participants
    List,
    /// Show participant counts per unit
    Stats,
    /// Remove every participant
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_participant_command(
    cmd: ParticipantCommands,
    store: &dyn ParticipantStore,
    config: &CliConfig,
) -> Result<()> {
    match cmd {
        ParticipantCommands::Register { name, unit } => {
            let participant = store.add(&name, &unit).await?;
            println!("Registered {}", participant);
            println!("Total participants: {}", store.count().await?);
        }

        ParticipantCommands::Import { file, replace, yes } => {
            require_admin(config)?;
            let text = tokio::fs::read_to_string(&file).await?;
            let incoming = parse_csv(&text)?;
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Merge
            };

            let existing = store.list().await?;
            let plan = plan_import(&existing, incoming, mode);

            println!("Read {} participants from {}", plan.imported, file.display());
            let preview_start = plan.participants.len() - plan.imported;
            print_participants(&plan.participants[preview_start..], PREVIEW_ROWS);

            let prompt = match plan.mode {
                ImportMode::Replace => format!(
                    "Replace all {} registered participants with these {}?",
                    existing.len(),
                    plan.imported
                ),
                ImportMode::Merge => format!(
                    "Add these {} participants to the existing {}?",
                    plan.imported,
                    existing.len()
                ),
            };
            if !yes && !confirm(&prompt)? {
                println!("Import cancelled");
                return Ok(());
            }

            let new_rows = plan.participants[preview_start..].to_vec();
            match plan.mode {
                ImportMode::Replace => store.replace(new_rows).await?,
                ImportMode::Merge => store.append(new_rows).await?,
            }

            tracing::info!("Imported {} participants ({:?})", plan.imported, plan.mode);
            println!(
                "Imported {} participants. Total participants: {}",
                plan.imported,
                plan.participants.len()
            );
        }

        ParticipantCommands::Template { output } => {
            tokio::fs::write(&output, CSV_TEMPLATE).await?;
            println!("CSV template written to {}", output.display());
        }

        ParticipantCommands::List => {
            let participants = store.list().await?;
            if participants.is_empty() {
                println!("No participants registered");
                println!("Use 'doorprize participant register' or 'doorprize participant import' to add some");
                return Ok(());
            }

            print_participants(&participants, participants.len());
            println!("Total participants: {}", participants.len());
        }

        ParticipantCommands::Stats => {
            let participants = store.list().await?;
            let stats = unit_stats(&participants);

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Unit", "Participants"]);
            for stat in &stats {
                table.add_row(vec![stat.unit.clone(), stat.count.to_string()]);
            }

            println!("{}", table);
            println!(
                "Total: {} participants across {} units",
                participants.len(),
                stats.len()
            );
        }

        ParticipantCommands::Clear { force } => {
            let count = store.count().await?;
            if count == 0 {
                println!("No participants registered");
                return Ok(());
            }

            require_admin(config)?;

            let prompt = format!("Remove all {} participants? This cannot be undone", count);
            if !force && !confirm(&prompt)? {
                println!("Clear cancelled");
                return Ok(());
            }

            store.clear().await?;
            println!("Removed {} participants", count);
        }
    }

    Ok(())
}

pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| DoorprizeError::prompt(e.to_string()))
}

fn print_participants(participants: &[Participant], limit: usize) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Unit"]);

    for (i, p) in participants.iter().take(limit).enumerate() {
        table.add_row(vec![(i + 1).to_string(), p.name.clone(), p.unit.clone()]);
    }

    println!("{}", table);
    if participants.len() > limit {
        println!("... and {} more", participants.len() - limit);
    }
}
