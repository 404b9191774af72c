use crate::config::CliConfig;
use clap::Subcommand;
use dialoguer::Password;
use doorprize_core::{hash_password, verify_password, DoorprizeError, Result};
use std::path::Path;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Require a password before import, clear and restore
    SetPassword,
    /// Remove the admin password
    RemovePassword,
}

pub async fn handle_admin_command(
    cmd: AdminCommands,
    config: &mut CliConfig,
    data_dir: &Path,
) -> Result<()> {
    match cmd {
        AdminCommands::SetPassword => {
            require_admin(config)?;

            let password = Password::new()
                .with_prompt("New admin password")
                .with_confirmation("Confirm admin password", "Passwords don't match")
                .interact()
                .map_err(|e| DoorprizeError::prompt(e.to_string()))?;

            config.admin_password = Some(hash_password(&password));
            config.save(data_dir).await?;
            println!("Admin password set");
        }

        AdminCommands::RemovePassword => {
            if config.admin_password.is_none() {
                println!("No admin password is set");
                return Ok(());
            }

            require_admin(config)?;
            config.admin_password = None;
            config.save(data_dir).await?;
            println!("Admin password removed");
        }
    }

    Ok(())
}

/// Prompts for the admin password when one is configured.
pub(crate) fn require_admin(config: &CliConfig) -> Result<()> {
    let Some(credential) = config.admin_password.as_deref() else {
        return Ok(());
    };

    let password = Password::new()
        .with_prompt("Admin password")
        .interact()
        .map_err(|e| DoorprizeError::prompt(e.to_string()))?;

    verify_password(&password, credential)
}
