use crate::error::{DoorprizeError, Result};
use crate::storage::ParticipantStore;
use crate::types::Participant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;

pub const BACKUP_VERSION: u32 = 1;

/// Portable snapshot of the whole registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantBackup {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
    /// Hex SHA-256 over the JSON-encoded participant list.
    pub checksum: String,
}

impl ParticipantBackup {
    pub fn new(participants: Vec<Participant>) -> Result<Self> {
        let checksum = calculate_checksum(&participants)?;
        Ok(Self {
            version: BACKUP_VERSION,
            created_at: Utc::now(),
            participants,
            checksum,
        })
    }

    pub fn verify(&self) -> Result<()> {
        if self.version != BACKUP_VERSION {
            return Err(DoorprizeError::UnsupportedBackupVersion(self.version));
        }
        if calculate_checksum(&self.participants)? != self.checksum {
            return Err(DoorprizeError::BackupChecksumMismatch);
        }
        Ok(())
    }
}

fn calculate_checksum(participants: &[Participant]) -> Result<String> {
    let encoded = serde_json::to_vec(participants)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(hex::encode(hasher.finalize()))
}

pub struct BackupManager {
    store: Arc<dyn ParticipantStore>,
}

impl BackupManager {
    pub fn new(store: Arc<dyn ParticipantStore>) -> Self {
        Self { store }
    }

    pub async fn create_backup(&self) -> Result<ParticipantBackup> {
        let participants = self.store.list().await?;
        ParticipantBackup::new(participants)
    }

    /// Export backup to file
    pub async fn export_to_file(&self, file_path: &Path) -> Result<usize> {
        let backup = self.create_backup().await?;
        let backup_json = serde_json::to_string_pretty(&backup)?;

        tokio::fs::write(file_path, backup_json).await?;
        tracing::info!(
            "Exported {} participants to {}",
            backup.participants.len(),
            file_path.display()
        );
        Ok(backup.participants.len())
    }

    /// Reads and verifies a backup without touching the store.
    pub async fn read_file(file_path: &Path) -> Result<ParticipantBackup> {
        let backup_json = tokio::fs::read_to_string(file_path).await?;
        let backup: ParticipantBackup = serde_json::from_str(&backup_json)?;
        backup.verify()?;
        Ok(backup)
    }

    /// Replaces the registry with the contents of a verified backup.
    pub async fn import_from_file(&self, file_path: &Path) -> Result<usize> {
        let backup = Self::read_file(file_path).await?;
        let restored = backup.participants.len();

        self.store.replace(backup.participants).await?;
        tracing::info!("Restored {} participants from {}", restored, file_path.display());
        Ok(restored)
    }
}
