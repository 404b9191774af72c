pub mod memory_store;
pub mod participant_store;

pub use memory_store::MemoryParticipantStore;
pub use participant_store::SqliteParticipantStore;

use crate::error::{DoorprizeError, Result};
use crate::types::Participant;
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Boundary between the registry and everything that consumes it.
///
/// `replace` and `append` are all-or-nothing: either every record lands or
/// the previous contents are left untouched.
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// All participants in registration order.
    async fn list(&self) -> Result<Vec<Participant>>;

    /// Registers a single participant, rejecting `(name, unit)` duplicates.
    async fn add(&self, name: &str, unit: &str) -> Result<Participant>;

    async fn append(&self, participants: Vec<Participant>) -> Result<()>;

    async fn replace(&self, participants: Vec<Participant>) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DoorprizeError::internal(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS participants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                unit TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
