use crate::error::{DoorprizeError, Result};
use crate::registration::{check_registration, RegistrationDecision};
use crate::storage::{ParticipantStore, Storage};
use crate::types::Participant;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::Arc;

/// SQLite-backed registry; rows are listed in insertion order.
pub struct SqliteParticipantStore {
    storage: Arc<Storage>,
}

impl SqliteParticipantStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn load_all(conn: &Connection) -> Result<Vec<Participant>> {
        let mut stmt = conn.prepare("SELECT id, name, unit FROM participants ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok(Participant {
                id: row.get(0)?,
                name: row.get(1)?,
                unit: row.get(2)?,
            })
        })?;

        let mut participants = Vec::new();
        for participant in rows {
            participants.push(participant?);
        }

        Ok(participants)
    }

    fn insert_all(conn: &mut Connection, participants: &[Participant], wipe: bool) -> Result<()> {
        let tx = conn.transaction()?;
        let now = Utc::now().timestamp_millis();

        if wipe {
            tx.execute("DELETE FROM participants", [])?;
        }

        {
            let mut insert = tx.prepare(
                "INSERT INTO participants (id, name, unit, created_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for p in participants {
                insert.execute(params![p.id, p.name, p.unit, now])?;
            }
        }

        // dropping `tx` on an early return rolls everything back
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl ParticipantStore for SqliteParticipantStore {
    async fn list(&self) -> Result<Vec<Participant>> {
        let conn = self.storage.get_connection().await;
        Self::load_all(&conn)
    }

    async fn add(&self, name: &str, unit: &str) -> Result<Participant> {
        let participant = Participant::new(name, unit)?;
        let conn = self.storage.get_connection().await;

        let existing = Self::load_all(&conn)?;
        if check_registration(&existing, name, unit) == RegistrationDecision::RejectDuplicate {
            return Err(DoorprizeError::DuplicateRegistration {
                name: participant.name,
                unit: participant.unit,
            });
        }

        conn.execute(
            "INSERT INTO participants (id, name, unit, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                participant.id,
                participant.name,
                participant.unit,
                Utc::now().timestamp_millis(),
            ],
        )?;

        tracing::info!("Registered participant {} as {}", participant, participant.id);
        Ok(participant)
    }

    async fn append(&self, participants: Vec<Participant>) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        Self::insert_all(&mut conn, &participants, false)?;

        tracing::info!("Appended {} participants", participants.len());
        Ok(())
    }

    async fn replace(&self, participants: Vec<Participant>) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        Self::insert_all(&mut conn, &participants, true)?;

        tracing::info!("Replaced registry with {} participants", participants.len());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.storage.get_connection().await;
        let removed = conn.execute("DELETE FROM participants", [])?;

        tracing::info!("Cleared {} participants", removed);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.storage.get_connection().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
