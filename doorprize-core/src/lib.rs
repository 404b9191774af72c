//! Door-prize registry
//!
//! Participant model, durable and in-memory stores, CSV bulk import,
//! registration rules, roster analytics, JSON backups and the optional
//! organiser password. The draw itself lives in `doorprize-draw` and only
//! sees the list returned by [`ParticipantStore::list`].

pub mod admin;
pub mod analytics;
pub mod backup;
pub mod error;
pub mod export;
pub mod import;
pub mod registration;
pub mod storage;
pub mod types;

pub use admin::{hash_password, verify_password};
pub use analytics::{unit_stats, UnitStat};
pub use backup::{BackupManager, ParticipantBackup};
pub use error::{DoorprizeError, Result};
pub use export::format_winners;
pub use import::{parse_csv, plan_import, ImportMode, ImportPlan, CSV_TEMPLATE};
pub use registration::{check_registration, RegistrationDecision};
pub use storage::{MemoryParticipantStore, ParticipantStore, SqliteParticipantStore, Storage};
pub use types::Participant;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_import_plan_applied_to_store() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(&temp_dir.path().join("doorprize.db"))
            .await
            .unwrap();
        let store = SqliteParticipantStore::new(Arc::new(storage));
        store.add("Ani", "Legal").await.unwrap();

        let incoming = parse_csv(CSV_TEMPLATE).unwrap();
        let existing = store.list().await.unwrap();
        let plan = plan_import(&existing, incoming, ImportMode::Merge);
        store.replace(plan.participants).await.unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Ani", "John Doe", "Jane Smith"]);
    }
}
