use crate::error::{DoorprizeError, Result};
use crate::registration::{check_registration, RegistrationDecision};
use crate::storage::ParticipantStore;
use crate::types::Participant;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Volatile registry, for throwaway draws and tests.
#[derive(Debug, Default)]
pub struct MemoryParticipantStore {
    participants: RwLock<Vec<Participant>>,
}

impl MemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants: RwLock::new(participants),
        }
    }
}

#[async_trait]
impl ParticipantStore for MemoryParticipantStore {
    async fn list(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.read().clone())
    }

    async fn add(&self, name: &str, unit: &str) -> Result<Participant> {
        let participant = Participant::new(name, unit)?;
        let mut participants = self.participants.write();

        if check_registration(&participants, name, unit) == RegistrationDecision::RejectDuplicate {
            return Err(DoorprizeError::DuplicateRegistration {
                name: participant.name,
                unit: participant.unit,
            });
        }

        participants.push(participant.clone());
        Ok(participant)
    }

    async fn append(&self, incoming: Vec<Participant>) -> Result<()> {
        self.participants.write().extend(incoming);
        Ok(())
    }

    async fn replace(&self, incoming: Vec<Participant>) -> Result<()> {
        *self.participants.write() = incoming;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.participants.write().clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.participants.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryParticipantStore::new();
        store.add("John Doe", "IT").await.unwrap();
        assert!(store.add("JOHN DOE", "it").await.is_err());

        store
            .append(vec![Participant::new("Jane Smith", "HR").unwrap()])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
