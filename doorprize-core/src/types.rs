use crate::error::{DoorprizeError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered entrant of the drawing.
///
/// `id` is assigned once and never reused; the same `(name, unit)` pair may
/// legitimately appear more than once after a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub unit: String,
}

impl Participant {
    /// Creates a participant with a fresh id. Name and unit are trimmed and
    /// must not be empty.
    pub fn new(name: &str, unit: &str) -> Result<Self> {
        let name = name.trim();
        let unit = unit.trim();

        if name.is_empty() {
            return Err(DoorprizeError::EmptyField("name"));
        }
        if unit.is_empty() {
            return Err(DoorprizeError::EmptyField("unit"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
        })
    }

    /// Case-insensitive `(name, unit)` identity used by the registration check.
    pub fn same_entrant(&self, name: &str, unit: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
            && self.unit.trim().to_lowercase() == unit.trim().to_lowercase()
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_assigns_unique_ids() {
        let a = Participant::new("  Jane Smith ", " HR ").unwrap();
        let b = Participant::new("Jane Smith", "HR").unwrap();

        assert_eq!(a.name, "Jane Smith");
        assert_eq!(a.unit, "HR");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        assert!(matches!(
            Participant::new("  ", "IT"),
            Err(DoorprizeError::EmptyField("name"))
        ));
        assert!(matches!(
            Participant::new("John", ""),
            Err(DoorprizeError::EmptyField("unit"))
        ));
    }

    #[test]
    fn test_same_entrant_ignores_case() {
        let p = Participant::new("John Doe", "IT").unwrap();
        assert!(p.same_entrant("john doe", "it"));
        assert!(!p.same_entrant("John Doe", "HR"));
        assert_eq!(p.to_string(), "John Doe (IT)");
    }
}
