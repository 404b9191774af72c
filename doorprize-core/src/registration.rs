use crate::types::Participant;

/// Outcome of a single-record registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationDecision {
    Accept,
    RejectDuplicate,
}

/// Decides whether `(name, unit)` may be registered next to `existing`.
///
/// Matching is case-insensitive and ignores surrounding whitespace, on both
/// fields together. Bulk imports bypass this check.
pub fn check_registration(existing: &[Participant], name: &str, unit: &str) -> RegistrationDecision {
    if existing.iter().any(|p| p.same_entrant(name, unit)) {
        RegistrationDecision::RejectDuplicate
    } else {
        RegistrationDecision::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("John Doe", "IT").unwrap(),
            Participant::new("Jane Smith", "HR").unwrap(),
        ]
    }

    #[test]
    fn test_rejects_case_insensitive_duplicate() {
        assert_eq!(
            check_registration(&roster(), "JOHN DOE", " it "),
            RegistrationDecision::RejectDuplicate
        );
    }

    #[test]
    fn test_same_name_in_other_unit_is_accepted() {
        assert_eq!(
            check_registration(&roster(), "John Doe", "HR"),
            RegistrationDecision::Accept
        );
        assert_eq!(
            check_registration(&[], "John Doe", "IT"),
            RegistrationDecision::Accept
        );
    }
}
