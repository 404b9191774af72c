//! Bulk import of participants from the two-column CSV template.
//!
//! Parsing and merge-vs-replace planning are pure; the caller hands the
//! resulting list to [`ParticipantStore::replace`](crate::storage::ParticipantStore::replace).

use crate::error::{DoorprizeError, Result};
use crate::types::Participant;
use serde::{Deserialize, Serialize};

/// Template offered to organisers before they fill in the roster.
pub const CSV_TEMPLATE: &str = "nama,unit\nJohn Doe,IT\nJane Smith,HR\n";

const ACCEPTED_HEADERS: [&str; 2] = ["nama,unit", "name,unit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportMode {
    /// Append imported rows after the current roster.
    Merge,
    /// Discard the current roster.
    Replace,
}

#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub mode: ImportMode,
    pub imported: usize,
    pub participants: Vec<Participant>,
}

/// Parses CSV text into participants with fresh ids.
///
/// Any incomplete row rejects the whole file.
pub fn parse_csv(text: &str) -> Result<Vec<Participant>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| DoorprizeError::InvalidCsvHeader {
            found: String::new(),
        })?;

    let normalized: String = split_fields(header)
        .unwrap_or_default()
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>()
        .join(",");
    if !ACCEPTED_HEADERS.contains(&normalized.as_str()) {
        return Err(DoorprizeError::InvalidCsvHeader {
            found: header.trim().to_string(),
        });
    }

    let mut participants = Vec::new();
    for (line, row) in lines {
        let fields = split_fields(row).ok_or(DoorprizeError::MalformedRow { line })?;

        // columns past the second are ignored
        let name = fields.first().map(String::as_str).unwrap_or_default();
        let unit = fields.get(1).map(String::as_str).unwrap_or_default();
        if name.is_empty() || unit.is_empty() {
            return Err(DoorprizeError::IncompleteRow { line });
        }

        participants.push(Participant::new(name, unit)?);
    }

    tracing::debug!("Parsed {} participants from CSV", participants.len());
    Ok(participants)
}

/// Splits one CSV record on commas outside double quotes, trimming each
/// field. `""` inside a quoted field is a literal quote. Returns `None` when
/// a quote is left open.
fn split_fields(row: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }

    if quoted {
        return None;
    }
    fields.push(field.trim().to_string());
    Some(fields)
}

/// Computes the full roster that results from importing `incoming`.
///
/// Imports never de-duplicate; that rule only applies to single registrations.
pub fn plan_import(existing: &[Participant], incoming: Vec<Participant>, mode: ImportMode) -> ImportPlan {
    let imported = incoming.len();
    let participants = match mode {
        ImportMode::Merge => existing.iter().cloned().chain(incoming).collect(),
        ImportMode::Replace => incoming,
    };

    ImportPlan {
        mode,
        imported,
        participants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let participants = parse_csv(CSV_TEMPLATE).unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].name, "John Doe");
        assert_eq!(participants[1].unit, "HR");
        assert_ne!(participants[0].id, participants[1].id);
    }

    #[test]
    fn test_parse_quotes_crlf_and_blank_lines() {
        let text = "Nama,Unit\r\n\"Siti Aminah\",\"Finance\"\r\n\r\n  Budi , Ops \r\n";
        let participants = parse_csv(text).unwrap();

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].name, "Siti Aminah");
        assert_eq!(participants[0].unit, "Finance");
        assert_eq!(participants[1].name, "Budi");
        assert_eq!(participants[1].unit, "Ops");
    }

    #[test]
    fn test_english_header_is_accepted() {
        assert_eq!(parse_csv("name,unit\nA,B\n").unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = parse_csv("full_name,department\nA,B\n").unwrap_err();
        assert!(matches!(err, DoorprizeError::InvalidCsvHeader { .. }));

        assert!(matches!(
            parse_csv("").unwrap_err(),
            DoorprizeError::InvalidCsvHeader { .. }
        ));
    }

    #[test]
    fn test_incomplete_row_rejects_whole_file() {
        let err = parse_csv("nama,unit\nJohn Doe,IT\nJane Smith,\n").unwrap_err();
        assert!(matches!(err, DoorprizeError::IncompleteRow { line: 3 }));

        let err = parse_csv("nama,unit\nLonely\n").unwrap_err();
        assert!(matches!(err, DoorprizeError::IncompleteRow { line: 2 }));
    }

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let text = "nama,unit\n\"Doe, John\",IT\n\"Ali \"\"Bo\"\" Reza\",\"R&D, Lab\"\n";
        let participants = parse_csv(text).unwrap();

        assert_eq!(participants[0].name, "Doe, John");
        assert_eq!(participants[0].unit, "IT");
        assert_eq!(participants[1].name, "Ali \"Bo\" Reza");
        assert_eq!(participants[1].unit, "R&D, Lab");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let participants = parse_csv("nama,unit\nA,IT,x,y\n").unwrap();
        assert_eq!(participants[0].name, "A");
        assert_eq!(participants[0].unit, "IT");
    }

    #[test]
    fn test_unbalanced_quote_rejects_whole_file() {
        let err = parse_csv("nama,unit\nJohn Doe,IT\n\"Doe, John,IT\n").unwrap_err();
        assert!(matches!(err, DoorprizeError::MalformedRow { line: 3 }));
    }

    #[test]
    fn test_plan_merge_and_replace() {
        let existing = parse_csv(CSV_TEMPLATE).unwrap();
        let incoming = parse_csv("nama,unit\nJohn Doe,IT\n").unwrap();

        let merged = plan_import(&existing, incoming.clone(), ImportMode::Merge);
        assert_eq!(merged.imported, 1);
        assert_eq!(merged.participants.len(), 3);
        assert_eq!(merged.participants[..2], existing[..]);

        let replaced = plan_import(&existing, incoming.clone(), ImportMode::Replace);
        assert_eq!(replaced.participants, incoming);
    }
}
