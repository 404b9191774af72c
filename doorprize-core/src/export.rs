use crate::types::Participant;

/// Numbered winners list, one `"{rank}. {name} ({unit})"` line per winner.
pub fn format_winners(winners: &[Participant]) -> String {
    winners
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{}. {} ({})", i + 1, w.name, w.unit))
        .collect::<Vec<_>>()
        .join("\n")
}
