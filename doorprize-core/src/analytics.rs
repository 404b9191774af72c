use crate::types::Participant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStat {
    pub unit: String,
    pub count: usize,
}

/// Participants per unit, largest first; ties ordered by unit name.
pub fn unit_stats(participants: &[Participant]) -> Vec<UnitStat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in participants {
        *counts.entry(p.unit.as_str()).or_default() += 1;
    }

    let mut stats: Vec<UnitStat> = counts
        .into_iter()
        .map(|(unit, count)| UnitStat {
            unit: unit.to_string(),
            count,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.unit.cmp(&b.unit)));
    stats
}
