//! At-a-glance rollups over the loaded record set.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::IntakeRecord;

/// Bucket for records whose phase is missing or blank.
pub const UNKNOWN_PHASE: &str = "Unknown";

/// `top_category` when there are no records at all.
pub const NO_CATEGORY: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseCount {
    pub phase: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub top_category: String,
    /// Every phase seen, in first-encountered order.
    pub phase_counts: Vec<PhaseCount>,
    /// Records carrying a denormalized sign-off.
    pub signed_off: usize,
}

/// Summarize `records`.
///
/// Ties for the most frequent phase go to the phase encountered first, so
/// callers should pass records in a fixed order (newest first, as the
/// gateway returns them).
#[must_use]
pub fn summarize(records: &[IntakeRecord]) -> Summary {
    let mut phase_counts: Vec<PhaseCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let phase = record
            .phase
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN_PHASE);

        if let Some(&slot) = index.get(phase) {
            phase_counts[slot].count += 1;
        } else {
            index.insert(phase.to_string(), phase_counts.len());
            phase_counts.push(PhaseCount {
                phase: phase.to_string(),
                count: 1,
            });
        }
    }

    // Strictly-greater comparison keeps the earliest phase on ties.
    let mut top: Option<&PhaseCount> = None;
    for candidate in &phase_counts {
        if top.is_none_or(|best| candidate.count > best.count) {
            top = Some(candidate);
        }
    }
    let top_category = top.map_or_else(|| NO_CATEGORY.to_string(), |pc| pc.phase.clone());

    Summary {
        total: records.len(),
        top_category,
        signed_off: records.iter().filter(|r| r.is_signed_off()).count(),
        phase_counts,
    }
}
