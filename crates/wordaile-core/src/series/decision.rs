//! Series-end decision.

use crate::protocol::ParticipantId;
use std::collections::BTreeMap;

/// Outcome of evaluating win counts after a round
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeriesDecision {
    /// A single leader at or above the threshold
    Winner { participant: ParticipantId, wins: u32 },
    /// Several leaders share the top count at or above the threshold.
    /// Play continues until they separate.
    Tied { leaders: Vec<ParticipantId>, wins: u32 },
    /// Nobody has reached the threshold yet
    Continue,
}

impl SeriesDecision {
    pub fn ends_series(&self) -> bool {
        matches!(self, SeriesDecision::Winner { .. })
    }
}

/// Decide whether the series is over.
///
/// Among participants with at least `wins_needed` wins, the one holding the
/// highest count wins outright. A tie at that count never ends the series.
pub fn decide_series(
    win_counts: &BTreeMap<ParticipantId, u32>,
    wins_needed: u32,
) -> SeriesDecision {
    let qualified: Vec<(&ParticipantId, u32)> = win_counts
        .iter()
        .filter(|(_, wins)| **wins >= wins_needed)
        .map(|(id, &wins)| (id, wins))
        .collect();

    let Some(top) = qualified.iter().map(|(_, wins)| *wins).max() else {
        return SeriesDecision::Continue;
    };

    let mut leaders: Vec<ParticipantId> = qualified
        .into_iter()
        .filter(|(_, wins)| *wins == top)
        .map(|(id, _)| id.clone())
        .collect();

    if leaders.len() == 1 {
        SeriesDecision::Winner {
            participant: leaders.remove(0),
            wins: top,
        }
    } else {
        SeriesDecision::Tied { leaders, wins: top }
    }
}
