use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::distance::DistanceClue;
use crate::station::StationId;

/// What an unreachable distance clue does to the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectionPolicy {
    /// Treat a missing path as ruling out every candidate.
    #[default]
    ClearCandidates,
    /// Leave the pool untouched for that clue.
    SkipClue,
}

/// Stations still consistent with every clue seen in the current session.
///
/// The pool keeps dataset order and only ever shrinks until [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTracker {
    all: Vec<StationId>,
    remain: Vec<StationId>,
}

impl CandidateTracker {
    #[must_use]
    pub fn new(all: Vec<StationId>) -> Self {
        Self {
            remain: all.clone(),
            all,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> &[StationId] {
        &self.remain
    }

    #[must_use]
    pub fn contains(&self, id: StationId) -> bool {
        self.remain.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.remain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remain.is_empty()
    }

    /// Keep only candidates in `keep`.
    pub fn narrow_to(&mut self, keep: &HashSet<StationId>) {
        self.remain.retain(|id| keep.contains(id));
    }

    pub fn retain(&mut self, keep: impl FnMut(&StationId) -> bool) {
        self.remain.retain(keep);
    }

    pub fn clear(&mut self) {
        self.remain.clear();
    }

    /// Restore the full dataset.
    pub fn reset(&mut self) {
        self.remain.clone_from(&self.all);
    }

    /// Narrow by a distance clue, applying `policy` when no path was found.
    pub fn apply_clue(&mut self, clue: &DistanceClue, policy: DisconnectionPolicy) {
        match (&clue.matches, policy) {
            (Some(matches), _) => self.narrow_to(matches),
            (None, DisconnectionPolicy::ClearCandidates) => self.clear(),
            (None, DisconnectionPolicy::SkipClue) => {}
        }
    }
}
