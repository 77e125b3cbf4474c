//! Breadth-first distance searches over the two graphs derived from the dataset.
//!
//! Hop distance walks the station adjacency graph through `nearStation` edges.
//! Transfer distance walks the bipartite station/line graph: a layer is a set
//! of lines, and the next layer is every unvisited line that shares a station
//! with the current one.
//!
//! Both searches return a [`DistanceClue`] carrying the distance together with
//! the stations found at exactly that distance. Neither touches game state; the
//! controller decides how a clue narrows the candidate pool.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::index::{DatasetIndex, LineId};
use crate::station::{Station, StationId};

/// Result of a shortest-path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Distance {
    Finite(u32),
    /// No path exists in the dataset.
    Unreachable,
}

impl Distance {
    #[must_use]
    pub const fn finite(self) -> Option<u32> {
        match self {
            Self::Finite(value) => Some(value),
            Self::Unreachable => None,
        }
    }

    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl From<Option<u32>> for Distance {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::Unreachable, Self::Finite)
    }
}

impl From<Distance> for Option<u32> {
    fn from(value: Distance) -> Self {
        value.finite()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value}"),
            Self::Unreachable => f.write_str("∞"),
        }
    }
}

/// A distance plus the stations consistent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceClue {
    pub distance: Distance,
    /// Stations at exactly `distance` from the guess. `None` when unreachable.
    pub matches: Option<HashSet<StationId>>,
}

impl DistanceClue {
    fn reached(distance: u32, matches: HashSet<StationId>) -> Self {
        Self {
            distance: Distance::Finite(distance),
            matches: Some(matches),
        }
    }

    const fn unreachable() -> Self {
        Self {
            distance: Distance::Unreachable,
            matches: None,
        }
    }
}

/// Fewest adjacency edges from `guess` to `target`.
///
/// Nodes are marked visited when enqueued, so the returned matches hold only
/// stations at exactly the reported hop count. Adjacency ids missing from the
/// dataset are carried in the frontier but never expanded.
#[must_use]
pub fn min_stations(index: &DatasetIndex, target: &Station, guess: &Station) -> DistanceClue {
    let mut visited: HashSet<StationId> = HashSet::from([guess.id]);
    let mut frontier: Vec<StationId> = vec![guess.id];
    let mut hops: u32 = 0;

    while !frontier.contains(&target.id) {
        let mut next = Vec::new();
        for id in &frontier {
            let Some(station) = index.get(*id) else {
                continue;
            };
            for &near in &station.near_station {
                if visited.insert(near) {
                    next.push(near);
                }
            }
        }
        if next.is_empty() {
            log::warn!(
                "station {} is unreachable from {} by adjacency",
                target.name,
                guess.name
            );
            return DistanceClue::unreachable();
        }
        hops = hops.saturating_add(1);
        frontier = next;
    }

    DistanceClue::reached(hops, frontier.into_iter().collect())
}

/// Fewest line changes needed to reach `target` starting on any line of `guess`.
///
/// Zero transfers means a line of the guess already serves the target. The
/// guess itself counts as reachable at zero transfers even when it lists no
/// lines. Matches exclude stations already reachable with fewer transfers.
#[must_use]
pub fn min_transfer(index: &DatasetIndex, target: &Station, guess: &Station) -> DistanceClue {
    let mut visited_lines: HashSet<LineId> = HashSet::new();
    let mut passed_stations: HashSet<StationId> = HashSet::new();
    let mut frontier: BTreeSet<LineId> = index.lines_of(guess.id).iter().copied().collect();
    let mut transfers: u32 = 0;
    let mut reachable = roster_union(index, &frontier);
    reachable.insert(guess.id);

    loop {
        if reachable.contains(&target.id) {
            let matches = reachable
                .into_iter()
                .filter(|id| !passed_stations.contains(id))
                .collect();
            return DistanceClue::reached(transfers, matches);
        }

        transfers = transfers.saturating_add(1);
        visited_lines.extend(frontier.iter().copied());

        let mut next = BTreeSet::new();
        for &station in &reachable {
            for &line in index.lines_of(station) {
                if !visited_lines.contains(&line) {
                    next.insert(line);
                }
            }
        }
        passed_stations.extend(reachable);

        if next.is_empty() {
            log::warn!(
                "station {} is unreachable from {} by line transfers",
                target.name,
                guess.name
            );
            return DistanceClue::unreachable();
        }
        reachable = roster_union(index, &next);
        frontier = next;
    }
}

fn roster_union(index: &DatasetIndex, lines: &BTreeSet<LineId>) -> HashSet<StationId> {
    lines
        .iter()
        .filter_map(|&line| index.line(line))
        .flat_map(|line| line.roster.iter().copied())
        .collect()
}
