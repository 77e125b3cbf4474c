//! Read-only lookups built once from the station dataset.
//!
//! The index owns the station records and exposes them by name, by dataset id,
//! and by line. Lines are not stored in the dataset directly; they are derived
//! from each station's `line` memberships and given dense [`LineId`]s in
//! first-seen order.

use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use thiserror::Error;

use crate::station::{Station, StationData, StationId};

/// Dense identifier of a derived line, valid only for the index that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LineId(u32);

impl LineId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Line ids a single station belongs to.
pub type LineSet = SmallVec<[LineId; 4]>;

/// A derived line and its station roster in dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub roster: Vec<StationId>,
}

/// Lookup failures and dataset shapes the index cannot represent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("station dataset is empty")]
    EmptyDataset,
    #[error("station name {0:?} appears more than once")]
    DuplicateName(String),
    #[error("station id {0} appears more than once")]
    DuplicateId(StationId),
    #[error("unknown station {0:?}")]
    UnknownStation(String),
    #[error("unknown station id {0}")]
    UnknownStationId(StationId),
    #[error("unknown line {0:?}")]
    UnknownLine(String),
}

#[derive(Debug, Clone)]
pub struct DatasetIndex {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<StationId, usize>,
    lines: Vec<Line>,
    line_by_name: HashMap<String, LineId>,
    station_lines: Vec<LineSet>,
}

impl DatasetIndex {
    /// Build every lookup in a single pass over the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty or if a name or id is
    /// repeated, since the name and id views must be bijective.
    pub fn new(data: StationData) -> Result<Self, IndexError> {
        if data.is_empty() {
            return Err(IndexError::EmptyDataset);
        }

        let stations = data.stations;
        let mut by_name = HashMap::with_capacity(stations.len());
        let mut by_id = HashMap::with_capacity(stations.len());
        let mut lines: Vec<Line> = Vec::new();
        let mut line_by_name: HashMap<String, LineId> = HashMap::new();
        let mut station_lines = Vec::with_capacity(stations.len());

        for (pos, station) in stations.iter().enumerate() {
            match by_name.entry(station.name.clone()) {
                Entry::Occupied(_) => return Err(IndexError::DuplicateName(station.name.clone())),
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }
            match by_id.entry(station.id) {
                Entry::Occupied(_) => return Err(IndexError::DuplicateId(station.id)),
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }

            let mut memberships = LineSet::new();
            for line_name in &station.line {
                let line_id = *line_by_name.entry(line_name.clone()).or_insert_with(|| {
                    let id = LineId(u32::try_from(lines.len()).unwrap_or(u32::MAX));
                    lines.push(Line {
                        id,
                        name: line_name.clone(),
                        roster: Vec::new(),
                    });
                    id
                });
                if memberships.contains(&line_id) {
                    continue;
                }
                memberships.push(line_id);
                lines[line_id.index()].roster.push(station.id);
            }
            station_lines.push(memberships);
        }

        log::debug!(
            "indexed {} stations across {} lines",
            stations.len(),
            lines.len()
        );

        Ok(Self {
            stations,
            by_name,
            by_id,
            lines,
            line_by_name,
            station_lines,
        })
    }

    /// All stations in dataset order.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`IndexError::UnknownStation`] when no station has this name.
    pub fn station_by_name(&self, name: &str) -> Result<&Station, IndexError> {
        self.by_name
            .get(name)
            .map(|&pos| &self.stations[pos])
            .ok_or_else(|| IndexError::UnknownStation(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`IndexError::UnknownStationId`] when no station has this id.
    pub fn station_by_id(&self, id: StationId) -> Result<&Station, IndexError> {
        self.get(id).ok_or(IndexError::UnknownStationId(id))
    }

    /// Non-failing id lookup, used where dangling ids are simply skipped.
    #[must_use]
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.by_id.get(&id).map(|&pos| &self.stations[pos])
    }

    #[must_use]
    pub fn contains_id(&self, id: StationId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// # Errors
    ///
    /// Returns [`IndexError::UnknownLine`] when no station lists this line.
    pub fn line_by_name(&self, name: &str) -> Result<&Line, IndexError> {
        self.line_by_name
            .get(name)
            .map(|id| &self.lines[id.index()])
            .ok_or_else(|| IndexError::UnknownLine(name.to_string()))
    }

    /// Line by dense id. Ids minted by another index may be out of range.
    #[must_use]
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.index())
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line ids of a station; empty for unknown ids.
    #[must_use]
    pub fn lines_of(&self, id: StationId) -> &[LineId] {
        match self.by_id.get(&id) {
            Some(&pos) => self.station_lines[pos].as_slice(),
            None => &[],
        }
    }

    /// Station names in dataset order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|s| s.name.as_str())
    }

    /// Names starting with `prefix` (case-insensitive), in dataset order.
    #[must_use]
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<&str> {
        let needle = prefix.trim().to_lowercase();
        self.names()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .take(limit)
            .collect()
    }
}
