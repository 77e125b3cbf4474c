use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Identifier of a station as it appears in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Line memberships of a single station. Most stations sit on one or two lines.
pub type LineNames = SmallVec<[String; 4]>;

/// A station record from the transit dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Adjacent stations, in dataset order. Not assumed symmetric.
    #[serde(default)]
    pub near_station: Vec<StationId>,
    #[serde(default)]
    pub district: String,
    pub year: i32,
    #[serde(default)]
    pub line: LineNames,
}

impl Station {
    /// Whether this station belongs to the named line.
    #[must_use]
    pub fn is_on_line(&self, line: &str) -> bool {
        self.line.iter().any(|l| l == line)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStationData {
    List(Vec<Station>),
    Wrapped { stations: Vec<Station> },
}

/// Ordered station list supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "RawStationData")]
pub struct StationData {
    pub stations: Vec<Station>,
}

impl From<RawStationData> for StationData {
    fn from(raw: RawStationData) -> Self {
        match raw {
            RawStationData::List(stations) | RawStationData::Wrapped { stations } => {
                Self { stations }
            }
        }
    }
}

impl StationData {
    /// Create empty station data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            stations: Vec::new(),
        }
    }

    /// Load station data from a JSON string.
    ///
    /// Accepts either a bare array of stations or an object with a
    /// `stations` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into station records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create station data from pre-parsed stations
    #[must_use]
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
