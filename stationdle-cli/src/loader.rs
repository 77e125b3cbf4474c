use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stationdle_game::{DatasetLoader, StationData};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the station dataset from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetLoader for FileLoader {
    type Error = LoadError;

    fn load_stations(&self) -> Result<StationData, Self::Error> {
        let json = fs::read_to_string(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        let data = StationData::from_json(&json).map_err(|source| LoadError::Parse {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("loaded {} stations from {}", data.len(), self.path.display());
        Ok(data)
    }
}
