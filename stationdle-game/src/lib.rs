//! Stationdle Game Engine
//!
//! Platform-agnostic guess evaluation for the Stationdle deduction game: a
//! hidden station is drawn from a transit dataset and every guess is answered
//! with hop distance, transfer distance and attribute clues, while the pool of
//! stations consistent with all clues so far shrinks.
//! This crate has no UI or platform-specific dependencies.

pub mod attributes;
pub mod candidates;
pub mod config;
pub mod distance;
pub mod game;
pub mod index;
pub mod seed;
pub mod station;

use std::sync::Arc;

// Re-export commonly used types
pub use attributes::{AttributeDifference, LineOverlap, attribute_difference};
pub use candidates::{CandidateTracker, DisconnectionPolicy};
pub use config::{ConfigError, EngineConfig};
pub use distance::{Distance, DistanceClue, min_stations, min_transfer};
pub use game::{GameError, GuessResult, StationGame};
pub use index::{DatasetIndex, IndexError, Line, LineId};
pub use seed::{daily_seed, derive_seed};
pub use station::{Station, StationData, StationId};

/// Trait for abstracting dataset loading.
/// Platform-specific implementations should provide this
pub trait DatasetLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the ordered station list from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the station data cannot be loaded.
    fn load_stations(&self) -> Result<StationData, Self::Error>;
}

/// Errors raised while building an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError<E: std::error::Error + 'static> {
    #[error("failed to load stations: {0}")]
    Load(#[source] E),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Shared dataset index handing out independent game sessions.
#[derive(Debug, Clone)]
pub struct GameEngine {
    index: Arc<DatasetIndex>,
    config: EngineConfig,
}

impl GameEngine {
    /// Load and index the dataset once.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader fails or the dataset cannot be indexed.
    pub fn load<L: DatasetLoader>(
        loader: &L,
        config: EngineConfig,
    ) -> Result<Self, EngineError<L::Error>> {
        let data = loader.load_stations().map_err(EngineError::Load)?;
        let index = DatasetIndex::new(data)?;
        Ok(Self::from_index(Arc::new(index), config))
    }

    #[must_use]
    pub const fn from_index(index: Arc<DatasetIndex>, config: EngineConfig) -> Self {
        Self { index, config }
    }

    /// Session seeded from the engine config, or from entropy when unset.
    #[must_use]
    pub fn create_session(&self) -> StationGame {
        StationGame::from_config(Arc::clone(&self.index), self.config.clone())
    }

    /// Session with an explicit seed.
    #[must_use]
    pub fn create_seeded_session(&self, seed: u64) -> StationGame {
        StationGame::from_seed(Arc::clone(&self.index), self.config.clone(), seed)
    }

    /// Session for a daily puzzle; all sessions for the same day share a target.
    #[must_use]
    pub fn create_daily_session(&self, day: u32) -> StationGame {
        self.create_seeded_session(daily_seed(day))
    }

    #[must_use]
    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}
