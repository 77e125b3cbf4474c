use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::attributes::{AttributeDifference, attribute_difference};
use crate::candidates::CandidateTracker;
use crate::config::EngineConfig;
use crate::distance::{Distance, min_stations, min_transfer};
use crate::index::{DatasetIndex, IndexError};
use crate::station::{Station, StationId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Everything the presentation layer needs to render one guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResult<'a> {
    pub correct: bool,
    #[serde(rename = "stationInfo")]
    pub station: &'a Station,
    pub min_stations: Distance,
    pub min_transfer: Distance,
    #[serde(flatten)]
    pub attributes: AttributeDifference,
    /// Candidates still consistent with every clue, in dataset order.
    pub remain: Vec<&'a Station>,
}

/// One game session against a shared station index.
///
/// Sessions are not thread-safe; callers serialize guesses per session.
#[derive(Debug, Clone)]
pub struct StationGame<R = ChaCha20Rng> {
    index: Arc<DatasetIndex>,
    config: EngineConfig,
    rng: R,
    target: Station,
    candidates: CandidateTracker,
    guesses: u32,
    solved: bool,
}

impl StationGame<ChaCha20Rng> {
    /// Session whose targets are drawn from a `ChaCha20Rng` seeded with `seed`.
    #[must_use]
    pub fn from_seed(index: Arc<DatasetIndex>, config: EngineConfig, seed: u64) -> Self {
        Self::new(index, config, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Session seeded from `config.seed`, or from entropy when unset.
    #[must_use]
    pub fn from_config(index: Arc<DatasetIndex>, config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!("seeding session with {seed}");
        Self::from_seed(index, config, seed)
    }
}

impl<R: RngCore> StationGame<R> {
    /// Start a session with a freshly drawn target.
    #[must_use]
    pub fn new(index: Arc<DatasetIndex>, config: EngineConfig, mut rng: R) -> Self {
        let target = pick_target(&index, &mut rng);
        let candidates = CandidateTracker::new(index.stations().iter().map(|s| s.id).collect());
        log::info!("new game over {} stations", index.len());
        Self {
            index,
            config,
            rng,
            target,
            candidates,
            guesses: 0,
            solved: false,
        }
    }

    /// Score a guess against the target and narrow the candidate pool.
    ///
    /// The pool is intersected with the hop clue, then the transfer clue, then
    /// restricted to stations whose attributes relative to the guess match the
    /// target's.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a station in the dataset. The session
    /// is left untouched in that case.
    pub fn evaluate_guess(&mut self, name: &str) -> Result<GuessResult<'_>, GameError> {
        let index: &DatasetIndex = &self.index;
        let guess = index.station_by_name(name)?;
        let target = &self.target;
        let policy = self.config.disconnection;
        let before = self.candidates.len();

        let hops = min_stations(index, target, guess);
        let transfers = min_transfer(index, target, guess);
        let attributes = attribute_difference(target, guess);

        self.candidates.apply_clue(&hops, policy);
        self.candidates.apply_clue(&transfers, policy);
        self.candidates.retain(|id| {
            index
                .get(*id)
                .is_some_and(|candidate| attribute_difference(candidate, guess) == attributes)
        });

        let correct = guess.id == target.id;
        self.guesses = self.guesses.saturating_add(1);
        self.solved |= correct;

        log::debug!(
            "guess {} ({}): hops {}, transfers {}, {:?}; candidates {} -> {}",
            self.guesses,
            guess.name,
            hops.distance,
            transfers.distance,
            attributes,
            before,
            self.candidates.len()
        );

        let remain = self
            .candidates
            .remaining()
            .iter()
            .filter_map(|id| index.get(*id))
            .collect();

        Ok(GuessResult {
            correct,
            station: guess,
            min_stations: hops.distance,
            min_transfer: transfers.distance,
            attributes,
            remain,
        })
    }

    /// Reset the candidate pool and draw a new target.
    pub fn new_game(&mut self) {
        self.target = pick_target(&self.index, &mut self.rng);
        self.candidates.reset();
        self.guesses = 0;
        self.solved = false;
        log::info!("new game over {} stations", self.index.len());
    }

    /// Name of the current target. The session continues.
    #[must_use]
    pub fn reveal_answer(&self) -> &str {
        &self.target.name
    }

    /// Force the target to a named station without resetting candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a station in the dataset.
    pub fn override_answer(&mut self, name: &str) -> Result<(), GameError> {
        self.target = self.index.station_by_name(name)?.clone();
        log::debug!("target overridden to {}", self.target.name);
        Ok(())
    }

    #[must_use]
    pub fn remaining(&self) -> &[StationId] {
        self.candidates.remaining()
    }

    /// Remaining candidates resolved to their station records.
    #[must_use]
    pub fn remaining_stations(&self) -> Vec<&Station> {
        self.candidates
            .remaining()
            .iter()
            .filter_map(|id| self.index.get(*id))
            .collect()
    }

    #[must_use]
    pub const fn candidates(&self) -> &CandidateTracker {
        &self.candidates
    }

    #[must_use]
    pub const fn guesses(&self) -> u32 {
        self.guesses
    }

    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solved
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

fn pick_target<R: RngCore>(index: &DatasetIndex, rng: &mut R) -> Station {
    let stations = index.stations();
    stations[rng.gen_range(0..stations.len())].clone()
}
