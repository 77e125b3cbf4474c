use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidates::DisconnectionPolicy;

/// Errors raised when engine configuration cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub disconnection: DisconnectionPolicy,
    /// Fixed seed for target selection; sessions draw from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an engine config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn with_disconnection(mut self, policy: DisconnectionPolicy) -> Self {
        self.disconnection = policy;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
