//! Errors of the tracking filter and its episodes.

use thiserror::Error;

/// Errors that can occur while configuring, filtering or stepping an episode.
#[derive(Debug, Error)]
pub enum FilterError {
    /// An action index outside the catalog.
    #[error("invalid action index {index}, the catalog has {len} actions")]
    InvalidAction { index: usize, len: usize },

    /// A maneuver which is not part of the catalog.
    #[error("action (turn {turn}, speed {speed}) is not in the catalog")]
    UnknownAction { turn: i32, speed: i32 },

    /// Invalid configuration, such as a zero particle count.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation needing samples was given none.
    #[error("empty sample population")]
    EmptyPopulation,

    /// The weights do not pair one to one with the samples.
    #[error("{weights} weights for {samples} samples")]
    LengthMismatch { samples: usize, weights: usize },

    /// A likelihood returned a negative weight.
    #[error("negative weight {weight} for sample {index}")]
    NegativeWeight { index: usize, weight: f64 },

    /// Weights sum to zero or are not finite. Every hypothesis was rejected by the sensor model.
    #[error("degenerate weights, sum of likelihoods is {sum}")]
    DegenerateWeights { sum: f64 },

    /// The episode was stepped before it was reset.
    #[error("episode not initialised, reset before step")]
    NotInitialized,

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FilterError {
    /// True for a numerical failure of the weights, as opposed to a usage or configuration error.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, FilterError::DegenerateWeights { .. })
    }
}
