//! Episode configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::ActionCatalog;
use crate::dynamics::RelativeMotion;
use crate::error::FilterError;
use crate::estimators::sir::ResamplerKind;
use crate::reward::RewardPolicy;

/// Configuration of an episode of the tracking problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Number of samples of the belief
    pub n_particles: usize,
    /// Width and height of the belief raster
    pub grid_size: usize,
    /// Probability the emitter holds its course each step
    pub p_hold: f64,
    /// Magnitude of an emitter course change (degrees)
    pub course_change: f64,
    /// Emitter speed
    pub target_speed: f64,
    /// Initial range of the emitter is an integer drawn from this closed interval
    pub initial_range: [u32; 2],
    /// Initial observer speed
    pub own_speed: f64,
    /// Observer turns of the action catalog (degrees)
    pub turns: Vec<i32>,
    /// Observer speed levels of the action catalog
    pub speeds: Vec<i32>,
    pub reward: RewardPolicy,
    pub resampler: ResamplerKind,
    /// Min/max roughening factor, none by default
    pub roughening: Option<f64>,
    /// Seed of the episode's random source, from entropy if none
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            n_particles: 500,
            grid_size: 100,
            p_hold: 0.9,
            course_change: 30.,
            target_speed: 1.,
            initial_range: [25, 100],
            own_speed: 1.,
            turns: vec![-30, 0, 30],
            speeds: vec![1, 2],
            reward: RewardPolicy::default(),
            resampler: ResamplerKind::default(),
            roughening: None,
            seed: None,
        }
    }
}

impl EnvConfig {
    /// Load and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<EnvConfig, FilterError> {
        let text = std::fs::read_to_string(path)?;
        let config: EnvConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        let invalid = |msg: &str| Err(FilterError::Configuration(msg.into()));
        if self.n_particles == 0 {
            return invalid("n_particles must be positive");
        }
        if self.grid_size == 0 {
            return invalid("grid_size must be positive");
        }
        if !(0. ..=1.).contains(&self.p_hold) {
            return invalid("p_hold must be a probability");
        }
        if self.initial_range[0] > self.initial_range[1] {
            return invalid("initial_range is inverted");
        }
        if let Some(k) = self.roughening {
            if !(k >= 0. && k.is_finite()) {
                return invalid("roughening must be a non-negative factor");
            }
        }
        self.catalog().map(|_| ())
    }

    pub fn catalog(&self) -> Result<ActionCatalog, FilterError> {
        ActionCatalog::new(&self.turns, &self.speeds)
    }

    pub fn dynamics(&self) -> RelativeMotion {
        RelativeMotion {
            target_speed: self.target_speed,
            p_hold: self.p_hold,
            course_change: self.course_change,
        }
    }
}
