//! Episodes of the tracking problem.
//!
//! [`RfEnv`] holds the hidden true state of the emitter and the observer's belief of it. Each step the chosen maneuver
//! advances the true state, the sensor observes it and the belief is updated with the maneuver and observation.
//! The caller only sees the rasterised belief, the reward and bookkeeping.
//!
//! Every episode owns its state and random source, independent episodes can run side by side.

use rand::rngs::StdRng;
use rand::Rng;
use rand_core::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::actions::ActionCatalog;
use crate::config::EnvConfig;
use crate::dynamics::RelativeMotion;
use crate::error::FilterError;
use crate::estimators::sir::SampleState;
use crate::models::{Control, Estimator, SensorModel, State};
use crate::raster::{rasterize, BeliefRaster};

/// Bookkeeping of a step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepInfo {
    /// Steps taken in the episode
    pub episode_len: usize,
    /// Reward of the last step
    pub episode_reward: f64,
}

/// Result of a step.
#[derive(Clone, Debug)]
pub struct Step {
    pub observation: BeliefRaster,
    pub reward: f64,
    /// Episode termination is left to the caller, never set
    pub done: bool,
    pub info: StepInfo,
}

/// The running episode.
struct Episode {
    true_state: State,
    belief: SampleState,
    iters: usize,
}

/// Tracking environment with a sensor model `S`.
pub struct RfEnv<S: SensorModel> {
    sensor: S,
    config: EnvConfig,
    catalog: ActionCatalog,
    dynamics: RelativeMotion,
    rng: StdRng,
    episode: Option<Episode>,
}

impl<S: SensorModel> RfEnv<S> {
    /// Creates an uninitialised environment, [`reset`](RfEnv::reset) starts an episode.
    pub fn new(sensor: S, config: EnvConfig) -> Result<RfEnv<S>, FilterError> {
        config.validate()?;
        let catalog = config.catalog()?;
        let dynamics = config.dynamics();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(RfEnv {
            sensor,
            config,
            catalog,
            dynamics,
            rng,
            episode: None,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn action_to_index(&self, a: &Control) -> Result<usize, FilterError> {
        self.catalog.action_to_index(a)
    }

    pub fn index_to_action(&self, index: usize) -> Result<Control, FilterError> {
        self.catalog.index_to_action(index)
    }

    /// Start a new episode with a random true state.
    ///
    /// The emitter starts at an integer range and bearing with a course which is a multiple of 30 degrees.
    pub fn reset(&mut self) -> Result<BeliefRaster, FilterError> {
        let [lo, hi] = self.config.initial_range;
        let true_state = State {
            range: f64::from(self.rng.gen_range(lo..=hi)),
            bearing: f64::from(self.rng.gen_range(0u32..360)),
            relative_course: f64::from(self.rng.gen_range(0u32..12) * 30),
            own_speed: self.config.own_speed,
        };
        self.reset_with(true_state)
    }

    /// Start a new episode from a known true state.
    pub fn reset_with(&mut self, true_state: State) -> Result<BeliefRaster, FilterError> {
        let true_state = State::new(
            true_state.range,
            true_state.bearing,
            true_state.relative_course,
            true_state.own_speed,
        );
        let filter_rng = Box::new(StdRng::seed_from_u64(self.rng.gen()));
        let mut belief = SampleState::initialize(
            &true_state,
            &self.sensor,
            self.config.n_particles,
            filter_rng,
        )?;
        belief.resampler = self.config.resampler;
        belief.roughening = self.config.roughening;
        info!(?true_state, n = belief.len(), "episode reset");

        let observation = rasterize(&belief.s, self.config.grid_size)?;
        self.episode = Some(Episode {
            true_state,
            belief,
            iters: 0,
        });
        Ok(observation)
    }

    /// Take the maneuver with index `action`.
    ///
    /// A failed filter step ends the episode: further steps return `NotInitialized` until the next reset.
    pub fn step(&mut self, action: usize) -> Result<Step, FilterError> {
        let control = self.catalog.index_to_action(action)?;
        let episode = self.episode.as_mut().ok_or(FilterError::NotInitialized)?;

        let next_state = self.dynamics.advance(&episode.true_state, &control, &mut self.rng);
        let observation = self.sensor.observation(&next_state, &mut self.rng);

        let filtered = advance_belief(
            &mut episode.belief,
            &self.dynamics,
            &control,
            &observation,
            &self.sensor,
        );
        let ess = match filtered {
            Ok(ess) => ess,
            Err(e) => {
                warn!(error = %e, step = episode.iters + 1, "filter step failed, episode ended");
                self.episode = None;
                return Err(e);
            }
        };

        let reward = self.config.reward.reward(&next_state, action);
        episode.true_state = next_state;
        episode.iters += 1;
        debug!(
            step = episode.iters,
            action,
            reward,
            ess,
            range = next_state.range,
            "step"
        );

        let raster = rasterize(&episode.belief.s, self.config.grid_size)?;
        Ok(Step {
            observation: raster,
            reward,
            done: false,
            info: StepInfo {
                episode_len: episode.iters,
                episode_reward: reward,
            },
        })
    }

    /// The hidden true state, for evaluation.
    pub fn true_state(&self) -> Option<&State> {
        self.episode.as_ref().map(|e| &e.true_state)
    }

    pub fn belief(&self) -> Option<&SampleState> {
        self.episode.as_ref().map(|e| &e.belief)
    }

    /// Posterior mean of the belief.
    pub fn estimate(&self) -> Result<State, FilterError> {
        self.belief().ok_or(FilterError::NotInitialized)?.state()
    }

    /// Raster of the current belief.
    pub fn observation(&self) -> Result<BeliefRaster, FilterError> {
        let belief = self.belief().ok_or(FilterError::NotInitialized)?;
        rasterize(&belief.s, self.config.grid_size)
    }
}

/// Predict, update and resample the belief, returning the effective sample size before resampling.
fn advance_belief<S: SensorModel>(
    belief: &mut SampleState,
    dynamics: &RelativeMotion,
    control: &Control,
    observation: &S::Observation,
    sensor: &S,
) -> Result<f64, FilterError> {
    belief.predict(dynamics, control);
    belief.update(observation, sensor)?;
    let ess = belief.effective_sample_size();
    if ess < 1.5 {
        warn!(ess, "belief collapsed to a single sample");
    }
    belief.resample()?;
    Ok(ess)
}
