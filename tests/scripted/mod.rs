//! Scripted sensor models for testing the filter independently of a real sensor.

#![allow(dead_code)]

use std::cell::Cell;

use rand_core::RngCore;

use birdseye::models::{SensorModel, State};

/// A sensor which reproduces the true state and gives every hypothesis the same likelihood.
pub struct ConstantSensor {
    pub likelihood: f64,
}

impl SensorModel for ConstantSensor {
    type Observation = f64;

    fn near_state(&self, state: &State, _rng: &mut dyn RngCore) -> State {
        *state
    }

    fn observation(&self, state: &State, _rng: &mut dyn RngCore) -> f64 {
        state.bearing
    }

    fn weight(&self, _observation: &f64, _state: &State) -> f64 {
        self.likelihood
    }
}

/// A sensor which scores hypotheses by their range, the observation is ignored.
pub struct RangeSensor;

impl SensorModel for RangeSensor {
    type Observation = f64;

    fn near_state(&self, state: &State, _rng: &mut dyn RngCore) -> State {
        *state
    }

    fn observation(&self, state: &State, _rng: &mut dyn RngCore) -> f64 {
        state.range
    }

    fn weight(&self, _observation: &f64, state: &State) -> f64 {
        state.range
    }
}

/// A sensor which rejects every hypothesis for its first `rejections` weight calls, then accepts all.
pub struct RejectingSensor {
    pub rejections: Cell<usize>,
}

impl RejectingSensor {
    pub fn new(rejections: usize) -> RejectingSensor {
        RejectingSensor {
            rejections: Cell::new(rejections),
        }
    }
}

impl SensorModel for RejectingSensor {
    type Observation = f64;

    fn near_state(&self, state: &State, _rng: &mut dyn RngCore) -> State {
        *state
    }

    fn observation(&self, state: &State, _rng: &mut dyn RngCore) -> f64 {
        state.bearing
    }

    fn weight(&self, _observation: &f64, _state: &State) -> f64 {
        match self.rejections.get() {
            0 => 1.,
            n => {
                self.rejections.set(n - 1);
                0.
            }
        }
    }
}
