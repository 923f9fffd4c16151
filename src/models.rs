//! Tracking models.
//!
//! State representations are modeled as structs.
//! The sensor and the estimation summary are defined as traits.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::geometry::normalize_deg;

/// Relative state of the emitter as seen from the observer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Radial distance from observer to emitter
    pub range: f64,
    /// Relative angle from observer to emitter, degrees in [0, 360)
    pub bearing: f64,
    /// Emitter heading relative to the observer's frame, degrees in [0, 360)
    pub relative_course: f64,
    /// Observer's current speed
    pub own_speed: f64,
}

impl State {
    /// Creates a State with its angles normalised.
    pub fn new(range: f64, bearing: f64, relative_course: f64, own_speed: f64) -> State {
        State {
            range,
            bearing: normalize_deg(bearing),
            relative_course: normalize_deg(relative_course),
            own_speed,
        }
    }

    /// True if both angles are in [0, 360).
    pub fn angles_normalized(&self) -> bool {
        (0. ..360.).contains(&self.bearing) && (0. ..360.).contains(&self.relative_course)
    }
}

/// An observer maneuver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Control {
    /// Change of observer heading in degrees, positive turns counter-clockwise (to port)
    pub turn: i32,
    /// Observer speed level after the maneuver
    pub speed: i32,
}

impl Control {
    pub fn new(turn: i32, speed: i32) -> Control {
        Control { turn, speed }
    }
}

/// A sensor model.
///
/// The filter core only depends on these capabilities of a sensor. Implementations are swappable strategies.
pub trait SensorModel {
    type Observation;

    /// One plausible initial sample near the true state.
    fn near_state(&self, state: &State, rng: &mut dyn RngCore) -> State;

    /// A noisy observation of a state.
    fn observation(&self, state: &State, rng: &mut dyn RngCore) -> Self::Observation;

    /// Likelihood (non-negative) of the observation given the state.
    fn weight(&self, observation: &Self::Observation, state: &State) -> f64;
}

/// A state estimator.
///
pub trait Estimator {
    /// The estimator's estimate of the system's state.
    fn state(&self) -> Result<State, FilterError>;
}
