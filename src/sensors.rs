//! A simple bearing only sensor.
//!
//! Observes the bearing of the emitter with additive normal noise. Initial samples are scattered around the true
//! range and bearing, with an unknown course.

use rand::Rng;
use rand_core::RngCore;
use rand_distr::{StandardNormal, Uniform};

use crate::error::FilterError;
use crate::geometry::{angle_diff, normalize_deg};
use crate::models::{SensorModel, State};

/// Bearing sensor with normal noise.
#[derive(Clone, Debug)]
pub struct BearingSensor {
    /// Observation noise (degrees)
    bearing_std: f64,
    initial_range_std: f64,
    initial_bearing_std: f64,
    course_steps: Uniform<u32>,
}

impl BearingSensor {
    /// `bearing_std` is the observation noise (degrees).
    /// Initial samples are spread with `initial_range_std` and `initial_bearing_std`.
    pub fn new(
        bearing_std: f64,
        initial_range_std: f64,
        initial_bearing_std: f64,
    ) -> Result<BearingSensor, FilterError> {
        if !(bearing_std > 0. && bearing_std.is_finite()) {
            return Err(FilterError::Configuration("bearing noise must be positive".into()));
        }
        if !(initial_range_std >= 0. && initial_bearing_std >= 0.) {
            return Err(FilterError::Configuration("initial spread must be non-negative".into()));
        }
        Ok(BearingSensor {
            bearing_std,
            initial_range_std,
            initial_bearing_std,
            course_steps: Uniform::new(0, 12),
        })
    }

    fn normal(std: f64, rng: &mut dyn RngCore) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        std * z
    }
}

impl Default for BearingSensor {
    fn default() -> Self {
        BearingSensor {
            bearing_std: 5.,
            initial_range_std: 10.,
            initial_bearing_std: 10.,
            course_steps: Uniform::new(0, 12),
        }
    }
}

impl SensorModel for BearingSensor {
    type Observation = f64;

    fn near_state(&self, state: &State, rng: &mut dyn RngCore) -> State {
        State {
            range: (state.range + Self::normal(self.initial_range_std, rng)).abs(),
            bearing: normalize_deg(state.bearing + Self::normal(self.initial_bearing_std, rng)),
            relative_course: f64::from(rng.sample(&self.course_steps) * 30),
            own_speed: state.own_speed,
        }
    }

    fn observation(&self, state: &State, rng: &mut dyn RngCore) -> f64 {
        normalize_deg(state.bearing + Self::normal(self.bearing_std, rng))
    }

    fn weight(&self, observation: &f64, state: &State) -> f64 {
        let e = angle_diff(*observation, state.bearing) / self.bearing_std;
        (-0.5 * e * e).exp()
    }
}
