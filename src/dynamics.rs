//! Relative motion of the emitter in the observer's frame.
//!
//! The observer maneuvers by turning and setting its speed. The emitter moves with a fixed speed
//! along its course, which occasionally changes by a fixed step.

use rand::Rng;
use rand_core::RngCore;
use rand_distr::Standard;

use crate::geometry::{cart2pol, normalize_deg, pol2cart};
use crate::models::{Control, State};

/// Relative motion model with a random course drift of the emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct RelativeMotion {
    /// Emitter speed
    pub target_speed: f64,
    /// Probability the emitter holds its course each step
    pub p_hold: f64,
    /// Magnitude of a course change in degrees
    pub course_change: f64,
}

impl Default for RelativeMotion {
    fn default() -> Self {
        RelativeMotion {
            target_speed: 1.,
            p_hold: 0.9,
            course_change: 30.,
        }
    }
}

impl RelativeMotion {
    /// Advance a state by one step with the observer maneuver `control`.
    ///
    /// The emitter moves along its course before the course drifts, so the drift first shows in the next step's position.
    /// Range is not clamped, a range near zero is left to the reward.
    pub fn advance(&self, state: &State, control: &Control, rng: &mut dyn RngCore) -> State {
        let own_speed = f64::from(control.speed);
        let turn = f64::from(control.turn);

        // Turning the observer rotates the frame
        let bearing = normalize_deg(state.bearing - turn);
        let course = normalize_deg(state.relative_course - turn);

        let p = pol2cart(state.range, bearing.to_radians());
        let d = pol2cart(self.target_speed, course.to_radians());
        // Observer motion is along the frame's x axis
        let mut moved = p + d;
        moved[0] -= own_speed;

        let course = self.next_course(course, rng);
        let (range, bearing) = cart2pol(&moved);

        State {
            range,
            bearing,
            relative_course: course,
            own_speed,
        }
    }

    /// Course after a random drift, holding with probability `p_hold` and otherwise turning by ±`course_change`.
    pub fn next_course(&self, course: f64, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.sample(Standard);
        if u < self.p_hold {
            return course;
        }
        let sign = if rng.gen::<bool>() { 1. } else { -1. };
        normalize_deg(course + sign * self.course_change)
    }
}
