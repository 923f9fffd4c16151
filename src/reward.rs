//! Reward for keeping the emitter in a useful sensing range.

use serde::{Deserialize, Serialize};

use crate::models::State;

/// Range at or beyond which track of the emitter is lost.
pub const LOST_RANGE: f64 = 150.;
/// Range at or within which observer and emitter collide.
pub const COLLISION_RANGE: f64 = 10.;

/// How the reward of a step is computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RewardPolicy {
    /// Reward of the range alone.
    RangeOnly,
    /// Range reward plus a penalty for each action, except the waived efficient actions.
    ActionAware {
        penalty: f64,
        waived: Vec<usize>,
    },
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy::ActionAware {
            penalty: -0.05,
            waived: vec![3, 4],
        }
    }
}

impl RewardPolicy {
    /// Reward of reaching `state` with the action of index `action`.
    pub fn reward(&self, state: &State, action: usize) -> f64 {
        match self {
            RewardPolicy::RangeOnly => range_reward(state.range),
            RewardPolicy::ActionAware { penalty, waived } => {
                let penalty = if waived.contains(&action) { 0. } else { *penalty };
                let r = state.range;
                if r >= LOST_RANGE || r <= COLLISION_RANGE {
                    -2. + penalty
                } else {
                    0.1 + penalty
                }
            }
        }
    }
}

/// Reward of a range alone.
pub fn range_reward(range: f64) -> f64 {
    if range >= LOST_RANGE {
        // lost track of the emitter
        -2.
    } else if range <= COLLISION_RANGE {
        -200.
    } else {
        0.1
    }
}
