//! The discrete catalog of observer maneuvers.
//!
//! Maneuvers are ordered by turn then by speed, so with turns {-30, 0, 30} and speeds {1, 2}
//! the indices are (-30,1)=0, (-30,2)=1, (0,1)=2, (0,2)=3, (30,1)=4, (30,2)=5.

use crate::error::FilterError;
use crate::models::Control;

/// A fixed, finite catalog of maneuvers with a dense index.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCatalog {
    turns: Vec<i32>,
    speeds: Vec<i32>,
}

impl ActionCatalog {
    /// Creates the catalog of all turn and speed combinations.
    pub fn new(turns: &[i32], speeds: &[i32]) -> Result<ActionCatalog, FilterError> {
        if turns.is_empty() || speeds.is_empty() {
            return Err(FilterError::Configuration("empty action catalog".into()));
        }
        let distinct = |v: &[i32]| v.iter().enumerate().all(|(i, a)| !v[..i].contains(a));
        if !distinct(turns) || !distinct(speeds) {
            return Err(FilterError::Configuration("duplicate actions in catalog".into()));
        }
        Ok(ActionCatalog {
            turns: turns.to_vec(),
            speeds: speeds.to_vec(),
        })
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.turns.len() * self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn action_to_index(&self, a: &Control) -> Result<usize, FilterError> {
        let unknown = || FilterError::UnknownAction {
            turn: a.turn,
            speed: a.speed,
        };
        let ti = self.turns.iter().position(|t| *t == a.turn).ok_or_else(unknown)?;
        let si = self.speeds.iter().position(|s| *s == a.speed).ok_or_else(unknown)?;
        Ok(ti * self.speeds.len() + si)
    }

    pub fn index_to_action(&self, index: usize) -> Result<Control, FilterError> {
        if index >= self.len() {
            return Err(FilterError::InvalidAction {
                index,
                len: self.len(),
            });
        }
        let n = self.speeds.len();
        Ok(Control::new(self.turns[index / n], self.speeds[index % n]))
    }

    /// All actions in index order.
    pub fn actions(&self) -> impl Iterator<Item = Control> + '_ {
        self.turns
            .iter()
            .flat_map(move |t| self.speeds.iter().map(move |s| Control::new(*t, *s)))
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        ActionCatalog {
            turns: vec![-30, 0, 30],
            speeds: vec![1, 2],
        }
    }
}
