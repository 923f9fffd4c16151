//! Bayesian state estimators of the emitter's relative state.

pub mod sir;
