///
/// Birdseye, Bayesian tracking of a moving emitter.
/// Copyright (c) 2020 Michael Stevens
///
/// An observer moves in the plane and receives noisy bearing observations of an emitter which moves with its own course.
/// The observer can not see the emitter's state directly. Instead it maintains a belief over the emitter's relative state,
/// range, bearing and relative course, as a population of samples (particles) which is predicted with a relative motion model
/// and corrected with each observation using Sampling Importance Resampling (SIR).
///
/// The belief is projected into a fixed size 2D histogram. This raster is the observation handed to a decision making agent
/// which chooses the observer's next maneuver from a small discrete catalog.
///
/// The estimation core is [`estimators::sir`], the relative motion model is [`dynamics`], the raster is [`raster`] and
/// an episode of the tracking problem is run by [`env::RfEnv`].
/// The sensor is a pluggable strategy described by the [`models::SensorModel`] trait. A simple bearing sensor is provided in [`sensors`].
//
/// # Licensing
///
/// All Bayes++ source code files are copyright with the license conditions as given here. The copyright notice is that of the MIT license.
///  This in no way restricts any commercial use you may wish to make using our source code.
///  As long as you respect the copyright and license conditions, Michael Stevens is happy to for you to use it in any way you wish.
///
/// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction,
/// including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software,
/// and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
///
/// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
///
/// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
/// FITNESS FOR A PARTICULAR PURPOSE AND NON INFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY,
/// WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

pub mod actions;
pub mod config;
pub mod dynamics;
pub mod env;
pub mod error;
pub mod estimators;
pub mod geometry;
pub mod models;
pub mod raster;
pub mod reward;
pub mod sensors;

pub use error::FilterError;
