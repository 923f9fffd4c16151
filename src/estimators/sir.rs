//! SIR state estimation.
//!
//! A Sampling Importance Resampling estimator of the emitter's relative [`State`].
//! The belief is represented by a population of samples with normalised likelihood weights.
//!
//! Each step the samples are predicted with the [`RelativeMotion`] model, weighted by the sensor's likelihood of the observation and
//! resampled so the weights return to uniform. The population size never changes.
//!
//! The weights are replaced by the fresh likelihoods on every observation. The previous weights are not multiplied in,
//! after resampling they are uniform anyway.
//!
//! [`State`]: ../../models/struct.State.html
//! [`RelativeMotion`]: ../../dynamics/struct.RelativeMotion.html

use nalgebra::Vector2;
use rand::Rng;
use rand_core::RngCore;
use rand_distr::{Normal, Standard};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dynamics::RelativeMotion;
use crate::error::FilterError;
use crate::geometry::{cart2pol, normalize_deg, pol2cart};
use crate::models::{Control, Estimator, SensorModel, State};

pub type Samples = Vec<State>;
pub type Likelihoods = Vec<f64>;
/// Number of times each sample is resampled.
pub type Resamples = Vec<u32>;

/// Resampling algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplerKind {
    /// Single random offset with evenly spaced draws, O(n)
    Systematic,
    /// Independent sorted uniform draws, O(n*log(n))
    Standard,
}

impl Default for ResamplerKind {
    fn default() -> Self {
        ResamplerKind::Systematic
    }
}

impl ResamplerKind {
    pub fn resample(
        self,
        w: &mut Likelihoods,
        rng: &mut dyn RngCore,
    ) -> Result<Resamples, FilterError> {
        match self {
            ResamplerKind::Systematic => systematic_resampler(w, rng),
            ResamplerKind::Standard => standard_resampler(w, rng),
        }
    }
}

/// Sample state.
///
/// Samples and their likelihood weights, with the random source used by every stochastic operation.
pub struct SampleState {
    /// Samples
    pub s: Samples,
    /// Likelihoods, normalised after each observation
    pub w: Likelihoods,
    /// Resampling algorithm
    pub resampler: ResamplerKind,
    /// Min/max roughening factor applied after resampling
    pub roughening: Option<f64>,
    /// A random number generator
    pub rng: Box<dyn RngCore>,
}

impl SampleState {
    /// Creates a SampleState with equal weights for all samples.
    pub fn new_equal_likelihood(
        s: Samples,
        rng: Box<dyn RngCore>,
    ) -> Result<SampleState, FilterError> {
        if s.is_empty() {
            return Err(FilterError::EmptyPopulation);
        }
        let w = uniform_weights(s.len());
        Ok(SampleState {
            s,
            w,
            resampler: ResamplerKind::default(),
            roughening: None,
            rng,
        })
    }

    /// Draw `n` samples from the sensor's near state distribution of the true state.
    pub fn initialize<S: SensorModel + ?Sized>(
        true_state: &State,
        sensor: &S,
        n: usize,
        mut rng: Box<dyn RngCore>,
    ) -> Result<SampleState, FilterError> {
        if n == 0 {
            return Err(FilterError::Configuration("particle count must be positive".into()));
        }
        let s = (0..n).map(|_| sensor.near_state(true_state, &mut *rng)).collect();
        SampleState::new_equal_likelihood(s, rng)
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// State prediction with a sampled prediction model. Weights are unchanged.
    pub fn predict_sampled(&mut self, f: impl Fn(&State, &mut dyn RngCore) -> State) {
        for si in self.s.iter_mut() {
            *si = f(&*si, &mut *self.rng);
        }
    }

    /// Predict every sample with the same maneuver. The course drift is drawn independently for each sample.
    pub fn predict(&mut self, dynamics: &RelativeMotion, control: &Control) {
        self.predict_sampled(|s, rng| dynamics.advance(s, control, rng));
    }

    /// Weight the samples with the likelihood function `l` and normalise.
    ///
    /// The new weights replace the previous weights. On error the weights are left unchanged.
    pub fn observe(&mut self, l: impl Fn(&State) -> f64) -> Result<(), FilterError> {
        let mut w: Likelihoods = self.s.iter().map(|s| l(s)).collect();
        normalise(&mut w)?;
        self.w = w;
        Ok(())
    }

    /// Weight the samples with the sensor's likelihood of an observation.
    pub fn update<S: SensorModel + ?Sized>(
        &mut self,
        observation: &S::Observation,
        sensor: &S,
    ) -> Result<(), FilterError> {
        self.observe(|s| sensor.weight(observation, s))
    }

    /// Resample with the configured resampler, returning the number of unique samples kept.
    ///
    /// Afterwards all weights are exactly 1/n.
    pub fn resample(&mut self) -> Result<usize, FilterError> {
        self.check_lengths()?;
        let mut wcum = self.w.clone();
        let presamples = self.resampler.resample(&mut wcum, &mut *self.rng)?;
        let unique = self.live_samples(&presamples);
        trace!(unique, n = self.s.len(), "resampled");

        if let Some(k) = self.roughening {
            roughen_minmax(&mut self.s, k, &mut *self.rng)?;
        }
        Ok(unique)
    }

    /// A complete filter step: predict, update and resample.
    pub fn step<S: SensorModel + ?Sized>(
        &mut self,
        dynamics: &RelativeMotion,
        control: &Control,
        observation: &S::Observation,
        sensor: &S,
    ) -> Result<usize, FilterError> {
        self.predict(dynamics, control);
        self.update(observation, sensor)?;
        self.resample()
    }

    /// Effective sample size of the normalised weights, 1/Σw².
    pub fn effective_sample_size(&self) -> f64 {
        let sum_sq: f64 = self.w.iter().map(|w| w * w).sum();
        1. / sum_sq
    }

    fn check_lengths(&self) -> Result<(), FilterError> {
        if self.w.len() != self.s.len() {
            return Err(FilterError::LengthMismatch {
                samples: self.s.len(),
                weights: self.w.len(),
            });
        }
        Ok(())
    }

    /// Replace the samples by their resamples and reset the weights to uniform.
    fn live_samples(&mut self, presamples: &Resamples) -> usize {
        let n = self.s.len();
        let mut s = Vec::with_capacity(n);
        let mut unique = 0;
        for (si, pr) in self.s.iter().zip(presamples.iter()) {
            if *pr > 0 {
                unique += 1;
            }
            for _ in 0..*pr {
                s.push(*si);
            }
        }
        debug_assert_eq!(s.len(), n);
        self.s = s;
        self.w = uniform_weights(n);
        unique
    }
}

impl Estimator for SampleState {
    /// Weighted mean of the samples.
    ///
    /// Positions are averaged in Cartesian coordinates and the course as a circular mean.
    fn state(&self) -> Result<State, FilterError> {
        if self.s.is_empty() {
            return Err(FilterError::EmptyPopulation);
        }
        self.check_lengths()?;
        let mut pos = Vector2::<f64>::zeros();
        let mut crs = Vector2::<f64>::zeros();
        let mut speed = 0.;
        let mut wsum = 0.;
        for (s, w) in self.s.iter().zip(self.w.iter()) {
            pos += pol2cart(s.range, s.bearing.to_radians()) * *w;
            crs += pol2cart(1., s.relative_course.to_radians()) * *w;
            speed += s.own_speed * w;
            wsum += w;
        }
        if !(wsum > 0.) {
            return Err(FilterError::DegenerateWeights { sum: wsum });
        }
        let (range, bearing) = cart2pol(&(pos / wsum));
        let (_, course) = cart2pol(&crs);
        Ok(State {
            range,
            bearing,
            relative_course: course,
            own_speed: speed / wsum,
        })
    }
}

fn uniform_weights(n: usize) -> Likelihoods {
    vec![1. / n as f64; n]
}

/// Normalise likelihoods to sum to one.
///
/// Negative weights, a zero sum or a non finite sum are errors.
pub fn normalise(w: &mut Likelihoods) -> Result<f64, FilterError> {
    if w.is_empty() {
        return Err(FilterError::EmptyPopulation);
    }
    if let Some((index, weight)) = w.iter().enumerate().find(|(_, wi)| **wi < 0.) {
        return Err(FilterError::NegativeWeight { index, weight: *weight });
    }
    let sum: f64 = w.iter().sum();
    if !sum.is_finite() || sum <= 0. {
        return Err(FilterError::DegenerateWeights { sum });
    }
    for wi in w.iter_mut() {
        *wi /= sum;
    }
    Ok(sum)
}

/// Normalised cumulative sum of likelihood weights (Kahan algorithm).
///
/// `w` becomes the cumulative sum. Returns the total weight.
fn cumulative_weights(w: &mut Likelihoods) -> Result<f64, FilterError> {
    if w.is_empty() {
        return Err(FilterError::EmptyPopulation);
    }
    let mut wcum = 0.;
    let mut c = 0.;
    for (index, wi) in w.iter_mut().enumerate() {
        if *wi < 0. {
            return Err(FilterError::NegativeWeight { index, weight: *wi });
        }
        let y = *wi - c;
        let t = wcum + y;
        c = (t - wcum) - y;
        wcum = t;
        *wi = t;
    }
    // Any numerical failure cascades into the cumulative sum
    if !wcum.is_finite() || wcum <= 0. {
        return Err(FilterError::DegenerateWeights { sum: wcum });
    }
    Ok(wcum)
}

/// Systematic resampler.
///
/// One uniform offset u in [0, 1/n) and the n evenly spaced points u + i/n over the cumulative weights.
/// A sample is chosen once for each point inside its cumulative weight interval, so a sample with weight w is
/// chosen floor(n*w) or ceil(n*w) times. Complexity O(n).
///
/// `w` becomes the cumulative sum.
pub fn systematic_resampler(
    w: &mut Likelihoods,
    rng: &mut dyn RngCore,
) -> Result<Resamples, FilterError> {
    let wcum = cumulative_weights(w)?;
    let n = w.len();
    let step = wcum / n as f64;
    let u0: f64 = rng.sample(Standard);

    let mut presamples = vec![0u32; n];
    let mut j = 0;
    for i in 0..n {
        let u = (u0 + i as f64) * step;
        while j + 1 < n && w[j] <= u {
            j += 1;
        }
        presamples[j] += 1;
    }
    Ok(presamples)
}

/// Standard resampler.
///
/// A sample is chosen once for each time its cumulative weight intersects with a uniform random draw.
/// The draws are sorted so the two ordered lists can be compared, complexity O(n*log(n)).
///
/// `w` becomes the cumulative sum.
pub fn standard_resampler(
    w: &mut Likelihoods,
    rng: &mut dyn RngCore,
) -> Result<Resamples, FilterError> {
    let wcum = cumulative_weights(w)?;
    let n = w.len();

    // Sorted uniform random distribution [0..1) for each resample
    let mut ur: Vec<f64> = (0..n).map(|_| rng.sample(Standard)).collect();
    ur.sort_by(|a: &f64, b| a.total_cmp(b));

    let mut presamples = vec![0u32; n];
    let mut ui = 0;
    for (pr, wi) in presamples.iter_mut().zip(w.iter()) {
        while ui < n && ur[ui] * wcum < *wi {
            *pr += 1;
            ui += 1;
        }
    }
    if ui != n {
        // Only reachable with non numeric weights
        return Err(FilterError::DegenerateWeights { sum: wcum });
    }
    Ok(presamples)
}

/// Min/max roughening of the sample positions.
///
/// Each Cartesian coordinate is jittered with normal noise of standard deviation k * (max - min) * n^(-1/2).
/// Bearings are re-normalised afterwards.
pub fn roughen_minmax(s: &mut Samples, k: f64, rng: &mut dyn RngCore) -> Result<(), FilterError> {
    if s.is_empty() {
        return Err(FilterError::EmptyPopulation);
    }
    let mut pos: Vec<Vector2<f64>> = s
        .iter()
        .map(|si| pol2cart(si.range, si.bearing.to_radians()))
        .collect();
    let scale = k / (s.len() as f64).sqrt();

    for d in 0..2 {
        let (min, max) = pos
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p[d]), hi.max(p[d])));
        let sigma = scale * (max - min);
        let normal = Normal::new(0., sigma)
            .map_err(|e| FilterError::Configuration(format!("roughening noise: {}", e)))?;
        for p in pos.iter_mut() {
            p[d] += rng.sample(normal);
        }
    }

    for (si, p) in s.iter_mut().zip(pos.iter()) {
        let (range, bearing) = cart2pol(p);
        si.range = range;
        si.bearing = normalize_deg(bearing);
    }
    Ok(())
}
