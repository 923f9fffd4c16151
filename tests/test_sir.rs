//! Test the SIR estimator: population size, weights, resampling and degeneracy.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::Rng;
use rand_core::{RngCore, SeedableRng};

use birdseye::dynamics::RelativeMotion;
use birdseye::estimators::sir::{ResamplerKind, SampleState, Samples};
use birdseye::models::{Control, Estimator, SensorModel, State};
use birdseye::sensors::BearingSensor;
use birdseye::FilterError;
use scripted::{ConstantSensor, RangeSensor};

mod scripted;

fn rng(seed: u64) -> Box<dyn RngCore> {
    Box::new(StdRng::seed_from_u64(seed))
}

fn truth() -> State {
    State::new(50., 90., 180., 1.)
}

#[test]
fn initialize_draws_equal_weights() {
    let est = SampleState::initialize(&truth(), &BearingSensor::default(), 500, rng(1)).unwrap();
    assert_eq!(est.len(), 500);
    assert!(est.w.iter().all(|w| *w == 1. / 500.));
    assert!(est.s.iter().all(|s| s.angles_normalized()));
}

#[test]
fn initialize_rejects_zero_particles() {
    match SampleState::initialize(&truth(), &BearingSensor::default(), 0, rng(1)) {
        Err(FilterError::Configuration(_)) => {}
        Err(e) => panic!("expected configuration error, got {}", e),
        Ok(_) => panic!("expected configuration error"),
    }
    assert!(SampleState::new_equal_likelihood(Samples::new(), rng(1)).is_err());
}

#[test]
fn population_size_and_weights_through_steps() {
    let sensor = BearingSensor::default();
    let dynamics = RelativeMotion::default();
    let mut truth_rng = StdRng::seed_from_u64(2);
    let mut est = SampleState::initialize(&truth(), &sensor, 300, rng(3)).unwrap();
    let mut x = truth();

    for k in 0..50 {
        let control = Control::new([-30, 0, 30][k % 3], 1 + (k % 2) as i32);
        x = dynamics.advance(&x, &control, &mut truth_rng);
        let z = sensor.observation(&x, &mut truth_rng);

        est.predict(&dynamics, &control);
        assert_eq!(est.len(), 300);
        assert!(est.s.iter().all(|s| s.angles_normalized()));

        est.update(&z, &sensor).unwrap();
        assert_eq!(est.len(), 300);
        assert_abs_diff_eq!(est.w.iter().sum::<f64>(), 1., epsilon = 1e-9);

        est.resample().unwrap();
        assert_eq!(est.len(), 300);
        assert!(est.w.iter().all(|w| *w == 1. / 300.));
        assert!(est.s.iter().all(|s| s.angles_normalized()));
    }
}

#[test]
fn update_replaces_previous_weights() {
    let samples: Samples = (1..=4).map(|r| State::new(f64::from(r), 0., 0., 1.)).collect();
    let mut est = SampleState::new_equal_likelihood(samples, rng(4)).unwrap();
    est.w = vec![0.97, 0.01, 0.01, 0.01];
    est.update(&0., &RangeSensor).unwrap();
    // Weights are the normalised ranges alone
    for (w, r) in est.w.iter().zip([1., 2., 3., 4.].iter()) {
        assert_abs_diff_eq!(*w, r / 10., epsilon = 1e-12);
    }
}

#[test]
fn zero_likelihoods_are_degenerate() {
    let sensor = BearingSensor::default();
    let mut est = SampleState::initialize(&truth(), &sensor, 100, rng(5)).unwrap();
    let before = est.w.clone();
    let err = est.update(&0., &ConstantSensor { likelihood: 0. }).unwrap_err();
    assert!(err.is_degenerate(), "{}", err);
    assert_eq!(est.w, before);

    let err = est.update(&0., &ConstantSensor { likelihood: f64::NAN }).unwrap_err();
    assert!(err.is_degenerate(), "{}", err);

    match est.update(&0., &ConstantSensor { likelihood: -1. }) {
        Err(FilterError::NegativeWeight { index: 0, .. }) => {}
        other => panic!("expected negative weight, got {:?}", other.err()),
    }
}

#[test]
fn step_composes_predict_update_resample() {
    let sensor = BearingSensor::default();
    let dynamics = RelativeMotion::default();
    let mut est = SampleState::initialize(&truth(), &sensor, 200, rng(6)).unwrap();
    let unique = est.step(&dynamics, &Control::new(0, 1), &92., &sensor).unwrap();
    assert!(unique >= 1 && unique <= 200);
    assert_eq!(est.len(), 200);
    assert!(est.w.iter().all(|w| *w == 1. / 200.));
}

/// Copies of the heavy sample 0 after each resample.
fn heavy_copies(kind: ResamplerKind, trials: usize) -> Vec<f64> {
    let n = 10;
    let samples: Samples = (0..n).map(|i| State::new(i as f64, 0., 0., 1.)).collect();
    let mut weights = vec![0.5 / (n - 1) as f64; n];
    weights[0] = 0.5;

    let mut est = SampleState::new_equal_likelihood(samples.clone(), rng(7)).unwrap();
    est.resampler = kind;
    (0..trials)
        .map(|_| {
            est.s = samples.clone();
            est.w = weights.clone();
            est.resample().unwrap();
            est.s.iter().filter(|s| s.range == 0.).count() as f64
        })
        .collect()
}

fn mean_var(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let var = x.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

#[test]
fn systematic_resampling_proportion() {
    let copies = heavy_copies(ResamplerKind::Systematic, 10000);
    // A weight of 1/2 is resampled floor or ceil of n/2 times
    assert!(copies.iter().all(|c| *c >= 4. && *c <= 6.));
    let (mean, _) = mean_var(&copies);
    assert_abs_diff_eq!(mean / 10., 0.5, epsilon = 0.01);
}

#[test]
fn systematic_has_lower_variance_than_standard() {
    let (sys_mean, sys_var) = mean_var(&heavy_copies(ResamplerKind::Systematic, 5000));
    let (std_mean, std_var) = mean_var(&heavy_copies(ResamplerKind::Standard, 5000));
    assert_abs_diff_eq!(sys_mean, 5., epsilon = 0.1);
    assert_abs_diff_eq!(std_mean, 5., epsilon = 0.2);
    // Multinomial draws have variance n*p*(1-p) = 2.5
    assert!(sys_var < 0.5, "systematic variance {}", sys_var);
    assert!(std_var > 1.5, "standard variance {}", std_var);
}

#[test]
fn resample_keeps_heavy_samples() {
    let mut r = StdRng::seed_from_u64(8);
    for _ in 0..100 {
        let n = 20;
        let samples: Samples = (0..n).map(|i| State::new(i as f64, 0., 0., 1.)).collect();
        let mut w: Vec<f64> = (0..n).map(|_| r.gen::<f64>()).collect();
        let sum: f64 = w.iter().sum();
        w.iter_mut().for_each(|wi| *wi /= sum);

        let mut est = SampleState::new_equal_likelihood(samples, rng(r.gen())).unwrap();
        est.w = w.clone();
        est.resample().unwrap();
        for (i, wi) in w.iter().enumerate() {
            if *wi >= 1. / n as f64 {
                let kept = est.s.iter().any(|s| s.range == i as f64);
                assert!(kept, "sample {} with weight {} lost", i, wi);
            }
        }
    }
}

#[test]
fn weights_must_pair_with_samples() {
    let samples: Samples = (0..10).map(|i| State::new(i as f64, 0., 0., 1.)).collect();
    let mut est = SampleState::new_equal_likelihood(samples, rng(12)).unwrap();
    est.w = vec![0.2; 5];
    match est.resample() {
        Err(FilterError::LengthMismatch {
            samples: 10,
            weights: 5,
        }) => {}
        other => panic!("expected length mismatch, got {:?}", other),
    }
    assert_eq!(est.len(), 10);
    assert_eq!(est.w.len(), 5);
    assert!(est.state().is_err());
}

#[test]
fn roughening_perturbs_positions_only() {
    let sensor = BearingSensor::default();
    let mut est = SampleState::initialize(&truth(), &sensor, 100, rng(9)).unwrap();
    est.roughening = Some(0.2);
    let courses: Vec<f64> = est.s.iter().map(|s| s.relative_course).collect();
    est.resample().unwrap();
    assert_eq!(est.len(), 100);
    assert!(est.s.iter().all(|s| s.angles_normalized() && s.range >= 0.));
    assert!(est.s.iter().all(|s| courses.contains(&s.relative_course)));
}

#[test]
fn estimate_of_identical_samples() {
    let x = State::new(40., 300., 350., 2.);
    let mut est = SampleState::new_equal_likelihood(vec![x; 50], rng(10)).unwrap();
    let e = est.state().unwrap();
    assert_abs_diff_eq!(e.range, 40., epsilon = 1e-9);
    assert_abs_diff_eq!(e.bearing, 300., epsilon = 1e-9);
    assert_abs_diff_eq!(e.relative_course, 350., epsilon = 1e-9);
    assert_abs_diff_eq!(e.own_speed, 2., epsilon = 1e-12);
    assert_abs_diff_eq!(est.effective_sample_size(), 50., epsilon = 1e-9);

    // Circular mean across north
    est.s = vec![State::new(40., 300., 350., 2.), State::new(40., 300., 10., 2.)];
    est.w = vec![0.5, 0.5];
    let e = est.state().unwrap();
    assert!(e.relative_course < 1e-9 || e.relative_course > 360. - 1e-9);
}

#[test]
fn sensor_trait_objects_are_accepted() {
    let sensor: &dyn SensorModel<Observation = f64> = &ConstantSensor { likelihood: 1. };
    let mut est = SampleState::initialize(&truth(), sensor, 10, rng(11)).unwrap();
    est.update(&0., sensor).unwrap();
    assert!(est.s.iter().all(|s| *s == truth()));
}
