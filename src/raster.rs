//! Belief raster.
//!
//! The samples of the belief are projected to Cartesian positions and counted in a square 2D histogram.
//! The bins span the extent of the samples, which is recomputed on every call, so a cell does not map to a
//! fixed position in the observer's frame from one step to the next.
//! Weights are ignored: after resampling all weights are equal and the counts approximate the posterior density.

use nalgebra::{DMatrix, Vector2};
use num_traits::ToPrimitive;

use crate::error::FilterError;
use crate::geometry::pol2cart;
use crate::models::State;

/// Histogram extent of one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Extent of the values. A zero width extent is widened by 0.5 either side.
    fn of(values: impl Iterator<Item = f64>) -> Extent {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min == max {
            Extent {
                min: min - 0.5,
                max: max + 0.5,
            }
        } else {
            Extent { min, max }
        }
    }

    /// Bin of a value, the last bin includes the max edge.
    fn bin(&self, v: f64, bins: usize) -> Option<usize> {
        if v < self.min || v > self.max {
            return None;
        }
        let b = ((v - self.min) / (self.max - self.min) * bins as f64).floor().to_usize()?;
        Some(b.min(bins - 1))
    }

    /// The bins + 1 evenly spaced bin edges.
    pub fn edges(&self, bins: usize) -> Vec<f64> {
        let width = (self.max - self.min) / bins as f64;
        (0..=bins).map(|i| self.min + width * i as f64).collect()
    }
}

/// A single channel image of sample counts.
///
/// `counts[(i, j)]` counts the samples with x in bin i and y in bin j.
#[derive(Clone, Debug, PartialEq)]
pub struct BeliefRaster {
    pub counts: DMatrix<f64>,
    pub x: Extent,
    pub y: Extent,
}

impl BeliefRaster {
    /// Shape as (channels, rows, columns).
    pub fn shape(&self) -> [usize; 3] {
        [1, self.counts.nrows(), self.counts.ncols()]
    }

    /// The single channel.
    pub fn channel(&self) -> &DMatrix<f64> {
        &self.counts
    }

    /// Total count of samples in the raster.
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }

    /// Counts flattened channel first, then row major.
    pub fn to_vec(&self) -> Vec<f64> {
        let (rows, cols) = self.counts.shape();
        let mut v = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                v.push(self.counts[(i, j)]);
            }
        }
        v
    }
}

/// Count the samples' Cartesian positions in a `grid_size` x `grid_size` histogram.
pub fn rasterize(samples: &[State], grid_size: usize) -> Result<BeliefRaster, FilterError> {
    if grid_size == 0 {
        return Err(FilterError::Configuration("raster grid size must be positive".into()));
    }
    if samples.is_empty() {
        return Err(FilterError::EmptyPopulation);
    }
    let pos: Vec<Vector2<f64>> = samples
        .iter()
        .map(|s| pol2cart(s.range, s.bearing.to_radians()))
        .collect();
    let x = Extent::of(pos.iter().map(|p| p[0]));
    let y = Extent::of(pos.iter().map(|p| p[1]));

    let mut counts = DMatrix::zeros(grid_size, grid_size);
    for p in pos.iter() {
        if let (Some(i), Some(j)) = (x.bin(p[0], grid_size), y.bin(p[1], grid_size)) {
            counts[(i, j)] += 1.;
        }
    }
    Ok(BeliefRaster { counts, x, y })
}
