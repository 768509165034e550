use std::sync::Arc;

use ndarray::{Array2, ArrayViewMut1, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, SpeckleError};

/// Precomputed row/column plans for a 2D transform of fixed shape.
///
/// Neither direction is normalized: a forward pass followed by an inverse
/// pass multiplies the data by `rows * cols`.
pub struct Fft2dPlan {
    rows: usize,
    cols: usize,
    row_fft: Arc<dyn Fft<f64>>,
    col_fft: Arc<dyn Fft<f64>>,
}

impl Fft2dPlan {
    pub fn new(
        planner: &mut FftPlanner<f64>,
        rows: usize,
        cols: usize,
        direction: FftDirection,
    ) -> Self {
        Self {
            rows,
            cols,
            row_fft: planner.plan_fft(cols, direction),
            col_fft: planner.plan_fft(rows, direction),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Transform `data` in place: every row, then every column.
    pub fn process(&self, data: &mut Array2<Complex<f64>>) -> Result<()> {
        if data.dim() != self.dim() {
            return Err(SpeckleError::mismatch(self.dim(), data.dim()));
        }

        if self.rows * self.cols >= PARALLEL_PIXEL_THRESHOLD {
            data.axis_iter_mut(Axis(0))
                .into_par_iter()
                .for_each(|lane| process_lane(self.row_fft.as_ref(), lane));
            data.axis_iter_mut(Axis(1))
                .into_par_iter()
                .for_each(|lane| process_lane(self.col_fft.as_ref(), lane));
        } else {
            for lane in data.axis_iter_mut(Axis(0)) {
                process_lane(self.row_fft.as_ref(), lane);
            }
            for lane in data.axis_iter_mut(Axis(1)) {
                process_lane(self.col_fft.as_ref(), lane);
            }
        }

        Ok(())
    }
}

/// Run a 1D transform over one row or column. Contiguous lanes are processed
/// directly; strided ones go through a scratch buffer.
fn process_lane(fft: &dyn Fft<f64>, mut lane: ArrayViewMut1<Complex<f64>>) {
    if let Some(slice) = lane.as_slice_mut() {
        fft.process(slice);
        return;
    }
    let mut buf = lane.to_vec();
    fft.process(&mut buf);
    for (dst, src) in lane.iter_mut().zip(buf) {
        *dst = src;
    }
}

/// Embed a real matrix as the real channel of a complex matrix.
pub fn to_complex(data: &Array2<f32>) -> Array2<Complex<f64>> {
    data.mapv(|v| Complex::new(v as f64, 0.0))
}
