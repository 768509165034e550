use ndarray::Array2;

use crate::error::{Result, SpeckleError};

use super::engine::PowerSpectrum;

/// Running sum of power spectra since the last reset.
///
/// Only the worker thread touches it, so there is no locking. Cloning is the
/// checkpoint mechanism used to roll back a failed cycle.
#[derive(Clone, Debug)]
pub struct Accumulator {
    sum: Array2<f32>,
    count: usize,
}

impl Accumulator {
    pub fn new(size: usize) -> Self {
        Self {
            sum: Array2::zeros((size, size)),
            count: 0,
        }
    }

    /// Add a spectrum elementwise. A shape mismatch leaves the state untouched.
    pub fn add(&mut self, spectrum: &PowerSpectrum) -> Result<()> {
        if spectrum.dim() != self.sum.dim() {
            return Err(SpeckleError::mismatch(self.sum.dim(), spectrum.dim()));
        }
        self.sum += spectrum;
        self.count += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.sum.fill(0.0);
        self.count = 0;
    }

    pub fn is_due(&self, accumulation_length: usize) -> bool {
        self.count >= accumulation_length
    }

    pub fn sum(&self) -> &Array2<f32> {
        &self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
