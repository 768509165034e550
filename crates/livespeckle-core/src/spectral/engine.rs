use ndarray::Array2;
use rustfft::{FftDirection, FftPlanner};

use crate::error::{Result, SpeckleError};

use super::fft::{to_complex, Fft2dPlan};

/// Squared DFT magnitude of a window, zero frequency at `[0, 0]`.
pub type PowerSpectrum = Array2<f32>;

/// Real part of the inverse DFT of an accumulated power spectrum, zero lag
/// at `[0, 0]`.
pub type Autocorrelation = Array2<f32>;

/// Forward/inverse transforms for one fixed square window size.
///
/// Plans are built once when the processor activates and reused for every
/// frame.
pub struct SpectralEngine {
    size: usize,
    forward: Fft2dPlan,
    inverse: Fft2dPlan,
}

impl SpectralEngine {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: Fft2dPlan::new(&mut planner, size, size, FftDirection::Forward),
            inverse: Fft2dPlan::new(&mut planner, size, size, FftDirection::Inverse),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Factor by which `inverse(forward(x))` exceeds `x`.
    pub fn scale_factor(&self) -> f64 {
        (self.size * self.size) as f64
    }

    /// Power spectrum `re² + im²` of a real window. No shift, no normalization.
    pub fn forward(&self, window: &Array2<f32>) -> Result<PowerSpectrum> {
        self.check_dim(window)?;
        let mut spectrum = to_complex(window);
        self.forward.process(&mut spectrum)?;
        Ok(spectrum.mapv(|c| c.norm_sqr() as f32))
    }

    /// Inverse transform of a real spectrum, keeping only the real channel.
    pub fn inverse(&self, spectrum: &PowerSpectrum) -> Result<Autocorrelation> {
        self.check_dim(spectrum)?;
        let mut work = to_complex(spectrum);
        self.inverse.process(&mut work)?;
        Ok(work.mapv(|c| c.re as f32))
    }

    fn check_dim(&self, data: &Array2<f32>) -> Result<()> {
        if data.dim() != (self.size, self.size) {
            return Err(SpeckleError::mismatch((self.size, self.size), data.dim()));
        }
        Ok(())
    }
}
