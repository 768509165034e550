pub mod accumulator;
pub mod engine;
pub mod fft;
pub mod shift;

pub use accumulator::Accumulator;
pub use engine::{Autocorrelation, PowerSpectrum, SpectralEngine};
pub use shift::shift_quadrants;
