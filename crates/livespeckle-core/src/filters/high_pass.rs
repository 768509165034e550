use ndarray::Array2;

use super::box_blur::box_blur;

/// Subtract the local box mean from a centered autocorrelation.
///
/// Removes the broad seeing pedestal so the narrow correlation peaks stand
/// out. `filter_size <= 1` returns an identical copy. Even sizes are used
/// as given, shifting the peak by half a pixel.
///
/// The input must already be quadrant-shifted; blurring across the wrap-around
/// seam of an unshifted autocorrelation corrupts the result.
pub fn high_pass(autocorrelation: &Array2<f32>, filter_size: u32) -> Array2<f32> {
    if filter_size <= 1 {
        return autocorrelation.clone();
    }
    let blurred = box_blur(autocorrelation, filter_size as usize);
    autocorrelation - &blurred
}
