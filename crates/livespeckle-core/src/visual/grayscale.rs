use image::{GrayImage, Luma};
use ndarray::Array2;

use crate::consts::{DISPLAY_MAX, LOG_FLOOR};
use crate::spectral::shift_quadrants;

use super::{finite_min_max, upscale_nearest_2x, VisuOptions};

/// Render a float matrix as an 8-bit grayscale image.
///
/// Steps, in order: optional quadrant shift, optional natural log (values
/// below [`LOG_FLOOR`] are floored first), min–max normalization so the
/// minimum maps to 0 and the maximum to 255, optional 2x upscale. A constant
/// matrix renders all black.
pub fn grayscale_visualization(matrix: &Array2<f32>, options: VisuOptions) -> GrayImage {
    let mut work = matrix.clone();
    if options.shift_quadrants {
        shift_quadrants(&mut work);
    }
    if options.log_scale {
        work.mapv_inplace(|v| v.max(LOG_FLOOR).ln());
    }

    let (rows, cols) = work.dim();
    let scale = match finite_min_max(work.iter()) {
        Some((lo, hi)) if hi > lo => Some((lo, DISPLAY_MAX / (hi - lo))),
        _ => None,
    };

    let img = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = work[[y as usize, x as usize]];
        let level = match scale {
            Some((lo, factor)) => ((v - lo) * factor).round().clamp(0.0, DISPLAY_MAX) as u8,
            None => 0,
        };
        Luma([level])
    });

    if options.resize {
        upscale_nearest_2x(&img)
    } else {
        img
    }
}

/// Render the raw extracted window, optionally upscaled 2x.
///
/// A buffer whose length does not match `size * size` renders black.
pub fn window_visualization(window: &[u8], size: usize, resize: bool) -> GrayImage {
    let side = size as u32;
    let img = GrayImage::from_raw(side, side, window.to_vec())
        .unwrap_or_else(|| GrayImage::new(side, side));
    if resize {
        upscale_nearest_2x(&img)
    } else {
        img
    }
}
