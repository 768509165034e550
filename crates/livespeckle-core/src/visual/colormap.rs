use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::spectral::shift_quadrants;

use super::{finite_min_max, upscale_nearest_2x, VisuOptions};

/// Map a scalar to `[red, green, blue]` in `[0, 1]` through a four-band
/// piecewise-linear ramp.
///
/// Every channel starts at 1.0 and each band only assigns two of them; the
/// third keeps its starting value. `v` is clamped to `[vmin, vmax]` first.
pub fn false_color(v: f64, vmin: f64, vmax: f64) -> [f64; 3] {
    let mut red = 1.0;
    let mut green = 1.0;
    let mut blue = 1.0;

    // Not `f64::clamp`: a reversed range must not panic on the display path.
    let v = v.max(vmin).min(vmax);
    let dv = vmax - vmin;

    if v < vmin + 0.25 * dv {
        red = 0.0;
        green = 4.0 * (v - vmin) / dv;
    } else if v < vmin + 0.5 * dv {
        red = 0.0;
        blue = 1.0 + 4.0 * (vmin + 0.25 * dv - v) / dv;
    } else if v < vmin + 0.75 * dv {
        red = 4.0 * (v - vmin - 0.5 * dv) / dv;
        blue = 0.0;
    } else {
        green = 1.0 + 4.0 * (vmin + 0.75 * dv - v) / dv;
        blue = 0.0;
    }

    [red, green, blue]
}

/// Render a float matrix through the false-color ramp.
///
/// Optional quadrant shift, min–max normalization to `[0, 1]`, color mapping,
/// channels scaled by 255 and truncated, optional 2x upscale last. A constant
/// matrix maps every pixel to the bottom of the ramp.
pub fn false_color_visualization(matrix: &Array2<f32>, options: VisuOptions) -> RgbImage {
    let mut work = matrix.clone();
    if options.shift_quadrants {
        shift_quadrants(&mut work);
    }

    let (lo, span) = match finite_min_max(work.iter()) {
        Some((lo, hi)) if hi > lo => (lo as f64, (hi - lo) as f64),
        _ => (0.0, 0.0),
    };

    let (rows, cols) = work.dim();
    let img = RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = work[[y as usize, x as usize]] as f64;
        let normalized = if span > 0.0 && v.is_finite() {
            (v - lo) / span
        } else {
            0.0
        };
        let [r, g, b] = false_color(normalized, 0.0, 1.0);
        Rgb([(255.0 * r) as u8, (255.0 * g) as u8, (255.0 * b) as u8])
    });

    if options.resize {
        upscale_nearest_2x(&img)
    } else {
        img
    }
}
