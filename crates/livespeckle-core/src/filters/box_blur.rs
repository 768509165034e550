use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Normalized `size x size` box blur with replicated borders.
///
/// The kernel anchor sits at `size / 2`, so for even sizes the averaging
/// window extends one pixel further left/up than right/down.
///
/// Each pass keeps a running sum per line, so the cost is independent of
/// `size`; kernels far larger than the matrix average mostly border values.
pub fn box_blur(data: &Array2<f32>, size: usize) -> Array2<f32> {
    if size <= 1 || data.is_empty() {
        return data.clone();
    }
    let row_pass = blur_axis(data, Axis(1), size);
    blur_axis(&row_pass, Axis(0), size)
}

/// Blur every lane running along `axis`.
fn blur_axis(data: &Array2<f32>, axis: Axis, size: usize) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros(data.dim());
    let zip = Zip::from(data.lanes(axis)).and(out.lanes_mut(axis));
    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|src, dst| blur_line(src, dst, size));
    } else {
        zip.for_each(|src, dst| blur_line(src, dst, size));
    }
    out
}

/// 1D box average over `[i - size/2, i - size/2 + size - 1]`, indices clamped
/// to the line.
fn blur_line(src: ArrayView1<f32>, mut dst: ArrayViewMut1<f32>, size: usize) {
    let n = src.len() as i64;
    let k = size as i64;
    let anchor = k / 2;
    let at = |t: i64| src[t.clamp(0, n - 1) as usize] as f64;

    // Window of the first output, split into the clamped head, the in-range
    // middle and the clamped tail.
    let lo = -anchor;
    let hi = k - 1 - anchor;
    let head = (hi.min(-1) - lo + 1).max(0);
    let tail = (hi - lo.max(n) + 1).max(0);
    let mut sum = head as f64 * at(0) + tail as f64 * at(n - 1);
    for t in lo.max(0)..=hi.min(n - 1) {
        sum += at(t);
    }

    let scale = 1.0 / k as f64;
    for (i, out) in dst.iter_mut().enumerate() {
        *out = (sum * scale) as f32;
        let i = i as i64;
        sum += at(i - anchor + k) - at(i - anchor);
    }
}
