use ndarray::Array2;
use tracing::debug;

use crate::frame::Frame;

/// Crop the centered `window_size` x `window_size` block out of a strided
/// 8-bit buffer.
///
/// The crop origin is `(source_width/2 - window_size/2, source_height/2 - window_size/2)`.
/// The window must keep at least one pixel of margin on every side of the
/// visible area, and every addressed byte must exist in `source`. When that
/// does not hold the result is an all-zero buffer of the requested size: the
/// live path never fails on geometry.
pub fn extract_window(
    source: &[u8],
    source_width: usize,
    source_height: usize,
    source_stride: usize,
    window_size: usize,
) -> Vec<u8> {
    let mut window = vec![0u8; window_size * window_size];

    let Some((x, y)) = window_origin(source_width, source_height, window_size) else {
        debug!(source_width, source_height, window_size, "Window does not fit inside frame");
        return window;
    };

    if source_stride < source_width {
        debug!(source_width, source_stride, "Stride shorter than row width");
        return window;
    }

    let last_byte = (y + window_size - 1) * source_stride + x + window_size;
    if last_byte > source.len() {
        debug!(
            needed = last_byte,
            available = source.len(),
            "Source buffer too short for window"
        );
        return window;
    }

    for (row, dst) in window.chunks_exact_mut(window_size).enumerate() {
        let start = (y + row) * source_stride + x;
        dst.copy_from_slice(&source[start..start + window_size]);
    }

    window
}

/// Extract the centered window of a frame.
pub fn extract_frame_window(frame: &Frame, window_size: usize) -> Vec<u8> {
    extract_window(
        &frame.data,
        frame.width,
        frame.height,
        frame.stride,
        window_size,
    )
}

/// Convert an extracted 8-bit window to a float matrix holding the raw
/// 0..255 intensities.
pub fn window_to_array(window: &[u8], window_size: usize) -> Array2<f32> {
    Array2::from_shape_fn((window_size, window_size), |(r, c)| {
        window[r * window_size + c] as f32
    })
}

/// Top-left corner of the centered window, if it lies strictly inside the
/// frame with a one-pixel margin.
fn window_origin(width: usize, height: usize, window_size: usize) -> Option<(usize, usize)> {
    let x = (width / 2).checked_sub(window_size / 2)?;
    let y = (height / 2).checked_sub(window_size / 2)?;
    if x > 0 && y > 0 && x + window_size < width && y + window_size < height {
        Some((x, y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_requires_margin() {
        assert_eq!(window_origin(10, 10, 4), Some((3, 3)));
        // Window as wide as the frame: no margin left
        assert_eq!(window_origin(8, 8, 8), None);
        // One pixel short on the right edge
        assert_eq!(window_origin(10, 10, 9), None);
        assert_eq!(window_origin(10, 10, 8), Some((1, 1)));
        assert_eq!(window_origin(4, 4, 8), None);
    }

    #[test]
    fn window_to_array_keeps_raw_values() {
        let arr = window_to_array(&[0, 1, 254, 255], 2);
        assert_eq!(arr[[0, 0]], 0.0);
        assert_eq!(arr[[0, 1]], 1.0);
        assert_eq!(arr[[1, 0]], 254.0);
        assert_eq!(arr[[1, 1]], 255.0);
    }
}
