use ndarray::Array2;

use livespeckle_core::visual::{
    false_color, false_color_visualization, grayscale_visualization, upscale_nearest_2x,
    window_visualization, VisuOptions,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_ramp_array(h: usize, w: usize) -> Array2<f32> {
    Array2::from_shape_fn((h, w), |(r, c)| (r * w + c) as f32 - 7.5)
}

fn argmin_argmax(m: &Array2<f32>) -> ((usize, usize), (usize, usize)) {
    let mut lo = ((0, 0), f32::INFINITY);
    let mut hi = ((0, 0), f32::NEG_INFINITY);
    for (idx, &v) in m.indexed_iter() {
        if v < lo.1 {
            lo = (idx, v);
        }
        if v > hi.1 {
            hi = (idx, v);
        }
    }
    (lo.0, hi.0)
}

// ---------------------------------------------------------------------------
// grayscale_visualization
// ---------------------------------------------------------------------------

#[test]
fn test_grayscale_min_is_zero_max_is_255() {
    let m = make_ramp_array(8, 8);
    let img = grayscale_visualization(&m, VisuOptions::default());
    let ((lr, lc), (hr, hc)) = argmin_argmax(&m);
    assert_eq!(img.get_pixel(lc as u32, lr as u32).0[0], 0);
    assert_eq!(img.get_pixel(hc as u32, hr as u32).0[0], 255);
}

#[test]
fn test_grayscale_extremes_after_log_scale() {
    let m = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) as f32 + 1.0).powi(3));
    let opts = VisuOptions {
        log_scale: true,
        ..VisuOptions::default()
    };
    let img = grayscale_visualization(&m, opts);
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
    assert_eq!(img.get_pixel(7, 7).0[0], 255);
}

#[test]
fn test_grayscale_log_handles_zero_and_negative() {
    let mut m = Array2::from_elem((4, 4), 10.0f32);
    m[[0, 0]] = 0.0;
    m[[1, 1]] = -5.0;
    m[[3, 3]] = 1e6;
    let opts = VisuOptions {
        log_scale: true,
        ..VisuOptions::default()
    };
    let img = grayscale_visualization(&m, opts);
    // Both floored to the same epsilon: both at the bottom
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
    assert_eq!(img.get_pixel(1, 1).0[0], 0);
    assert_eq!(img.get_pixel(3, 3).0[0], 255);
    let mid = img.get_pixel(2, 2).0[0];
    assert!(mid > 0 && mid < 255);
}

#[test]
fn test_grayscale_constant_matrix_is_black() {
    let img = grayscale_visualization(&Array2::from_elem((4, 4), 3.0), VisuOptions::spectrum());
    assert!(img.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn test_grayscale_shift_centers_origin() {
    let mut m = Array2::<f32>::zeros((8, 8));
    m[[0, 0]] = 1.0;
    let opts = VisuOptions {
        shift_quadrants: true,
        ..VisuOptions::default()
    };
    let img = grayscale_visualization(&m, opts);
    assert_eq!(img.get_pixel(4, 4).0[0], 255);
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
}

#[test]
fn test_grayscale_does_not_modify_input() {
    let m = make_ramp_array(4, 4);
    let copy = m.clone();
    let _ = grayscale_visualization(&m, VisuOptions::spectrum());
    assert_eq!(m, copy);
}

#[test]
fn test_grayscale_resize_doubles() {
    let m = make_ramp_array(4, 6);
    let img = grayscale_visualization(&m, VisuOptions::default().with_resize(true));
    assert_eq!(img.dimensions(), (12, 8));
    let small = grayscale_visualization(&m, VisuOptions::default());
    for y in 0..8 {
        for x in 0..12 {
            assert_eq!(img.get_pixel(x, y), small.get_pixel(x / 2, y / 2));
        }
    }
}

// ---------------------------------------------------------------------------
// false color
// ---------------------------------------------------------------------------

#[test]
fn test_false_color_first_band_ramps_green() {
    let [r, g, b] = false_color(0.125, 0.0, 1.0);
    assert_eq!(r, 0.0);
    assert!((g - 0.5).abs() < 1e-12);
    // Blue is never assigned in this band and keeps its starting value
    assert_eq!(b, 1.0);
}

#[test]
fn test_false_color_last_band_keeps_red() {
    let [r, g, b] = false_color(0.875, 0.0, 1.0);
    assert_eq!(r, 1.0);
    assert!((g - 0.5).abs() < 1e-12);
    assert_eq!(b, 0.0);
}

#[test]
fn test_false_color_respects_custom_range() {
    assert_eq!(false_color(10.0, 10.0, 20.0), false_color(0.0, 0.0, 1.0));
    assert_eq!(false_color(15.0, 10.0, 20.0), false_color(0.5, 0.0, 1.0));
}

#[test]
fn test_false_color_visualization_extremes() {
    let m = make_ramp_array(4, 4);
    let img = false_color_visualization(&m, VisuOptions::default());
    // minimum -> blue, maximum -> red
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255]);
    assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0]);
}

#[test]
fn test_false_color_visualization_resize() {
    let m = make_ramp_array(4, 4);
    let img = false_color_visualization(&m, VisuOptions::default().with_resize(true));
    assert_eq!(img.dimensions(), (8, 8));
    assert_eq!(img.get_pixel(7, 7).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(6, 6).0, [255, 0, 0]);
}

// ---------------------------------------------------------------------------
// window and upscale
// ---------------------------------------------------------------------------

#[test]
fn test_window_visualization_copies_bytes() {
    let bytes: Vec<u8> = (0..16).collect();
    let img = window_visualization(&bytes, 4, false);
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.get_pixel(1, 2).0[0], 9);
}

#[test]
fn test_window_visualization_bad_length_is_black() {
    let img = window_visualization(&[1, 2, 3], 4, true);
    assert_eq!(img.dimensions(), (8, 8));
    assert!(img.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn test_upscale_nearest_replicates_pixels() {
    let img = window_visualization(&[10, 20, 30, 40], 2, false);
    let up = upscale_nearest_2x(&img);
    assert_eq!(up.dimensions(), (4, 4));
    assert_eq!(up.get_pixel(1, 1).0[0], 10);
    assert_eq!(up.get_pixel(2, 0).0[0], 20);
    assert_eq!(up.get_pixel(0, 3).0[0], 30);
    assert_eq!(up.get_pixel(3, 3).0[0], 40);
}
