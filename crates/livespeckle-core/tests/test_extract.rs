use livespeckle_core::frame::Frame;
use livespeckle_core::io::extract::{extract_frame_window, extract_window};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Buffer where each byte encodes its position: `(row * 16 + col) % 256`.
fn coded_buffer(width: usize, height: usize, stride: usize) -> Vec<u8> {
    let mut buf = vec![0u8; stride * height];
    for row in 0..height {
        for col in 0..width {
            buf[row * stride + col] = ((row * 16 + col) % 256) as u8;
        }
    }
    buf
}

// ---------------------------------------------------------------------------
// Valid geometry
// ---------------------------------------------------------------------------

#[test]
fn test_extract_centered_crop() {
    let buf = coded_buffer(16, 16, 16);
    let window = extract_window(&buf, 16, 16, 16, 4);
    // origin = (8 - 2, 8 - 2) = (6, 6)
    assert_eq!(window.len(), 16);
    for row in 0..4 {
        for col in 0..4 {
            let expected = ((row + 6) * 16 + col + 6) as u8;
            assert_eq!(window[row * 4 + col], expected, "at ({row},{col})");
        }
    }
}

#[test]
fn test_extract_honors_stride() {
    // 12x10 visible area inside 20-byte rows; padding bytes are 0xFF.
    let (width, height, stride) = (12, 10, 20);
    let mut buf = vec![0xFFu8; stride * height];
    for row in 0..height {
        for col in 0..width {
            buf[row * stride + col] = (row * width + col) as u8;
        }
    }
    let window = extract_window(&buf, width, height, stride, 4);
    // origin = (6 - 2, 5 - 2) = (4, 3)
    for row in 0..4 {
        for col in 0..4 {
            let expected = ((row + 3) * width + col + 4) as u8;
            assert_eq!(window[row * 4 + col], expected);
        }
    }
    assert!(!window.contains(&0xFF));
}

#[test]
fn test_extract_frame_window_uses_frame_geometry() {
    let frame = Frame::mono8(16, 16, coded_buffer(16, 16, 16));
    assert_eq!(
        extract_frame_window(&frame, 4),
        extract_window(&frame.data, 16, 16, 16, 4)
    );
}

#[test]
fn test_extract_output_length_always_window_squared() {
    for &(w, h, size) in &[(64, 64, 8), (64, 48, 16), (33, 35, 7), (10, 10, 8)] {
        let buf = coded_buffer(w, h, w);
        assert_eq!(extract_window(&buf, w, h, w, size).len(), size * size);
    }
}

// ---------------------------------------------------------------------------
// Invalid geometry returns zeros
// ---------------------------------------------------------------------------

#[test]
fn test_extract_window_larger_than_frame_is_zero() {
    let buf = vec![200u8; 8 * 8];
    let window = extract_window(&buf, 8, 8, 8, 16);
    assert_eq!(window.len(), 256);
    assert!(window.iter().all(|&v| v == 0));
}

#[test]
fn test_extract_window_without_margin_is_zero() {
    // Window touches the left and top edge (origin 0): rejected.
    let buf = vec![200u8; 8 * 8];
    let window = extract_window(&buf, 8, 8, 8, 8);
    assert_eq!(window.len(), 64);
    assert!(window.iter().all(|&v| v == 0));
}

#[test]
fn test_extract_margin_bounded_by_width_not_stride() {
    // origin x = 5 - 4 = 1; x + 9 = 10 reaches the visible edge even though
    // the 16-byte rows would hold the window.
    let buf = coded_buffer(10, 20, 16);
    let window = extract_window(&buf, 10, 20, 16, 9);
    assert!(window.iter().all(|&v| v == 0));

    // One more visible column restores the margin.
    let buf = coded_buffer(11, 20, 16);
    let window = extract_window(&buf, 11, 20, 16, 9);
    // origin = (5 - 4, 10 - 4) = (1, 6)
    assert_eq!(window[0], (6 * 16 + 1) as u8);
    assert_eq!(window[8], (6 * 16 + 9) as u8);
}

#[test]
fn test_extract_short_buffer_is_zero() {
    let buf = vec![200u8; 10];
    let window = extract_window(&buf, 16, 16, 16, 4);
    assert_eq!(window.len(), 16);
    assert!(window.iter().all(|&v| v == 0));
}

#[test]
fn test_extract_stride_shorter_than_width_is_zero() {
    let buf = vec![200u8; 16 * 16];
    let window = extract_window(&buf, 16, 16, 8, 4);
    assert!(window.iter().all(|&v| v == 0));
}

#[test]
fn test_extract_empty_source_is_zero() {
    let window = extract_window(&[], 0, 0, 0, 4);
    assert_eq!(window, vec![0u8; 16]);
}
