use ndarray::Array2;

/// Swap the four quadrants in place so that element `[0, 0]` lands at the
/// center: top-left with bottom-right, top-right with bottom-left.
///
/// Quadrants are `rows/2 x cols/2`. With an odd dimension the last row or
/// column stays where it is, so the operation is only self-inverse for even
/// shapes.
pub fn shift_quadrants<T>(m: &mut Array2<T>) {
    let (rows, cols) = m.dim();
    let cy = rows / 2;
    let cx = cols / 2;

    for r in 0..cy {
        for c in 0..cx {
            m.swap([r, c], [r + cy, c + cx]);
            m.swap([r, c + cx], [r + cy, c]);
        }
    }
}
