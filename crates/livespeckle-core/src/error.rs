use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeckleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Dimension mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}

impl SpeckleError {
    /// Build a `DimensionMismatch` from two `(rows, cols)` shapes.
    pub fn mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            expected_rows: expected.0,
            expected_cols: expected.1,
            rows: got.0,
            cols: got.1,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpeckleError>;
