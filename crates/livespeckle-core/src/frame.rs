/// Pixel encoding of a raw frame buffer.
///
/// Only `Mono8` frames are processed; everything else is handed through by
/// the host untouched and ignored by the speckle cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    Mono8,
    Mono16,
    Bayer8,
    Bayer16,
}

impl PixelFormat {
    pub fn is_mono8(&self) -> bool {
        matches!(self, Self::Mono8)
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mono8 => write!(f, "Mono8"),
            Self::Mono16 => write!(f, "Mono16"),
            Self::Bayer8 => write!(f, "Bayer8"),
            Self::Bayer16 => write!(f, "Bayer16"),
        }
    }
}

/// A single raw camera frame as delivered by the acquisition host.
///
/// Rows are `stride` bytes apart; `stride` exceeds `width` when the sensor
/// region of interest is narrower than the readout line.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    pub metadata: FrameMetadata,
}

impl Frame {
    /// Tightly packed 8-bit mono frame (`stride == width`).
    pub fn mono8(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width,
            format: PixelFormat::Mono8,
            data,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub sequence: u64,
    pub timestamp_us: Option<u64>,
}

/// Metadata about a recorded source file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: std::path::PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub format: PixelFormat,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}
