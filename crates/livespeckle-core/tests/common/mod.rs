#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use livespeckle_core::frame::{Frame, FrameMetadata};
use livespeckle_core::io::ser::SER_HEADER_SIZE;
use livespeckle_core::pipeline::ArtifactSink;
use livespeckle_core::visual::{Artifact, ArtifactKind};

// ---------------------------------------------------------------------------
// SER builders
// ---------------------------------------------------------------------------

/// Build a SER file header for mono 8-bit frames.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0 (little-endian)
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file. The file lives as long as the
/// returned handle.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Black frame with one bright pixel at `(width/2, height/2)`.
pub fn point_source_frame(width: usize, height: usize, value: u8) -> Frame {
    let mut data = vec![0u8; width * height];
    data[(height / 2) * width + width / 2] = value;
    Frame::mono8(width, height, data)
}

/// Deterministic pseudo-random bytes (xorshift32).
pub fn noise_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

pub fn noise_frame(width: usize, height: usize, seed: u32) -> Frame {
    Frame::mono8(width, height, noise_bytes(width * height, seed)).with_metadata(FrameMetadata {
        sequence: seed as u64,
        timestamp_us: None,
    })
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Records every artifact kind and error message it receives.
#[derive(Default)]
pub struct RecordingSink {
    pub artifacts: Mutex<Vec<(ArtifactKind, Artifact)>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn last(&self, kind: ArtifactKind) -> Option<Artifact> {
        self.artifacts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, a)| a.clone())
    }

    pub fn total(&self) -> usize {
        self.artifacts.lock().unwrap().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl ArtifactSink for RecordingSink {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact) {
        self.artifacts.lock().unwrap().push((kind, artifact));
    }

    fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Sleeps on every `Window` artifact, keeping the worker busy.
pub struct SlowSink {
    pub delay: Duration,
    pub inner: RecordingSink,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingSink::default(),
        }
    }
}

impl ArtifactSink for SlowSink {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact) {
        if kind == ArtifactKind::Window {
            std::thread::sleep(self.delay);
        }
        self.inner.on_artifact(kind, artifact);
    }

    fn on_error(&self, message: &str) {
        self.inner.on_error(message);
    }
}

/// Panics the first time an accumulated spectrum is delivered.
#[derive(Default)]
pub struct PanicOnceSink {
    pub fired: AtomicBool,
    pub inner: RecordingSink,
}

impl ArtifactSink for PanicOnceSink {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact) {
        if kind == ArtifactKind::AccumulatedSpectrum && !self.fired.swap(true, Ordering::SeqCst) {
            panic!("display surface went away");
        }
        self.inner.on_artifact(kind, artifact);
    }

    fn on_error(&self, message: &str) {
        self.inner.on_error(message);
    }
}
