use std::sync::mpsc;

use crate::spectral::{Autocorrelation, PowerSpectrum};
use crate::visual::{Artifact, ArtifactKind};

/// Receiver of everything the worker produces.
///
/// Called on the worker thread; a slow sink stalls frame processing, since
/// nothing is queued beyond the single handoff slot.
pub trait ArtifactSink: Send + Sync {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact);

    /// A cycle failed and was abandoned. The worker keeps running.
    fn on_error(&self, _message: &str) {}
}

/// Sink that discards everything.
pub struct NullSink;

impl ArtifactSink for NullSink {
    fn on_artifact(&self, _kind: ArtifactKind, _artifact: Artifact) {}
}

/// Event forwarded by [`ChannelSink`].
#[derive(Debug)]
pub enum SinkEvent {
    Artifact { kind: ArtifactKind, artifact: Artifact },
    Error { message: String },
}

/// Sink that forwards artifacts and errors over an mpsc channel, e.g. to a
/// display thread. Send failures (receiver gone) are ignored.
pub struct ChannelSink {
    tx: mpsc::Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SinkEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::Receiver<SinkEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl ArtifactSink for ChannelSink {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact) {
        let _ = self.tx.send(SinkEvent::Artifact { kind, artifact });
    }

    fn on_error(&self, message: &str) {
        let _ = self.tx.send(SinkEvent::Error {
            message: message.to_string(),
        });
    }
}

/// Float results of a completed accumulation cycle.
#[derive(Clone, Debug)]
pub struct CycleResult {
    /// Accumulated power spectrum, zero frequency at `[0, 0]`.
    pub accumulated_spectrum: PowerSpectrum,
    /// Quadrant-shifted, high-pass filtered autocorrelation.
    pub autocorrelation: Autocorrelation,
}

/// Outcome of feeding one frame through the cycle.
#[derive(Clone, Debug, Default)]
pub struct CycleReport {
    /// Spectra in the accumulator after this frame (before any reset).
    pub accumulated: usize,
    /// The frame was not a processable format and was ignored.
    pub skipped: bool,
    /// Present when this frame completed an accumulation cycle.
    pub result: Option<CycleResult>,
}

impl CycleReport {
    pub fn completed(&self) -> bool {
        self.result.is_some()
    }
}

/// Lifecycle of the background worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Stopping,
    Stopped,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Counters reported by the worker when it stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub cycles_completed: u64,
    pub failures: u64,
}
