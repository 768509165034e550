use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::{ConfigSource, SpeckleConfig};
use crate::consts::{DEFAULT_WINDOW_SIZE, WORKER_THREAD_NAME, WORKER_WAIT_TIMEOUT};
use crate::error::{Result, SpeckleError};
use crate::frame::Frame;
use crate::handoff::{FrameHandoff, OfferOutcome};

use super::cycle::SpeckleCycle;
use super::types::{ArtifactSink, WorkerState, WorkerStats};

/// Activation-time parameters; fixed for the lifetime of a processor.
#[derive(Clone, Debug)]
pub struct ProcessorOptions {
    pub window_size: usize,
    /// Upper bound on how long the worker waits for a frame before
    /// re-checking for a stop request.
    pub wait_timeout: Duration,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            wait_timeout: WORKER_WAIT_TIMEOUT,
        }
    }
}

impl From<&SpeckleConfig> for ProcessorOptions {
    fn from(config: &SpeckleConfig) -> Self {
        Self {
            window_size: config.window_size,
            ..Self::default()
        }
    }
}

const STATE_RUNNING: u8 = 0;
const STATE_STOPPING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// State shared between the handle and the worker thread.
struct WorkerShared {
    handoff: FrameHandoff,
    state: AtomicU8,
}

impl WorkerShared {
    fn state(&self) -> WorkerState {
        match self.state.load(Ordering::Acquire) {
            STATE_RUNNING => WorkerState::Running,
            STATE_STOPPING => WorkerState::Stopping,
            _ => WorkerState::Stopped,
        }
    }

    fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_RUNNING
    }
}

/// Entry point: activates the live speckle processor.
pub struct SpeckleProcessor;

impl SpeckleProcessor {
    /// Create the accumulator and handoff slot and start the worker thread.
    pub fn start(
        options: ProcessorOptions,
        config: Arc<dyn ConfigSource>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Result<ProcessorHandle> {
        if options.window_size < 2 {
            return Err(SpeckleError::InvalidConfig(format!(
                "window_size must be at least 2, got {}",
                options.window_size
            )));
        }

        let shared = Arc::new(WorkerShared {
            handoff: FrameHandoff::new(),
            state: AtomicU8::new(STATE_RUNNING),
        });
        let cycle = SpeckleCycle::new(options.window_size);

        let thread = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn({
                let shared = Arc::clone(&shared);
                let timeout = options.wait_timeout;
                move || worker_loop(cycle, shared, config, sink, timeout)
            })
            .map_err(|e| SpeckleError::WorkerSpawn(e.to_string()))?;

        info!(
            window_size = options.window_size,
            wait_timeout_ms = options.wait_timeout.as_millis() as u64,
            "Speckle processor started"
        );

        Ok(ProcessorHandle {
            shared,
            thread: Some(thread),
        })
    }
}

/// Handle to a running processor. Dropping it stops the worker.
pub struct ProcessorHandle {
    shared: Arc<WorkerShared>,
    thread: Option<JoinHandle<WorkerStats>>,
}

impl ProcessorHandle {
    /// Frame-arrival hook. Never blocks on the worker.
    pub fn offer(&self, frame: &Frame) -> OfferOutcome {
        if !self.shared.is_running() {
            return OfferOutcome::Dropped;
        }
        self.shared.handoff.offer(frame)
    }

    pub fn handoff(&self) -> &FrameHandoff {
        &self.shared.handoff
    }

    pub fn state(&self) -> WorkerState {
        self.shared.state()
    }

    /// Request a stop and wait for the worker to exit.
    ///
    /// Returns once the worker has finished any in-flight cycle; no artifact
    /// is emitted after this returns.
    pub fn stop(mut self) -> WorkerStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> WorkerStats {
        let Some(thread) = self.thread.take() else {
            return WorkerStats::default();
        };
        self.shared.state.store(STATE_STOPPING, Ordering::Release);
        debug!("Waiting for speckle worker to exit");
        // The worker catches cycle panics itself; a join error is a bug in the loop.
        let stats = thread.join().unwrap_or_default();
        self.shared.state.store(STATE_STOPPED, Ordering::Release);
        info!(
            processed = stats.frames_processed,
            cycles = stats.cycles_completed,
            failures = stats.failures,
            dropped = self.shared.handoff.dropped_frames(),
            "Speckle processor stopped"
        );
        stats
    }
}

impl Drop for ProcessorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    mut cycle: SpeckleCycle,
    shared: Arc<WorkerShared>,
    config: Arc<dyn ConfigSource>,
    sink: Arc<dyn ArtifactSink>,
    timeout: Duration,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while shared.is_running() {
        let Some(frame) = shared.handoff.wait_and_claim(timeout) else {
            continue;
        };

        let snapshot = config.snapshot();
        match cycle.process_guarded(&frame, &snapshot, sink.as_ref()) {
            Some(report) if report.skipped => stats.frames_skipped += 1,
            Some(report) => {
                stats.frames_processed += 1;
                if report.completed() {
                    stats.cycles_completed += 1;
                }
            }
            None => stats.failures += 1,
        }

        shared.handoff.release();
    }

    stats
}
