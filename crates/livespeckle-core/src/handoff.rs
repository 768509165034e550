use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::frame::Frame;

/// Observable state of the handoff slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandoffState {
    /// No frame waiting, worker idle.
    Empty,
    /// A frame is waiting to be claimed.
    Occupied,
    /// The worker owns a frame and has not released the slot yet.
    Claimed,
}

/// Result of [`FrameHandoff::offer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The frame was copied into the slot and the worker signalled.
    Accepted,
    /// The worker was busy (or the slot contended); the frame was discarded.
    Dropped,
}

enum Slot {
    Empty,
    Occupied(Frame),
    Claimed,
}

/// Single-slot, drop-when-busy handoff between the frame-arrival path and
/// the processing worker.
///
/// `offer` never blocks: while the worker is processing, incoming frames are
/// discarded rather than queued. An unclaimed frame is replaced by a newer
/// one, so the worker always picks up the freshest frame.
pub struct FrameHandoff {
    slot: Mutex<Slot>,
    available: Condvar,
    busy: AtomicBool,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

impl FrameHandoff {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            available: Condvar::new(),
            busy: AtomicBool::new(false),
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Hand a frame to the worker if it is ready for one. Called from the
    /// real-time path; costs at most one frame copy.
    pub fn offer(&self, frame: &Frame) -> OfferOutcome {
        // Checked before cloning so a busy worker costs nothing.
        if self.busy.load(Ordering::Acquire) {
            return self.drop_frame(frame);
        }

        let copy = frame.clone();
        let mut slot = match self.slot.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(err)) => err.into_inner(),
            Err(TryLockError::WouldBlock) => return self.drop_frame(frame),
        };

        if matches!(*slot, Slot::Claimed) {
            drop(slot);
            return self.drop_frame(frame);
        }
        if let Slot::Occupied(stale) = &*slot {
            trace!(sequence = stale.metadata.sequence, "Replacing unclaimed frame");
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }

        *slot = Slot::Occupied(copy);
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();
        OfferOutcome::Accepted
    }

    /// Wait up to `timeout` for a frame and claim it.
    ///
    /// Returns `None` on timeout so the caller can re-check its run flag.
    /// Spurious wake-ups keep waiting until the original deadline.
    pub fn wait_and_claim(&self, timeout: Duration) -> Option<Frame> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock_slot();

        loop {
            if matches!(*slot, Slot::Occupied(_)) {
                if let Slot::Occupied(frame) = std::mem::replace(&mut *slot, Slot::Claimed) {
                    self.busy.store(true, Ordering::Release);
                    return Some(frame);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }

            let (guard, _) = self
                .available
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
        }
    }

    /// Mark the claimed frame as fully processed so the next offer succeeds.
    pub fn release(&self) {
        let mut slot = self.lock_slot();
        if matches!(*slot, Slot::Claimed) {
            *slot = Slot::Empty;
        }
        self.busy.store(false, Ordering::Release);
    }

    pub fn state(&self) -> HandoffState {
        match *self.lock_slot() {
            Slot::Empty => HandoffState::Empty,
            Slot::Occupied(_) => HandoffState::Occupied,
            Slot::Claimed => HandoffState::Claimed,
        }
    }

    /// Frames copied into the slot.
    pub fn accepted_frames(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Frames discarded, including unclaimed frames replaced by newer ones.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn drop_frame(&self, frame: &Frame) -> OfferOutcome {
        trace!(sequence = frame.metadata.sequence, "Worker busy, dropping frame");
        self.dropped.fetch_add(1, Ordering::Relaxed);
        OfferOutcome::Dropped
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FrameHandoff {
    fn default() -> Self {
        Self::new()
    }
}
