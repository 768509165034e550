use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ACCUMULATION_LENGTH, DEFAULT_FILTER_SIZE, DEFAULT_WINDOW_SIZE};
use crate::error::{Result, SpeckleError};

/// Full processor configuration, as stored in a TOML file.
///
/// `window_size` is fixed for the lifetime of a running processor; the other
/// fields may change between cycles through a [`ConfigSource`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeckleConfig {
    /// Side of the square window cropped from the frame center.
    pub window_size: usize,
    /// Accepted frames per accumulation cycle (>= 1).
    pub accumulation_length: u32,
    /// Box kernel size of the high-pass step; <= 1 disables filtering.
    pub filter_size: u32,
    /// Upscale display artifacts 2x with nearest-neighbour sampling.
    pub resize_for_display: bool,
}

impl Default for SpeckleConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            accumulation_length: DEFAULT_ACCUMULATION_LENGTH,
            filter_size: DEFAULT_FILTER_SIZE,
            resize_for_display: false,
        }
    }
}

impl SpeckleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(SpeckleError::InvalidConfig(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }
        if self.accumulation_length == 0 {
            return Err(SpeckleError::InvalidConfig(
                "accumulation_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            accumulation_length: self.accumulation_length,
            filter_size: self.filter_size,
            resize_for_display: self.resize_for_display,
        }
    }
}

/// Per-cycle parameters, read once at the start of every worker iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub accumulation_length: u32,
    pub filter_size: u32,
    pub resize_for_display: bool,
}

impl ConfigSnapshot {
    /// Accumulation length with the `>= 1` floor applied.
    pub fn effective_accumulation_length(&self) -> usize {
        self.accumulation_length.max(1) as usize
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        SpeckleConfig::default().snapshot()
    }
}

/// Pull-based parameter access for the worker.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> ConfigSnapshot;
}

impl ConfigSource for ConfigSnapshot {
    fn snapshot(&self) -> ConfigSnapshot {
        *self
    }
}

/// Live settings that an external collaborator may change at any time.
///
/// Each field is an independent atomic; a snapshot taken during an update may
/// mix old and new values, which the worker tolerates.
#[derive(Debug)]
pub struct SharedConfig {
    accumulation_length: AtomicU32,
    filter_size: AtomicU32,
    resize_for_display: AtomicBool,
}

impl SharedConfig {
    pub fn new(initial: ConfigSnapshot) -> Self {
        Self {
            accumulation_length: AtomicU32::new(initial.accumulation_length),
            filter_size: AtomicU32::new(initial.filter_size),
            resize_for_display: AtomicBool::new(initial.resize_for_display),
        }
    }

    pub fn set_accumulation_length(&self, value: u32) {
        self.accumulation_length.store(value.max(1), Ordering::Relaxed);
    }

    pub fn set_filter_size(&self, value: u32) {
        self.filter_size.store(value, Ordering::Relaxed);
    }

    pub fn set_resize_for_display(&self, value: bool) {
        self.resize_for_display.store(value, Ordering::Relaxed);
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(ConfigSnapshot::default())
    }
}

impl ConfigSource for SharedConfig {
    fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            accumulation_length: self.accumulation_length.load(Ordering::Relaxed),
            filter_size: self.filter_size.load(Ordering::Relaxed),
            resize_for_display: self.resize_for_display.load(Ordering::Relaxed),
        }
    }
}
