use std::time::Duration;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Side length of the square processing window, in pixels.
pub const DEFAULT_WINDOW_SIZE: usize = 128;

/// Number of accepted frames summed before each inverse transform.
pub const DEFAULT_ACCUMULATION_LENGTH: u32 = 10;

/// Box kernel size used by the autocorrelation high-pass step.
/// Values <= 1 disable the filter.
pub const DEFAULT_FILTER_SIZE: u32 = 5;

/// How long the worker blocks on the handoff before re-checking its run flag.
/// This bounds shutdown latency.
pub const WORKER_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Floor applied before taking the natural log in visualizations, so that
/// zero or negative power values never produce -inf.
pub const LOG_FLOOR: f32 = 1e-10;

/// Maximum 8-bit display value.
pub const DISPLAY_MAX: f32 = 255.0;

/// Name given to the background processing thread.
pub const WORKER_THREAD_NAME: &str = "livespeckle-worker";
