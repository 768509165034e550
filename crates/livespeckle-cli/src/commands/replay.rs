use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use livespeckle_core::config::SharedConfig;
use livespeckle_core::handoff::OfferOutcome;
use livespeckle_core::io::ser::SerReader;
use livespeckle_core::pipeline::{ProcessorOptions, SpeckleProcessor};

use super::SpeckleArgs;
use crate::sink::PngSink;
use crate::summary;

#[derive(Args)]
pub struct ReplayArgs {
    /// Input SER file
    pub file: PathBuf,

    /// Playback rate in frames per second (0 replays as fast as possible)
    #[arg(long, default_value = "30")]
    pub fps: f64,

    #[command(flatten)]
    pub speckle: SpeckleArgs,
}

/// Counters kept by the capture side of a replay.
#[derive(Default)]
pub struct ReplayTotals {
    pub offered: u64,
    pub accepted: u64,
    pub dropped: u64,
}

/// Feed a recording to the live processor the way a camera would: at a fixed
/// rate, without waiting for the worker.
pub fn run(args: &ReplayArgs) -> Result<()> {
    let reader = SerReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let config = args.speckle.resolve()?;
    let output = args.speckle.prepare_output()?;

    summary::print_settings("Live Replay", &args.file, &config, output.as_deref());

    let shared = Arc::new(SharedConfig::new(config.snapshot()));
    let sink = Arc::new(PngSink::new(output));
    let handle = SpeckleProcessor::start(ProcessorOptions::from(&config), shared, sink.clone())?;

    let interval = (args.fps > 0.0).then(|| Duration::from_secs_f64(1.0 / args.fps));

    let pb = ProgressBar::new(reader.frame_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Replay [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut totals = ReplayTotals::default();
    let start = Instant::now();
    for (i, frame) in reader.frames().enumerate() {
        let frame = frame.with_context(|| format!("Failed to read frame {i}"))?;
        totals.offered += 1;
        match handle.offer(&frame) {
            OfferOutcome::Accepted => totals.accepted += 1,
            OfferOutcome::Dropped => totals.dropped += 1,
        }
        pb.set_position(i as u64 + 1);
        pb.set_message(format!("{} dropped", totals.dropped));

        if let Some(interval) = interval {
            let due = start + interval.mul_f64((i + 1) as f64);
            if let Some(wait) = due.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
        }
    }
    pb.finish();

    // Includes frames replaced in the slot before the worker claimed them.
    totals.dropped = handle.handoff().dropped_frames();
    let stats = handle.stop();
    summary::print_replay_result(&totals, &stats, &sink);
    Ok(())
}
