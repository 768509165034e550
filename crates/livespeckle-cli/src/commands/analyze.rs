use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use livespeckle_core::config::SpeckleConfig;
use livespeckle_core::frame::{Frame, FrameMetadata};
use livespeckle_core::io::image_io::load_gray8;
use livespeckle_core::io::ser::SerReader;
use livespeckle_core::pipeline::SpeckleCycle;

use super::SpeckleArgs;
use crate::sink::PngSink;
use crate::summary;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// A SER recording, or still images used as consecutive frames
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub speckle: SpeckleArgs,
}

/// Counters for a synchronous analysis run.
#[derive(Default)]
pub struct AnalyzeTotals {
    pub frames: u64,
    pub skipped: u64,
    pub cycles: u64,
    /// Spectra left in the accumulator when the input ran out.
    pub pending: usize,
}

/// Process every frame on the calling thread. Nothing is dropped, so the
/// output is deterministic for a given input.
pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = args.speckle.resolve()?;
    let output = args.speckle.prepare_output()?;
    let sink = PngSink::new(output.clone());

    summary::print_settings("Speckle Analysis", &args.inputs[0], &config, output.as_deref());

    let totals = match args.inputs.as_slice() {
        [single] if is_ser(single) => {
            let reader = SerReader::open(single)
                .with_context(|| format!("Failed to open {}", single.display()))?;
            let frames = reader.frames().map(|f| f.map_err(anyhow::Error::from));
            analyze_frames(frames, reader.frame_count(), &config, &sink)?
        }
        paths => {
            let frames = paths
                .iter()
                .enumerate()
                .map(|(i, path)| load_image_frame(i, path));
            analyze_frames(frames, paths.len(), &config, &sink)?
        }
    };

    summary::print_analyze_result(&totals, &sink);
    Ok(())
}

fn analyze_frames(
    frames: impl Iterator<Item = Result<Frame>>,
    total: usize,
    config: &SpeckleConfig,
    sink: &PngSink,
) -> Result<AnalyzeTotals> {
    let mut cycle = SpeckleCycle::new(config.window_size);
    let snapshot = config.snapshot();
    let mut totals = AnalyzeTotals::default();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Analyzing [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    for frame in frames {
        let frame = frame?;
        let report = cycle
            .process(&frame, &snapshot, sink)
            .with_context(|| format!("Frame {} failed", frame.metadata.sequence))?;

        if report.skipped {
            totals.skipped += 1;
        } else {
            totals.frames += 1;
        }
        if report.completed() {
            totals.cycles += 1;
            pb.set_message(format!("{} cycles", totals.cycles));
        }
        pb.inc(1);
    }
    pb.finish();

    totals.pending = cycle.accumulator().count();
    Ok(totals)
}

fn is_ser(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"))
}

fn load_image_frame(index: usize, path: &Path) -> Result<Frame> {
    let (width, height, data) =
        load_gray8(path).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(Frame::mono8(width, height, data).with_metadata(FrameMetadata {
        sequence: index as u64,
        timestamp_us: None,
    }))
}
