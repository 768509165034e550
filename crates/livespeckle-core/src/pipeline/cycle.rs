use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::config::ConfigSnapshot;
use crate::error::Result;
use crate::filters::high_pass::high_pass;
use crate::frame::Frame;
use crate::io::extract::{extract_frame_window, window_to_array};
use crate::spectral::{shift_quadrants, Accumulator, SpectralEngine};
use crate::visual::{
    false_color_visualization, grayscale_visualization, window_visualization, Artifact,
    ArtifactKind, VisuOptions,
};

use super::types::{ArtifactSink, CycleReport, CycleResult};

/// Worker-owned processing state: the transform plans and the running
/// spectrum sum.
///
/// Each accepted frame goes extract → forward → accumulate; every
/// `accumulation_length` frames the sum is inverse transformed, centered,
/// high-pass filtered, rendered and reset.
pub struct SpeckleCycle {
    engine: SpectralEngine,
    accumulator: Accumulator,
}

impl SpeckleCycle {
    pub fn new(window_size: usize) -> Self {
        Self {
            engine: SpectralEngine::new(window_size),
            accumulator: Accumulator::new(window_size),
        }
    }

    pub fn window_size(&self) -> usize {
        self.engine.size()
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Run one frame through the pipeline.
    ///
    /// On error the accumulator may hold a partial update; use
    /// [`process_guarded`](Self::process_guarded) on the live path.
    pub fn process(
        &mut self,
        frame: &Frame,
        config: &ConfigSnapshot,
        sink: &dyn ArtifactSink,
    ) -> Result<CycleReport> {
        if !frame.format.is_mono8() {
            debug!(format = %frame.format, "Ignoring non-Mono8 frame");
            return Ok(CycleReport {
                accumulated: self.accumulator.count(),
                skipped: true,
                result: None,
            });
        }

        let size = self.engine.size();
        let resize = config.resize_for_display;

        let window = extract_frame_window(frame, size);
        let spectrum = self.engine.forward(&window_to_array(&window, size))?;
        self.accumulator.add(&spectrum)?;
        debug!(
            sequence = frame.metadata.sequence,
            accumulated = self.accumulator.count(),
            "Frame spectrum accumulated"
        );

        sink.on_artifact(
            ArtifactKind::Window,
            Artifact::Gray(window_visualization(&window, size, resize)),
        );
        sink.on_artifact(
            ArtifactKind::FrameSpectrum,
            Artifact::Gray(grayscale_visualization(
                &spectrum,
                VisuOptions::spectrum().with_resize(resize),
            )),
        );

        let accumulated = self.accumulator.count();
        if !self.accumulator.is_due(config.effective_accumulation_length()) {
            return Ok(CycleReport {
                accumulated,
                skipped: false,
                result: None,
            });
        }

        let mut autocorrelation = self.engine.inverse(self.accumulator.sum())?;
        // Center before filtering, otherwise the blur straddles the wrap-around seam.
        shift_quadrants(&mut autocorrelation);
        let filtered = high_pass(&autocorrelation, config.filter_size);

        sink.on_artifact(
            ArtifactKind::AccumulatedSpectrum,
            Artifact::Gray(grayscale_visualization(
                self.accumulator.sum(),
                VisuOptions::spectrum().with_resize(resize),
            )),
        );
        sink.on_artifact(
            ArtifactKind::Autocorrelation,
            Artifact::Rgb(false_color_visualization(
                &filtered,
                VisuOptions::default().with_resize(resize),
            )),
        );

        let result = CycleResult {
            accumulated_spectrum: self.accumulator.sum().clone(),
            autocorrelation: filtered,
        };
        self.accumulator.reset();
        info!(
            frames = accumulated,
            filter_size = config.filter_size,
            "Accumulation cycle complete"
        );

        Ok(CycleReport {
            accumulated,
            skipped: false,
            result: Some(result),
        })
    }

    /// Run one frame, surviving any failure.
    ///
    /// Errors and panics (including from the sink) abandon the cycle: the
    /// accumulator is restored to its state before this frame and the
    /// failure is reported through `sink.on_error`.
    pub fn process_guarded(
        &mut self,
        frame: &Frame,
        config: &ConfigSnapshot,
        sink: &dyn ArtifactSink,
    ) -> Option<CycleReport> {
        let checkpoint = self.accumulator.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(frame, config, sink)));

        let message = match outcome {
            Ok(Ok(report)) => return Some(report),
            Ok(Err(e)) => format!("Frame {} failed: {e}", frame.metadata.sequence),
            Err(payload) => format!(
                "Frame {} panicked: {}",
                frame.metadata.sequence,
                panic_message(payload.as_ref())
            ),
        };

        self.accumulator = checkpoint;
        warn!(error = %message, "Cycle abandoned");
        // The error sink is external too; a panic there must not kill the worker.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| sink.on_error(&message)));
        None
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
