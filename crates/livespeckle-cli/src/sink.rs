use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use livespeckle_core::io::image_io::save_artifact;
use livespeckle_core::pipeline::ArtifactSink;
use livespeckle_core::visual::{Artifact, ArtifactKind};
use tracing::{debug, warn};

/// Writes every artifact to `{dir}/{slug}_{n:05}.png`, numbering each kind
/// separately. Without a directory artifacts are only counted.
pub struct PngSink {
    dir: Option<PathBuf>,
    counts: Mutex<HashMap<ArtifactKind, u32>>,
    errors: Mutex<Vec<String>>,
}

impl PngSink {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            counts: Mutex::new(HashMap::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self, kind: ArtifactKind) -> u32 {
        self.counts
            .lock()
            .map(|c| c.get(&kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn next_index(&self, kind: ArtifactKind) -> u32 {
        let Ok(mut counts) = self.counts.lock() else {
            return 0;
        };
        let n = counts.entry(kind).or_insert(0);
        *n += 1;
        *n
    }
}

impl ArtifactSink for PngSink {
    fn on_artifact(&self, kind: ArtifactKind, artifact: Artifact) {
        let index = self.next_index(kind);
        let Some(dir) = &self.dir else {
            return;
        };
        let path = dir.join(format!("{}_{index:05}.png", kind.slug()));
        match save_artifact(&artifact, &path) {
            Ok(()) => debug!(path = %path.display(), "Artifact saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to save artifact"),
        }
    }

    fn on_error(&self, message: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(message.to_string());
        }
    }
}
