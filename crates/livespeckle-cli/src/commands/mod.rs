pub mod analyze;
pub mod config;
pub mod info;
pub mod replay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use livespeckle_core::config::SpeckleConfig;

/// Processing parameters shared by `replay` and `analyze`.
///
/// Values given on the command line override the config file.
#[derive(Args)]
pub struct SpeckleArgs {
    /// TOML config file (see `livespeckle config`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Side of the square window cropped from the frame center
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Frames per accumulation cycle
    #[arg(short, long)]
    pub accumulation: Option<u32>,

    /// High-pass box kernel size (0 or 1 disables filtering)
    #[arg(long)]
    pub filter_size: Option<u32>,

    /// Upscale output images 2x
    #[arg(long)]
    pub resize: bool,

    /// Directory to write artifact PNGs into
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SpeckleArgs {
    pub fn resolve(&self) -> Result<SpeckleConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str::<SpeckleConfig>(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => SpeckleConfig::default(),
        };

        if let Some(size) = self.window_size {
            config.window_size = size;
        }
        if let Some(len) = self.accumulation {
            config.accumulation_length = len;
        }
        if let Some(size) = self.filter_size {
            config.filter_size = size;
        }
        if self.resize {
            config.resize_for_display = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn prepare_output(&self) -> Result<Option<PathBuf>> {
        if let Some(dir) = &self.output {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(self.output.clone())
    }
}
