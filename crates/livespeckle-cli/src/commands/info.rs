use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use livespeckle_core::consts::DEFAULT_WINDOW_SIZE;
use livespeckle_core::io::ser::SerReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = SerReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let info = reader.source_info(&args.file);

    println!("File:        {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Format:      {}", info.format);

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref tel) = info.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    if !info.format.is_mono8() {
        println!("Note:        frames are not Mono8 and will be skipped");
    }
    // The centered window needs a pixel of margin on every side.
    let min_side = DEFAULT_WINDOW_SIZE + 2;
    if (info.width as usize) < min_side || (info.height as usize) < min_side {
        println!(
            "Note:        too small for the default {0}x{0} window",
            DEFAULT_WINDOW_SIZE
        );
    }

    Ok(())
}
