use std::path::Path;

use image::ImageFormat;

use crate::error::Result;
use crate::visual::Artifact;

/// Save an artifact as an 8-bit PNG (grayscale or RGB).
pub fn save_artifact(artifact: &Artifact, path: &Path) -> Result<()> {
    match artifact {
        Artifact::Gray(img) => img.save_with_format(path, ImageFormat::Png)?,
        Artifact::Rgb(img) => img.save_with_format(path, ImageFormat::Png)?,
    }
    Ok(())
}

/// Load an 8-bit grayscale image, returning `(width, height, bytes)`.
///
/// Used to feed still images through the processor as single frames.
pub fn load_gray8(path: &Path) -> Result<(usize, usize, Vec<u8>)> {
    let img = image::open(path)?.to_luma8();
    let (w, h) = img.dimensions();
    Ok((w as usize, h as usize, img.into_raw()))
}
