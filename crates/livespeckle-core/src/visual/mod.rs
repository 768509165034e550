//! Conversion of floating-point intermediates into displayable 8-bit images.

pub mod colormap;
pub mod grayscale;

use image::{GrayImage, ImageBuffer, Pixel, RgbImage};
use num_traits::Float;

pub use colormap::{false_color, false_color_visualization};
pub use grayscale::{grayscale_visualization, window_visualization};

/// Rendering options shared by the visualizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisuOptions {
    /// Take the natural log before normalizing.
    pub log_scale: bool,
    /// Move the zero frequency / zero lag to the image center.
    pub shift_quadrants: bool,
    /// Upscale 2x (nearest neighbour) as the very last step.
    pub resize: bool,
}

impl VisuOptions {
    /// Log-scaled, centered rendering used for power spectra.
    pub fn spectrum() -> Self {
        Self {
            log_scale: true,
            shift_quadrants: true,
            resize: false,
        }
    }

    pub fn with_resize(mut self, resize: bool) -> Self {
        self.resize = resize;
        self
    }
}

/// The four images produced by the speckle pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Raw extracted window.
    Window,
    /// Power spectrum of the current frame, emitted every accepted frame.
    FrameSpectrum,
    /// Accumulated power spectrum, emitted on cycle completion.
    AccumulatedSpectrum,
    /// False-colored filtered autocorrelation, emitted on cycle completion.
    Autocorrelation,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        Self::Window,
        Self::FrameSpectrum,
        Self::AccumulatedSpectrum,
        Self::Autocorrelation,
    ];

    /// Short lowercase name, usable in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::FrameSpectrum => "spectrum",
            Self::AccumulatedSpectrum => "accumulated",
            Self::Autocorrelation => "autocorrelation",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window => write!(f, "Window"),
            Self::FrameSpectrum => write!(f, "Frame spectrum"),
            Self::AccumulatedSpectrum => write!(f, "Accumulated spectrum"),
            Self::Autocorrelation => write!(f, "Autocorrelation"),
        }
    }
}

/// A rendered artifact.
#[derive(Clone, Debug)]
pub enum Artifact {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl Artifact {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Gray(img) => img.dimensions(),
            Self::Rgb(img) => img.dimensions(),
        }
    }
}

/// Double both image dimensions by pixel replication.
pub fn upscale_nearest_2x<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let (w, h) = img.dimensions();
    ImageBuffer::from_fn(w * 2, h * 2, |x, y| *img.get_pixel(x / 2, y / 2))
}

/// Minimum and maximum over the finite values of `data`, if any.
pub fn finite_min_max<'a, T>(data: impl IntoIterator<Item = &'a T>) -> Option<(T, T)>
where
    T: Float + 'a,
{
    data.into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
