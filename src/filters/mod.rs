//! Filter modules for RGB raster processing.
//!
//! ## Architecture
//!
//! Most filters implement [`PixelFilter`]: the output pixel is a pure function
//! of the source raster, and the shared column-major traversal in
//! [`traversal`] takes care of progress reporting and cancellation.
//!
//! The rest override the traversal:
//! - **Contrast** measures the mean brightness first, then stretches.
//! - **Noise Dots** advances a random generator per pixel, so it always runs
//!   sequentially.
//! - **Noise Lines / Noise Circles** copy the source and draw into the copy.
//!
//! [`Filter`] is the closed set of filters a caller can pick from.
//!
//! ## Filter Categories
//!
//! - **Color**: negative, brightness, contrast, grayscale
//! - **Convolution**: gaussian blur, sharpen, arbitrary kernels
//! - **Noise**: median, noise dots, noise lines, noise circles
//! - **Edge**: contour
//! - **Stylize**: waves

pub mod color_adjust;
pub mod convolve;
pub mod core;
pub mod edge;
pub mod grayscale;
pub mod noise;
pub mod stylize;
pub mod traversal;

use log::{debug, info};

pub use color_adjust::{mean_brightness, Brightness, Contrast, ContrastStretch, Negative};
pub use convolve::{Convolution, GaussianParams};
pub use self::core::Kernel;
pub use edge::Contour;
pub use grayscale::{luminance, luminance_histogram, Grayscale};
pub use noise::{Median, NoiseCircles, NoiseDots, NoiseLines};
pub use stylize::Waves;
pub use traversal::{process_with, Parallelism, PixelFilter};

use crate::error::{FilterError, Result};
use crate::progress::{Outcome, ProgressRange, ProgressSink};
use crate::raster::Raster;

/// Every filter the engine provides.
#[derive(Debug)]
pub enum Filter {
    Negative(Negative),
    Grayscale(Grayscale),
    Brightness(Brightness),
    Contrast(Contrast),
    Convolution(Convolution),
    Median(Median),
    NoiseDots(NoiseDots),
    NoiseLines(NoiseLines),
    NoiseCircles(NoiseCircles),
    Contour(Contour),
    Waves(Waves),
}

impl Filter {
    /// Default Gaussian blur (radius 3, sigma 2.0).
    pub fn gaussian_blur() -> Self {
        Filter::Convolution(Convolution::default())
    }

    pub fn gaussian(radius: usize, sigma: f64) -> Result<Self> {
        Ok(Filter::Convolution(Convolution::gaussian(radius, sigma)?))
    }

    pub fn sharpen() -> Self {
        Filter::Convolution(Convolution::sharpen())
    }

    /// Brightness shift by `+amount`.
    pub fn brighten(amount: u8) -> Self {
        Filter::Brightness(Brightness::new(i32::from(amount)))
    }

    /// Brightness shift by `-amount`.
    pub fn darken(amount: u8) -> Self {
        Filter::Brightness(Brightness::new(-i32::from(amount)))
    }

    /// Contrast with factor `amount`; must be positive.
    pub fn increase_contrast(amount: f64) -> Result<Self> {
        check_contrast(amount)?;
        Ok(Filter::Contrast(Contrast::new(amount)))
    }

    /// Contrast with factor `1 / amount`; `amount` must be positive.
    pub fn decrease_contrast(amount: f64) -> Result<Self> {
        check_contrast(amount)?;
        Ok(Filter::Contrast(Contrast::new(1.0 / amount)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Negative(_) => "negative",
            Filter::Grayscale(_) => "grayscale",
            Filter::Brightness(_) => "brightness",
            Filter::Contrast(_) => "contrast",
            Filter::Convolution(_) => "convolution",
            Filter::Median(_) => "median",
            Filter::NoiseDots(_) => "noise_dots",
            Filter::NoiseLines(_) => "noise_lines",
            Filter::NoiseCircles(_) => "noise_circles",
            Filter::Contour(_) => "contour",
            Filter::Waves(_) => "waves",
        }
    }

    /// Run the filter sequentially. See [`Filter::process_image_with`].
    pub fn process_image(&mut self, source: &Raster, sink: &dyn ProgressSink, range: ProgressRange) -> Outcome {
        self.process_image_with(source, sink, range, Parallelism::Sequential)
    }

    /// Run the filter over `source`, reporting into `range` of `sink`.
    ///
    /// `parallelism` applies to the filters using the default traversal;
    /// Noise Dots, Noise Lines and Noise Circles ignore it. The source raster
    /// is never modified.
    pub fn process_image_with(
        &mut self,
        source: &Raster,
        sink: &dyn ProgressSink,
        range: ProgressRange,
        parallelism: Parallelism,
    ) -> Outcome {
        let name = self.name();
        let (width, height) = source.dimensions();
        debug!("Running {} on {}x{} ({:?})", name, width, height, parallelism);

        let outcome = match self {
            Filter::Negative(f) => process_with(f, source, sink, range, parallelism),
            Filter::Grayscale(f) => process_with(f, source, sink, range, parallelism),
            Filter::Brightness(f) => process_with(f, source, sink, range, parallelism),
            Filter::Contrast(f) => f.process(source, sink, range, parallelism),
            Filter::Convolution(f) => process_with(f, source, sink, range, parallelism),
            Filter::Median(f) => process_with(f, source, sink, range, parallelism),
            Filter::NoiseDots(f) => f.process(source, sink, range),
            Filter::NoiseLines(f) => f.process(source, sink, range),
            Filter::NoiseCircles(f) => f.process(source, sink, range),
            Filter::Contour(f) => process_with(f, source, sink, range, parallelism),
            Filter::Waves(f) => process_with(f, source, sink, range, parallelism),
        };

        match &outcome {
            Outcome::Completed(_) => debug!("Finished {}", name),
            Outcome::Cancelled => info!("{} cancelled", name),
        }
        outcome
    }
}

fn check_contrast(amount: f64) -> Result<()> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(FilterError::NonPositiveContrast(amount));
    }
    Ok(())
}

macro_rules! impl_from_filter {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Filter {
                fn from(filter: $variant) -> Self {
                    Filter::$variant(filter)
                }
            }
        )*
    };
}

impl_from_filter!(
    Negative,
    Grayscale,
    Brightness,
    Contrast,
    Convolution,
    Median,
    NoiseDots,
    NoiseLines,
    NoiseCircles,
    Contour,
    Waves,
);
