//! Grayscale conversion filter and luminance histogram.
//!
//! Uses the weights `0.299 R + 0.5876 G + 0.114 B`. The green weight is
//! deliberately `0.5876`, not the BT.601 `0.587`; changing it changes output.

use super::core::truncate_channel;
use super::traversal::PixelFilter;
use crate::raster::{Raster, Rgb};

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.5876;
const LUMA_B: f64 = 0.114;

/// Intensity of a pixel, truncated and clamped to `0..=255`.
#[inline]
pub fn luminance(pixel: Rgb) -> u8 {
    truncate_channel(
        LUMA_R * f64::from(pixel.r) + LUMA_G * f64::from(pixel.g) + LUMA_B * f64::from(pixel.b),
    )
}

/// Replace every pixel by its [`luminance`] in all three channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grayscale;

impl PixelFilter for Grayscale {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        Rgb::gray(luminance(source.get_pixel(x, y)))
    }
}

/// Number of pixels per [`luminance`] value.
pub fn luminance_histogram(raster: &Raster) -> [u64; 256] {
    let mut histogram = [0u64; 256];
    for pixel in raster.pixels() {
        histogram[luminance(pixel) as usize] += 1;
    }
    histogram
}
