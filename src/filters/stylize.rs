//! Waves filter: shifts every row horizontally along a sine wave.

use std::f64::consts::PI;

use super::core::clamp;
use super::traversal::PixelFilter;
use crate::raster::{Raster, Rgb};

/// Horizontal displacement sine wave.
///
/// Output `(x, y)` takes the source pixel at
/// `(clamp(x + trunc(amplitude * sin(2πy / period)), 0, w-1), y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waves {
    pub amplitude: f64,
    pub period: f64,
}

impl Waves {
    pub const DEFAULT_AMPLITUDE: f64 = 20.0;
    pub const DEFAULT_PERIOD: f64 = 30.0;

    pub fn new(amplitude: f64, period: f64) -> Self {
        Waves { amplitude, period }
    }

    /// Horizontal shift applied to row `y`.
    #[inline]
    pub fn offset(&self, y: usize) -> isize {
        (self.amplitude * (2.0 * PI * y as f64 / self.period).sin()) as isize
    }
}

impl Default for Waves {
    fn default() -> Self {
        Waves::new(Self::DEFAULT_AMPLITUDE, Self::DEFAULT_PERIOD)
    }
}

impl PixelFilter for Waves {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let max_x = source.width() as isize - 1;
        let new_x = clamp(x as isize + self.offset(y), 0, max_x);
        source.get_pixel(new_x as usize, y)
    }
}
