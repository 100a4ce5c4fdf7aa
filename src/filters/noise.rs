//! Noise filters: Median, Noise Dots, Noise Lines, Noise Circles.
//!
//! Median removes noise; the other three add it. Each noise filter owns its
//! own `WyRand` generator, seeded when the filter is built, so a fixed seed
//! reproduces the same output. Generators are never shared between filters.
//!
//! Noise Lines and Noise Circles do not compute pixels one by one: they copy
//! the source and draw primitives straight into the copy.

use std::f64::consts::PI;
use std::fmt;

use nanorand::{Rng, WyRand};

use super::traversal::{process_pixels, PixelFilter};
use crate::error::{FilterError, Result};
use crate::progress::{Outcome, ProgressRange, ProgressSink};
use crate::raster::{Raster, Rgb};

// ============================================================================
// Random helpers
// ============================================================================

/// Uniform `f64` in `[0, 1)` with 53 bits of precision.
#[inline]
fn next_unit(rng: &mut WyRand) -> f64 {
    (rng.generate::<u64>() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform integer in `[low, high)`, or `low` when the range is empty.
#[inline]
fn next_between(rng: &mut WyRand, low: usize, high: usize) -> usize {
    if high > low {
        rng.generate_range(low..high)
    } else {
        low
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(FilterError::Probability { name, value })
    }
}

fn check_at_least(name: &'static str, min: usize, value: usize) -> Result<usize> {
    if value >= min {
        Ok(value)
    } else {
        Err(FilterError::TooSmall { name, min, value })
    }
}

// ============================================================================
// Median
// ============================================================================

/// Default median radius.
pub const MEDIAN_RADIUS: usize = 1;

/// Per-channel median over a `(2r+1)²` edge-clamped window.
///
/// Channels are sorted independently, so the output pixel may mix channels of
/// different neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Median {
    pub radius: usize,
}

impl Median {
    pub fn new(radius: usize) -> Self {
        Median { radius }
    }

    pub fn window_size(&self) -> usize {
        (self.radius * 2 + 1) * (self.radius * 2 + 1)
    }
}

impl Default for Median {
    fn default() -> Self {
        Median::new(MEDIAN_RADIUS)
    }
}

impl PixelFilter for Median {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let size = self.window_size();
        let r = self.radius as isize;
        let (x, y) = (x as isize, y as isize);

        let mut reds = Vec::with_capacity(size);
        let mut greens = Vec::with_capacity(size);
        let mut blues = Vec::with_capacity(size);

        for l in -r..=r {
            for k in -r..=r {
                let p = source.get_clamped(x + k, y + l);
                reds.push(p.r);
                greens.push(p.g);
                blues.push(p.b);
            }
        }

        reds.sort_unstable();
        greens.sort_unstable();
        blues.sort_unstable();

        let middle = size / 2;
        Rgb::new(reds[middle], greens[middle], blues[middle])
    }
}

// ============================================================================
// Noise Dots
// ============================================================================

/// Salt-and-pepper noise.
///
/// One uniform draw `p` per pixel: `p < p_white` gives white, otherwise
/// `p + p_black > 1` gives black, otherwise the source pixel is kept. Both
/// tests use the same draw.
pub struct NoiseDots {
    p_white: f64,
    p_black: f64,
    rng: WyRand,
}

impl NoiseDots {
    pub const DEFAULT_P_WHITE: f64 = 0.02;
    pub const DEFAULT_P_BLACK: f64 = 0.02;

    /// Seeded from system entropy.
    pub fn new(p_white: f64, p_black: f64) -> Result<Self> {
        Self::with_rng(p_white, p_black, WyRand::new())
    }

    pub fn with_seed(p_white: f64, p_black: f64, seed: u64) -> Result<Self> {
        Self::with_rng(p_white, p_black, WyRand::new_seed(seed))
    }

    fn with_rng(p_white: f64, p_black: f64, rng: WyRand) -> Result<Self> {
        Ok(NoiseDots {
            p_white: check_probability("p_white", p_white)?,
            p_black: check_probability("p_black", p_black)?,
            rng,
        })
    }

    /// Compute the next pixel, advancing the generator by one draw.
    pub fn compute_pixel(&mut self, source: &Raster, x: usize, y: usize) -> Rgb {
        let p = next_unit(&mut self.rng);
        if p < self.p_white {
            Rgb::WHITE
        } else if p + self.p_black > 1.0 {
            Rgb::BLACK
        } else {
            source.get_pixel(x, y)
        }
    }

    /// Default traversal; always sequential because the draw order matters.
    pub fn process(&mut self, source: &Raster, sink: &dyn ProgressSink, range: ProgressRange) -> Outcome {
        process_pixels(source, sink, range, |src, x, y| self.compute_pixel(src, x, y))
    }
}

impl Default for NoiseDots {
    fn default() -> Self {
        NoiseDots {
            p_white: Self::DEFAULT_P_WHITE,
            p_black: Self::DEFAULT_P_BLACK,
            rng: WyRand::new(),
        }
    }
}

impl fmt::Debug for NoiseDots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseDots")
            .field("p_white", &self.p_white)
            .field("p_black", &self.p_black)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Noise Lines
// ============================================================================

/// Shortest segment Noise Lines draws.
pub const MIN_LINE_LENGTH: usize = 10;

/// Random black and white line segments.
///
/// Draws `number_of_lines * max_length` segments in total (one batch of
/// `max_length` segments per line). Each segment has a random start, angle in
/// `[0, 2π)`, length in `[10, max_length)` and is black or white with equal
/// probability.
pub struct NoiseLines {
    number_of_lines: usize,
    max_length: usize,
    rng: WyRand,
}

impl NoiseLines {
    pub const DEFAULT_NUMBER_OF_LINES: usize = 50;
    pub const DEFAULT_MAX_LENGTH: usize = 40;

    pub fn new(number_of_lines: usize, max_length: usize) -> Result<Self> {
        Self::with_rng(number_of_lines, max_length, WyRand::new())
    }

    pub fn with_seed(number_of_lines: usize, max_length: usize, seed: u64) -> Result<Self> {
        Self::with_rng(number_of_lines, max_length, WyRand::new_seed(seed))
    }

    fn with_rng(number_of_lines: usize, max_length: usize, rng: WyRand) -> Result<Self> {
        Ok(NoiseLines {
            number_of_lines,
            max_length: check_at_least("max_length", MIN_LINE_LENGTH, max_length)?,
            rng,
        })
    }

    /// Number of segments one run draws.
    pub fn segment_count(&self) -> usize {
        self.number_of_lines * self.max_length
    }

    /// Copy `source` and draw all segments into the copy.
    ///
    /// Progress and cancellation are checked once per batch of `max_length`
    /// segments.
    pub fn process(&mut self, source: &Raster, sink: &dyn ProgressSink, range: ProgressRange) -> Outcome {
        let mut result = source.clone();
        if result.is_empty() {
            return Outcome::Completed(result);
        }

        for line in 0..self.number_of_lines {
            sink.report_progress(range.percent_at(line, self.number_of_lines));
            if sink.cancellation_requested() {
                return Outcome::Cancelled;
            }
            for _ in 0..self.max_length {
                self.draw_random_segment(&mut result);
            }
        }

        Outcome::Completed(result)
    }

    fn draw_random_segment(&mut self, raster: &mut Raster) {
        let start_x = self.rng.generate_range(0..raster.width());
        let start_y = self.rng.generate_range(0..raster.height());
        let angle = next_unit(&mut self.rng) * 2.0 * PI;
        let length = next_between(&mut self.rng, MIN_LINE_LENGTH, self.max_length);
        let color = if self.rng.generate_range(0..2usize) == 0 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        };
        draw_segment(raster, start_x, start_y, angle, length, color);
    }
}

impl Default for NoiseLines {
    fn default() -> Self {
        NoiseLines {
            number_of_lines: Self::DEFAULT_NUMBER_OF_LINES,
            max_length: Self::DEFAULT_MAX_LENGTH,
            rng: WyRand::new(),
        }
    }
}

impl fmt::Debug for NoiseLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseLines")
            .field("number_of_lines", &self.number_of_lines)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

/// Plot `length` steps from `(start_x, start_y)` along `angle`.
///
/// Step `i` lands on `start + trunc(i * (cos, sin))`. The segment stops at the
/// first step outside the raster.
pub fn draw_segment(
    raster: &mut Raster,
    start_x: usize,
    start_y: usize,
    angle: f64,
    length: usize,
    color: Rgb,
) {
    let (sin, cos) = angle.sin_cos();
    for i in 0..length {
        let x = start_x as isize + (i as f64 * cos) as isize;
        let y = start_y as isize + (i as f64 * sin) as isize;
        if !raster.contains(x, y) {
            break;
        }
        raster.set_pixel(x as usize, y as usize, color);
    }
}

// ============================================================================
// Noise Circles
// ============================================================================

/// Smallest circle radius Noise Circles draws.
pub const MIN_CIRCLE_RADIUS: usize = 5;

/// Random black and white circle outlines.
///
/// For every circle: a random center, a radius in `[5, max_radius)`, then a
/// draw `< p_white` picks white; failing that a second draw `< p_black` picks
/// black; failing both the circle is skipped.
pub struct NoiseCircles {
    number_of_circles: usize,
    max_radius: usize,
    p_white: f64,
    p_black: f64,
    rng: WyRand,
}

impl NoiseCircles {
    pub const DEFAULT_NUMBER_OF_CIRCLES: usize = 1000;
    pub const DEFAULT_MAX_RADIUS: usize = 30;
    pub const DEFAULT_P_WHITE: f64 = 0.5;
    pub const DEFAULT_P_BLACK: f64 = 0.5;

    pub fn new(number_of_circles: usize, max_radius: usize, p_white: f64, p_black: f64) -> Result<Self> {
        Self::with_rng(number_of_circles, max_radius, p_white, p_black, WyRand::new())
    }

    pub fn with_seed(
        number_of_circles: usize,
        max_radius: usize,
        p_white: f64,
        p_black: f64,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(number_of_circles, max_radius, p_white, p_black, WyRand::new_seed(seed))
    }

    fn with_rng(
        number_of_circles: usize,
        max_radius: usize,
        p_white: f64,
        p_black: f64,
        rng: WyRand,
    ) -> Result<Self> {
        Ok(NoiseCircles {
            number_of_circles,
            max_radius: check_at_least("max_radius", MIN_CIRCLE_RADIUS, max_radius)?,
            p_white: check_probability("p_white", p_white)?,
            p_black: check_probability("p_black", p_black)?,
            rng,
        })
    }

    /// Copy `source` and draw every circle into the copy.
    ///
    /// Progress and cancellation are checked once per circle.
    pub fn process(&mut self, source: &Raster, sink: &dyn ProgressSink, range: ProgressRange) -> Outcome {
        let mut result = source.clone();
        if result.is_empty() {
            return Outcome::Completed(result);
        }

        for circle in 0..self.number_of_circles {
            sink.report_progress(range.percent_at(circle, self.number_of_circles));
            if sink.cancellation_requested() {
                return Outcome::Cancelled;
            }
            self.draw_random_circle(&mut result);
        }

        Outcome::Completed(result)
    }

    fn draw_random_circle(&mut self, raster: &mut Raster) {
        let center_x = self.rng.generate_range(0..raster.width());
        let center_y = self.rng.generate_range(0..raster.height());
        let radius = next_between(&mut self.rng, MIN_CIRCLE_RADIUS, self.max_radius);

        let color = if next_unit(&mut self.rng) < self.p_white {
            Rgb::WHITE
        } else if next_unit(&mut self.rng) < self.p_black {
            Rgb::BLACK
        } else {
            return;
        };

        draw_circle(raster, center_x, center_y, radius, color);
    }
}

impl Default for NoiseCircles {
    fn default() -> Self {
        NoiseCircles {
            number_of_circles: Self::DEFAULT_NUMBER_OF_CIRCLES,
            max_radius: Self::DEFAULT_MAX_RADIUS,
            p_white: Self::DEFAULT_P_WHITE,
            p_black: Self::DEFAULT_P_BLACK,
            rng: WyRand::new(),
        }
    }
}

impl fmt::Debug for NoiseCircles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseCircles")
            .field("number_of_circles", &self.number_of_circles)
            .field("max_radius", &self.max_radius)
            .field("p_white", &self.p_white)
            .field("p_black", &self.p_black)
            .finish_non_exhaustive()
    }
}

/// Plot 360 points of a circle outline, one per whole degree.
///
/// Points are rounded to the nearest pixel and skipped when outside the
/// raster. Large radii leave gaps between points.
pub fn draw_circle(raster: &mut Raster, center_x: usize, center_y: usize, radius: usize, color: Rgb) {
    let r = radius as f64;
    for degree in 0..360 {
        let theta = f64::from(degree) * PI / 180.0;
        let x = (center_x as f64 + r * theta.cos()).round() as isize;
        let y = (center_y as f64 + r * theta.sin()).round() as isize;
        if raster.contains(x, y) {
            raster.set_pixel(x as usize, y as usize, color);
        }
    }
}
