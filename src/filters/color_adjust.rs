//! Color adjustment filters: Negative, Brightness, Contrast.
//!
//! Negative and Brightness are pixel-wise maps. Contrast is a two-phase
//! filter: it measures the mean brightness of the whole image first and then
//! stretches every channel away from (or toward) that mean.
//!
//! All channel arithmetic truncates toward zero and clamps to `0..=255`.

use log::warn;

use super::core::{clamp_channel, truncate_channel};
use super::traversal::{process_with, Parallelism, PixelFilter};
use crate::progress::{Outcome, ProgressRange, ProgressSink};
use crate::raster::{Raster, Rgb};

// ============================================================================
// Negative
// ============================================================================

/// Invert every channel: `255 - channel`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Negative;

impl PixelFilter for Negative {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let p = source.get_pixel(x, y);
        Rgb::new(255 - p.r, 255 - p.g, 255 - p.b)
    }
}

// ============================================================================
// Brightness
// ============================================================================

/// Add a constant to every channel.
///
/// Negative amounts darken; `0` leaves the image unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Brightness {
    pub amount: i32,
}

impl Brightness {
    pub fn new(amount: i32) -> Self {
        Brightness { amount }
    }
}

impl PixelFilter for Brightness {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let shift = |c: u8| clamp_channel(i64::from(c) + i64::from(self.amount));
        let p = source.get_pixel(x, y);
        Rgb::new(shift(p.r), shift(p.g), shift(p.b))
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Scale every channel's distance from the image's mean brightness.
///
/// `amount = 1` is the identity, `amount > 1` increases contrast and
/// `0 < amount < 1` decreases it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    pub amount: f64,
}

impl Default for Contrast {
    fn default() -> Self {
        Contrast { amount: 1.0 }
    }
}

impl Contrast {
    pub fn new(amount: f64) -> Self {
        Contrast { amount }
    }

    /// Run both phases, splitting `range` in two halves.
    ///
    /// Phase one measures [`mean_brightness`] while reporting into the first
    /// half. A cancellation request during that phase does not stop the filter:
    /// the mean becomes `0` and the apply phase starts anyway. Only the apply
    /// phase turns a cancellation request into [`Outcome::Cancelled`].
    pub fn process(
        &self,
        source: &Raster,
        sink: &dyn ProgressSink,
        range: ProgressRange,
        parallelism: Parallelism,
    ) -> Outcome {
        let half = range.max_percent / 2;
        let measure = ProgressRange::new(half, range.offset);
        let apply = ProgressRange::new(range.max_percent - half, range.offset + half);

        let brightness = mean_brightness(source, sink, measure);
        let stretch = ContrastStretch {
            brightness,
            amount: self.amount,
        };
        process_with(&stretch, source, sink, apply, parallelism)
    }
}

/// Second phase of [`Contrast`] with the statistic already measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastStretch {
    pub brightness: i64,
    pub amount: f64,
}

impl ContrastStretch {
    #[inline]
    fn stretch(&self, channel: u8) -> u8 {
        let b = self.brightness as f64;
        truncate_channel(b + (f64::from(channel) - b) * self.amount)
    }
}

impl PixelFilter for ContrastStretch {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let p = source.get_pixel(x, y);
        Rgb::new(self.stretch(p.r), self.stretch(p.g), self.stretch(p.b))
    }
}

/// Mean of `(R + G + B) / 3` over all pixels, both divisions truncating.
///
/// Reports progress per column into `range`. If cancellation is requested the
/// measurement stops and `0` is returned. An empty raster also measures `0`.
pub fn mean_brightness(source: &Raster, sink: &dyn ProgressSink, range: ProgressRange) -> i64 {
    let (width, height) = source.dimensions();
    let mut sum: i64 = 0;

    for x in 0..width {
        sink.report_progress(range.percent_at(x, width));
        if sink.cancellation_requested() {
            warn!("Cancelled while measuring brightness, continuing with brightness 0");
            return 0;
        }
        for y in 0..height {
            let p = source.get_pixel(x, y);
            sum += (i64::from(p.r) + i64::from(p.g) + i64::from(p.b)) / 3;
        }
    }

    let count = source.pixel_count() as i64;
    if count == 0 {
        return 0;
    }
    sum / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, RecordingSink};

    fn run<P: PixelFilter>(filter: &P, source: &Raster) -> Raster {
        process_with(filter, source, &NoProgress, ProgressRange::FULL, Parallelism::Sequential)
            .into_raster()
            .unwrap()
    }

    fn sample() -> Raster {
        Raster::from_fn(7, 5, |x, y| {
            Rgb::new((x * 37) as u8, (y * 51) as u8, (x * y * 13 + 9) as u8)
        })
    }

    #[test]
    fn test_negative_literal_scenario() {
        let source = Raster::from_pixels(
            2,
            2,
            &[Rgb::gray(10), Rgb::gray(250), Rgb::gray(0), Rgb::gray(128)],
        )
        .unwrap();
        let result = run(&Negative, &source);
        let expected = [Rgb::gray(245), Rgb::gray(5), Rgb::gray(255), Rgb::gray(127)];
        assert_eq!(result.pixels().collect::<Vec<_>>(), expected.to_vec());
    }

    #[test]
    fn test_negative_is_self_inverse() {
        let source = sample();
        let once = run(&Negative, &source);
        for (a, b) in source.pixels().zip(once.pixels()) {
            assert_eq!(b.r, 255 - a.r);
            assert_eq!(b.g, 255 - a.g);
            assert_eq!(b.b, 255 - a.b);
        }
        assert_eq!(run(&Negative, &once), source);
    }

    #[test]
    fn test_brightness_zero_is_identity() {
        let source = sample();
        assert_eq!(run(&Brightness::new(0), &source), source);
    }

    #[test]
    fn test_brightness_clamps_both_ends() {
        let source = Raster::from_pixels(2, 1, &[Rgb::new(250, 10, 128), Rgb::new(3, 200, 0)]).unwrap();
        let brighter = run(&Brightness::new(20), &source);
        assert_eq!(brighter.get_pixel(0, 0), Rgb::new(255, 30, 148));
        let darker = run(&Brightness::new(-20), &source);
        assert_eq!(darker.get_pixel(1, 0), Rgb::new(0, 180, 0));
    }

    #[test]
    fn test_mean_brightness_truncates_twice() {
        // (1+1+2)/3 = 1, (10+10+11)/3 = 10 -> (1 + 10) / 2 = 5
        let source = Raster::from_pixels(2, 1, &[Rgb::new(1, 1, 2), Rgb::new(10, 10, 11)]).unwrap();
        assert_eq!(mean_brightness(&source, &NoProgress, ProgressRange::FULL), 5);
    }

    #[test]
    fn test_contrast_one_is_identity() {
        let source = sample();
        let result = Contrast::new(1.0)
            .process(&source, &NoProgress, ProgressRange::FULL, Parallelism::Sequential)
            .into_raster()
            .unwrap();
        assert_eq!(result, source);
    }

    #[test]
    fn test_contrast_stretches_around_mean() {
        let source = Raster::from_pixels(2, 1, &[Rgb::gray(100), Rgb::gray(140)]).unwrap();
        let result = Contrast::new(2.0)
            .process(&source, &NoProgress, ProgressRange::FULL, Parallelism::Rayon)
            .into_raster()
            .unwrap();
        // mean 120: 120 + (100-120)*2 = 80, 120 + (140-120)*2 = 160
        assert_eq!(result.get_pixel(0, 0), Rgb::gray(80));
        assert_eq!(result.get_pixel(1, 0), Rgb::gray(160));
    }

    #[test]
    fn test_contrast_truncates_toward_zero() {
        let stretch = ContrastStretch {
            brightness: 100,
            amount: 0.5,
        };
        // 100 + (1 - 100) * 0.5 = 50.5 -> 50
        assert_eq!(stretch.stretch(1), 50);
        // 100 + (255 - 100) * 0.5 = 177.5 -> 177
        assert_eq!(stretch.stretch(255), 177);
    }

    #[test]
    fn test_contrast_progress_spans_both_halves() {
        let source = sample();
        let sink = RecordingSink::new();
        let _ = Contrast::new(1.5).process(&source, &sink, ProgressRange::FULL, Parallelism::Sequential);
        let reports = sink.reports();
        assert_eq!(reports.len(), 14);
        assert_eq!(reports[0], 0);
        assert_eq!(reports[7], 50);
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert!(reports.iter().all(|&p| p <= 100));
    }

    #[test]
    fn test_cancel_during_measure_still_applies_with_zero() {
        // the sink keeps requesting cancellation after the second poll, so the
        // apply phase stops on its first column
        let source = sample();
        let sink = RecordingSink::cancelling_after(1);
        let outcome = Contrast::new(2.0).process(&source, &sink, ProgressRange::FULL, Parallelism::Sequential);
        assert!(outcome.is_cancelled());
        // measure phase stopped after one column, apply phase started at 50
        assert_eq!(sink.reports(), vec![0, 7, 50]);
    }

    #[test]
    fn test_zero_brightness_stretch_after_measure_cancel() {
        let source = Raster::from_pixels(1, 1, &[Rgb::gray(60)]).unwrap();
        assert_eq!(mean_brightness(&source, &RecordingSink::cancelling_after(0), ProgressRange::FULL), 0);
        let stretch = ContrastStretch {
            brightness: 0,
            amount: 2.0,
        };
        assert_eq!(run(&stretch, &source).get_pixel(0, 0), Rgb::gray(120));
    }
}
