//! Dense column-major traversal shared by the per-pixel filters.
//!
//! The outer loop walks columns `0..width`, the inner loop rows `0..height`.
//! Before each column the traversal reports progress and polls for
//! cancellation; a cancelled run returns [`Outcome::Cancelled`] and drops the
//! partially filled output.
//!
//! With [`Parallelism::Rayon`] the pixels of one column are computed in
//! parallel. Columns are still visited in order, so progress stays monotonic
//! and cancellation keeps column granularity.

use log::trace;
use rayon::prelude::*;

use crate::progress::{Outcome, ProgressRange, ProgressSink};
use crate::raster::{Raster, Rgb};

/// A filter whose output pixel is a pure function of the source raster.
pub trait PixelFilter: Sync {
    /// Compute output pixel `(x, y)` from `source`.
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb;
}

/// How the pixels inside a column are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One pixel after another on the calling thread.
    #[default]
    Sequential,
    /// Pixels of each column on the rayon thread pool.
    Rayon,
}

/// Run `filter` over every pixel of `source`.
pub fn process_with<P: PixelFilter + ?Sized>(
    filter: &P,
    source: &Raster,
    sink: &dyn ProgressSink,
    range: ProgressRange,
    parallelism: Parallelism,
) -> Outcome {
    match parallelism {
        Parallelism::Sequential => process_pixels(source, sink, range, |src, x, y| {
            filter.compute_pixel(src, x, y)
        }),
        Parallelism::Rayon => par_process_pixels(source, sink, range, |src, x, y| {
            filter.compute_pixel(src, x, y)
        }),
    }
}

/// Sequential traversal driven by a closure.
///
/// The closure may carry state (e.g. a random generator); it is called in
/// column-major order.
pub fn process_pixels<F>(
    source: &Raster,
    sink: &dyn ProgressSink,
    range: ProgressRange,
    mut compute: F,
) -> Outcome
where
    F: FnMut(&Raster, usize, usize) -> Rgb,
{
    let (width, height) = source.dimensions();
    let mut output = Raster::new(width, height);

    for x in 0..width {
        sink.report_progress(range.percent_at(x, width));
        if sink.cancellation_requested() {
            return Outcome::Cancelled;
        }
        for y in 0..height {
            output.set_pixel(x, y, compute(source, x, y));
        }
    }

    Outcome::Completed(output)
}

/// Traversal computing the pixels of each column on the rayon pool.
pub fn par_process_pixels<F>(
    source: &Raster,
    sink: &dyn ProgressSink,
    range: ProgressRange,
    compute: F,
) -> Outcome
where
    F: Fn(&Raster, usize, usize) -> Rgb + Sync,
{
    let (width, height) = source.dimensions();
    let mut output = Raster::new(width, height);

    trace!("Running traversal in multithreaded mode ({}x{})", width, height);

    for x in 0..width {
        sink.report_progress(range.percent_at(x, width));
        if sink.cancellation_requested() {
            return Outcome::Cancelled;
        }
        let column: Vec<Rgb> = (0..height)
            .into_par_iter()
            .map(|y| compute(source, x, y))
            .collect();
        for (y, pixel) in column.into_iter().enumerate() {
            output.set_pixel(x, y, pixel);
        }
    }

    Outcome::Completed(output)
}
