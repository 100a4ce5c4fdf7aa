//! Background execution of one filter invocation at a time.
//!
//! [`FilterWorker::submit`] moves the filter and its source raster onto a named
//! thread and hands back a [`FilterJob`] that can be polled for progress,
//! cancelled, or waited on. While a job is running the worker rejects further
//! submissions with [`FilterError::WorkerBusy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::error::{FilterError, Result};
use crate::filters::{Filter, Parallelism};
use crate::progress::{CancellationToken, Outcome, ProgressRange, ProgressSink, ProgressTracker};
use crate::raster::Raster;

const THREAD_NAME: &str = "filter-worker";

/// Single-slot filter runner.
#[derive(Debug, Default)]
pub struct FilterWorker {
    busy: Arc<AtomicBool>,
    parallelism: Parallelism,
}

impl FilterWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker whose jobs use `parallelism` for the default traversal.
    pub fn with_parallelism(parallelism: Parallelism) -> Self {
        FilterWorker {
            busy: Arc::default(),
            parallelism,
        }
    }

    /// Whether a submitted job is still running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start `filter` on `source` in the background.
    pub fn submit(&self, filter: Filter, source: Raster) -> Result<FilterJob> {
        self.submit_with_token(filter, source, CancellationToken::new())
    }

    /// Like [`FilterWorker::submit`], observing an existing cancellation token.
    pub fn submit_with_token(&self, filter: Filter, source: Raster, token: CancellationToken) -> Result<FilterJob> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FilterError::WorkerBusy);
        }
        // Released when the job thread ends, or right away if spawning fails.
        let slot = BusySlot(Arc::clone(&self.busy));

        let tracker = ProgressTracker::with_token(token);
        let job_tracker = tracker.clone();
        let parallelism = self.parallelism;
        let mut filter = filter;

        debug!("Submitting {} ({}x{})", filter.name(), source.width(), source.height());

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _slot = slot;
                let outcome = filter.process_image_with(&source, &job_tracker, ProgressRange::FULL, parallelism);
                if !outcome.is_cancelled() {
                    job_tracker.report_progress(100);
                }
                outcome
            })?;

        Ok(FilterJob { tracker, handle })
    }
}

struct BusySlot(Arc<AtomicBool>);

impl Drop for BusySlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a running filter invocation.
#[derive(Debug)]
pub struct FilterJob {
    tracker: ProgressTracker,
    handle: JoinHandle<Outcome>,
}

impl FilterJob {
    /// Last reported percentage; `100` once the job completed.
    pub fn progress(&self) -> u32 {
        self.tracker.percent()
    }

    /// Ask the job to stop at the next column boundary.
    pub fn cancel(&self) {
        self.tracker.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the job ends.
    pub fn wait(self) -> Result<Outcome> {
        self.handle.join().map_err(|_| {
            warn!("Filter job panicked");
            FilterError::WorkerPanicked
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Median, Negative};
    use crate::raster::Rgb;

    #[test]
    fn test_job_completes_with_full_progress() {
        let worker = FilterWorker::new();
        let source = Raster::filled(16, 16, Rgb::gray(30));
        let job = worker.submit(Filter::Negative(Negative), source).unwrap();
        let tracker = job.tracker.clone();
        let outcome = job.wait().unwrap();
        assert_eq!(outcome.into_raster().unwrap().get_pixel(3, 3), Rgb::gray(225));
        assert_eq!(tracker.percent(), 100);
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_busy_worker_rejects_submission() {
        let worker = FilterWorker::new();
        worker.busy.store(true, Ordering::SeqCst);
        let result = worker.submit(Filter::Negative(Negative), Raster::new(2, 2));
        assert!(matches!(result, Err(FilterError::WorkerBusy)));
        // the rejected submission must not release the slot it does not own
        assert!(worker.is_busy());
    }

    #[test]
    fn test_worker_reusable_after_job() {
        let worker = FilterWorker::with_parallelism(Parallelism::Rayon);
        for _ in 0..3 {
            let job = worker
                .submit(Filter::Median(Median::default()), Raster::filled(8, 8, Rgb::WHITE))
                .unwrap();
            assert!(job.wait().unwrap().raster().is_some());
        }
    }

    #[test]
    fn test_cancelled_job_yields_no_raster() {
        let worker = FilterWorker::new();
        let token = CancellationToken::new();
        token.cancel();
        let job = worker
            .submit_with_token(Filter::gaussian_blur(), Raster::filled(32, 32, Rgb::BLUE), token)
            .unwrap();
        assert!(job.wait().unwrap().is_cancelled());
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_job_owns_source() {
        let worker = FilterWorker::new();
        let original = Raster::filled(4, 4, Rgb::gray(10));
        let job = worker.submit(Filter::Negative(Negative), original.clone()).unwrap();
        let _ = job.wait().unwrap();
        assert_eq!(original.get_pixel(0, 0), Rgb::gray(10));
    }
}
