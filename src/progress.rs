//! Progress reporting and cooperative cancellation.
//!
//! Every traversal reports a percentage once per column and polls the sink for
//! a cancellation request at the same point. A cancelled traversal never hands
//! back a partially filled raster; it returns [`Outcome::Cancelled`] instead.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::raster::Raster;

/// Receiver of progress updates that can also request cancellation.
///
/// Methods take `&self` so a sink can be shared with the thread that wants to
/// observe or cancel the work.
pub trait ProgressSink {
    /// Called with a percentage in `0..=100`, never decreasing within one traversal.
    fn report_progress(&self, percent: u32);

    /// Polled once per column.
    fn cancellation_requested(&self) -> bool;
}

/// Sink that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report_progress(&self, _percent: u32) {}

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl ProgressSink for CancellationToken {
    fn report_progress(&self, _percent: u32) {}

    fn cancellation_requested(&self) -> bool {
        self.is_cancelled()
    }
}

/// Sink that remembers the last reported percentage.
///
/// Clones share state, so one clone can run the filter while another polls
/// [`ProgressTracker::percent`] or calls [`ProgressTracker::cancel`].
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    percent: Arc<AtomicU32>,
    token: CancellationToken,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        ProgressTracker {
            percent: Arc::default(),
            token,
        }
    }

    pub fn percent(&self) -> u32 {
        self.percent.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl ProgressSink for ProgressTracker {
    fn report_progress(&self, percent: u32) {
        self.percent.store(percent.min(100), Ordering::SeqCst);
    }

    fn cancellation_requested(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Sub-range of the progress bar a traversal reports into.
///
/// A traversal over `n` columns reports `floor(i / n * max_percent) + offset`
/// before column `i`. Two-phase filters split `0..=100` into two halves this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRange {
    pub max_percent: u32,
    pub offset: u32,
}

impl ProgressRange {
    pub const FULL: ProgressRange = ProgressRange::new(100, 0);

    pub const fn new(max_percent: u32, offset: u32) -> Self {
        ProgressRange {
            max_percent,
            offset,
        }
    }

    /// Percentage to report before processing step `step` of `total`.
    #[inline]
    pub fn percent_at(&self, step: usize, total: usize) -> u32 {
        if total == 0 {
            return self.offset;
        }
        (step as f64 / total as f64 * f64::from(self.max_percent)) as u32 + self.offset
    }
}

impl Default for ProgressRange {
    fn default() -> Self {
        ProgressRange::FULL
    }
}

/// Result of running a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The filter ran to completion and produced a new raster.
    Completed(Raster),
    /// Cancellation was requested; no raster was produced.
    Cancelled,
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The produced raster, or `None` if the run was cancelled.
    pub fn into_raster(self) -> Option<Raster> {
        match self {
            Outcome::Completed(raster) => Some(raster),
            Outcome::Cancelled => None,
        }
    }

    pub fn raster(&self) -> Option<&Raster> {
        match self {
            Outcome::Completed(raster) => Some(raster),
            Outcome::Cancelled => None,
        }
    }
}

/// Test double that records every report and cancels after a number of polls.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    reports: std::sync::Mutex<Vec<u32>>,
    polls: AtomicU32,
    cancel_after: Option<u32>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation on poll number `polls` (0 = before the first column).
    pub fn cancelling_after(polls: u32) -> Self {
        RecordingSink {
            cancel_after: Some(polls),
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<u32> {
        self.reports.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ProgressSink for RecordingSink {
    fn report_progress(&self, percent: u32) {
        self.reports.lock().unwrap().push(percent);
    }

    fn cancellation_requested(&self) -> bool {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        matches!(self.cancel_after, Some(limit) if poll >= limit)
    }
}
