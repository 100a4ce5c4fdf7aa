//! Error type for filter construction and the filter worker.
//!
//! Pixel arithmetic itself never fails, and cancellation is reported through
//! [`Outcome`](crate::progress::Outcome), not as an error.

use thiserror::Error;

/// Errors raised when building filters or rasters, or when running a job.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// Kernel width or height is even, so there is no center cell.
    #[error("Kernel dimensions must be odd, got {width}x{height}")]
    EvenKernel { width: usize, height: usize },

    /// Kernel weights don't fill a rectangle.
    #[error("Kernel rows must all have the same length")]
    RaggedKernel,

    /// Gaussian sigma must be strictly positive.
    #[error("Gaussian sigma must be > 0, got {0}")]
    NonPositiveSigma(f64),

    /// Probability outside `[0, 1]`.
    #[error("Probability `{name}` must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    /// A procedural size parameter is below its lower bound.
    #[error("`{name}` must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    /// Contrast factor must be strictly positive to take its reciprocal.
    #[error("Contrast amount must be > 0, got {0}")]
    NonPositiveContrast(f64),

    /// Pixel buffer length does not match the raster dimensions.
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Array shape could not be used as a raster.
    #[error("Invalid raster shape: {0}")]
    Shape(String),

    /// Input has a channel count other than 3.
    #[error("Expected 3 color channels, got {0}")]
    ChannelCount(usize),

    /// A job is already running on the worker.
    #[error("A filter is already running")]
    WorkerBusy,

    /// The worker thread could not be spawned.
    #[error("Could not start worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The filter panicked on the worker thread.
    #[error("Filter job panicked")]
    WorkerPanicked,
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
