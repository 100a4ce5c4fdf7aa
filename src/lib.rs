//! StagFilters
//!
//! Pixel-level filters for 8-bit RGB rasters: color adjustments, convolution,
//! noise generation and removal, edge marking and geometric distortion. Every
//! filter reports progress and can be cancelled cooperatively.
//!
//! Python bindings via PyO3 and WASM bindings for JavaScript are available
//! behind the `python` and `wasm` features.
//!
//! ## Image Format
//! Rasters are `(height, width, 3)` arrays of `u8`, R, G, B per pixel.
//!
//! ## Usage
//! ```
//! use stagfilters::{Filter, NoProgress, ProgressRange, Raster, Rgb};
//!
//! let source = Raster::filled(4, 4, Rgb::gray(10));
//! let outcome = Filter::brighten(20).process_image(&source, &NoProgress, ProgressRange::FULL);
//! assert_eq!(outcome.into_raster().unwrap().get_pixel(0, 0), Rgb::gray(30));
//! ```

pub mod error;
pub mod filters;
pub mod progress;
pub mod raster;
pub mod worker;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::{Filter, Kernel, Parallelism, PixelFilter};
pub use progress::{CancellationToken, NoProgress, Outcome, ProgressRange, ProgressSink, ProgressTracker};
pub use raster::{Raster, Rgb};
pub use worker::{FilterJob, FilterWorker};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array3;
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::{self, Filter, Parallelism};
    use crate::progress::{NoProgress, ProgressRange};
    use crate::raster::Raster;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::WorkerPanicked | FilterError::WorkerBusy | FilterError::Spawn(_) => {
                    PyRuntimeError::new_err(err.to_string())
                }
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    fn to_raster(image: &PyReadonlyArray3<'_, u8>) -> PyResult<Raster> {
        Ok(Raster::from_array(image.as_array().to_owned())?)
    }

    fn apply(image: PyReadonlyArray3<'_, u8>, mut filter: Filter) -> PyResult<Array3<u8>> {
        let source = to_raster(&image)?;
        filter
            .process_image_with(&source, &NoProgress, ProgressRange::FULL, Parallelism::Rayon)
            .into_raster()
            .map(Raster::into_array)
            .ok_or_else(|| PyRuntimeError::new_err("filter was cancelled"))
    }

    // ========================================================================
    // Color
    // ========================================================================

    /// Invert every channel of an RGB u8 image.
    #[pyfunction]
    pub fn negative<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Negative.into())?.into_pyarray(py))
    }

    /// Grayscale with weights 0.299 / 0.5876 / 0.114.
    #[pyfunction]
    pub fn grayscale<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Grayscale.into())?.into_pyarray(py))
    }

    #[pyfunction]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Brightness::new(amount).into())?.into_pyarray(py))
    }

    /// Stretch channels around the mean brightness by `amount` (> 0).
    #[pyfunction]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, Filter::increase_contrast(amount)?)?.into_pyarray(py))
    }

    /// Number of pixels per luminance value (256 bins).
    #[pyfunction]
    pub fn luminance_histogram(image: PyReadonlyArray3<'_, u8>) -> PyResult<Vec<u64>> {
        Ok(filters::luminance_histogram(&to_raster(&image)?).to_vec())
    }

    // ========================================================================
    // Convolution
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, radius=3, sigma=2.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, Filter::gaussian(radius, sigma)?)?.into_pyarray(py))
    }

    #[pyfunction]
    pub fn sharpen<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, Filter::sharpen())?.into_pyarray(py))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, radius=1))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Median::new(radius).into())?.into_pyarray(py))
    }

    /// Salt-and-pepper noise. Pass `seed` for reproducible output.
    #[pyfunction]
    #[pyo3(signature = (image, p_white=0.02, p_black=0.02, seed=None))]
    pub fn noise_dots<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        p_white: f64,
        p_black: f64,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = match seed {
            Some(seed) => filters::NoiseDots::with_seed(p_white, p_black, seed)?,
            None => filters::NoiseDots::new(p_white, p_black)?,
        };
        Ok(apply(image, filter.into())?.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, number_of_lines=50, max_length=40, seed=None))]
    pub fn noise_lines<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        number_of_lines: usize,
        max_length: usize,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = match seed {
            Some(seed) => filters::NoiseLines::with_seed(number_of_lines, max_length, seed)?,
            None => filters::NoiseLines::new(number_of_lines, max_length)?,
        };
        Ok(apply(image, filter.into())?.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, number_of_circles=1000, max_radius=30, p_white=0.5, p_black=0.5, seed=None))]
    pub fn noise_circles<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        number_of_circles: usize,
        max_radius: usize,
        p_white: f64,
        p_black: f64,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = match seed {
            Some(seed) => filters::NoiseCircles::with_seed(number_of_circles, max_radius, p_white, p_black, seed)?,
            None => filters::NoiseCircles::new(number_of_circles, max_radius, p_white, p_black)?,
        };
        Ok(apply(image, filter.into())?.into_pyarray(py))
    }

    // ========================================================================
    // Edge / Stylize
    // ========================================================================

    #[pyfunction]
    pub fn contour<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Contour::default().into())?.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, amplitude=20.0, period=30.0))]
    pub fn waves<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amplitude: f64,
        period: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(apply(image, filters::Waves::new(amplitude, period).into())?.into_pyarray(py))
    }

    #[pymodule]
    pub fn stagfilters(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Color
        m.add_function(wrap_pyfunction!(negative, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(luminance_histogram, m)?)?;

        // Convolution
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(noise_dots, m)?)?;
        m.add_function(wrap_pyfunction!(noise_lines, m)?)?;
        m.add_function(wrap_pyfunction!(noise_circles, m)?)?;

        // Edge / Stylize
        m.add_function(wrap_pyfunction!(contour, m)?)?;
        m.add_function(wrap_pyfunction!(waves, m)?)?;

        Ok(())
    }
}
