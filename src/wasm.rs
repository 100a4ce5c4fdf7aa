//! WebAssembly exports for StagFilters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images travel
//! as flat RGB byte buffers (length = width * height * 3, row-major). Invalid
//! buffers or parameters surface as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::{self, Filter};
use crate::progress::{NoProgress, ProgressRange};
use crate::raster::Raster;

fn to_js(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn apply(data: &[u8], width: usize, height: usize, mut filter: Filter) -> Result<Vec<u8>, JsValue> {
    let source = Raster::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    filter
        .process_image(&source, &NoProgress, ProgressRange::FULL)
        .into_raster()
        .map(Raster::into_raw)
        .ok_or_else(|| JsValue::from_str("filter was cancelled"))
}

// ============================================================================
// Color
// ============================================================================

/// Invert every channel.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of RGB bytes
#[wasm_bindgen]
pub fn negative_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Negative.into())
}

#[wasm_bindgen]
pub fn grayscale_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Grayscale.into())
}

#[wasm_bindgen]
pub fn brightness_wasm(data: &[u8], width: usize, height: usize, amount: i32) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Brightness::new(amount).into())
}

/// Stretch channels around the mean brightness; `amount` must be positive.
#[wasm_bindgen]
pub fn contrast_wasm(data: &[u8], width: usize, height: usize, amount: f64) -> Result<Vec<u8>, JsValue> {
    let filter = Filter::increase_contrast(amount).map_err(to_js)?;
    apply(data, width, height, filter)
}

// ============================================================================
// Convolution
// ============================================================================

#[wasm_bindgen]
pub fn gaussian_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
    sigma: f64,
) -> Result<Vec<u8>, JsValue> {
    let filter = Filter::gaussian(radius, sigma).map_err(to_js)?;
    apply(data, width, height, filter)
}

#[wasm_bindgen]
pub fn sharpen_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, Filter::sharpen())
}

// ============================================================================
// Noise
// ============================================================================

#[wasm_bindgen]
pub fn median_wasm(data: &[u8], width: usize, height: usize, radius: usize) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Median::new(radius).into())
}

/// Salt-and-pepper noise, reproducible for a given `seed`.
#[wasm_bindgen]
pub fn noise_dots_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    p_white: f64,
    p_black: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let filter = filters::NoiseDots::with_seed(p_white, p_black, seed).map_err(to_js)?;
    apply(data, width, height, filter.into())
}

#[wasm_bindgen]
pub fn noise_lines_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    number_of_lines: usize,
    max_length: usize,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let filter = filters::NoiseLines::with_seed(number_of_lines, max_length, seed).map_err(to_js)?;
    apply(data, width, height, filter.into())
}

#[wasm_bindgen]
pub fn noise_circles_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    number_of_circles: usize,
    max_radius: usize,
    p_white: f64,
    p_black: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let filter = filters::NoiseCircles::with_seed(number_of_circles, max_radius, p_white, p_black, seed)
        .map_err(to_js)?;
    apply(data, width, height, filter.into())
}

// ============================================================================
// Edge / Stylize
// ============================================================================

#[wasm_bindgen]
pub fn contour_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Contour::default().into())
}

#[wasm_bindgen]
pub fn waves_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    amplitude: f64,
    period: f64,
) -> Result<Vec<u8>, JsValue> {
    apply(data, width, height, filters::Waves::new(amplitude, period).into())
}
