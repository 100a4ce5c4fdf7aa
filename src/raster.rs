//! RGB raster image backed by an `ndarray` buffer.
//!
//! Pixels are stored as `(height, width, 3)` u8 arrays, the same layout the
//! numpy and WASM bindings exchange. Coordinates in the public API are always
//! `(x, y)` = `(column, row)`.

use ndarray::{Array3, ArrayView3};

use crate::error::{FilterError, Result};

/// Number of color channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// A single RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Rgb::new(value, value, value)
    }

    /// Channels in R, G, B order.
    #[inline]
    pub const fn channels(self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub const fn from_channels(c: [u8; CHANNELS]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::from_channels(c)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Owned RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    data: Array3<u8>,
}

impl Raster {
    /// Black raster of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            data: Array3::<u8>::zeros((height, width, CHANNELS)),
        }
    }

    /// Raster with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Raster::from_fn(width, height, |_, _| color)
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let mut raster = Raster::new(width, height);
        for y in 0..height {
            for x in 0..width {
                raster.set_pixel(x, y, f(x, y));
            }
        }
        raster
    }

    /// Build a raster from pixels listed in row-major order.
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgb]) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(FilterError::BufferSize {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Raster::from_fn(width, height, |x, y| pixels[y * width + x]))
    }

    /// Wrap an array of shape `(height, width, 3)`.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (_, _, channels) = data.dim();
        if channels != CHANNELS {
            return Err(FilterError::ChannelCount(channels));
        }
        Ok(Raster { data })
    }

    /// Build a raster from a flat, row-major RGB byte buffer.
    pub fn from_raw(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        let expected = width * height * CHANNELS;
        if bytes.len() != expected {
            return Err(FilterError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), bytes)
            .map_err(|e| FilterError::Shape(e.to_string()))?;
        Ok(Raster { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// # Panics
    /// If `(x, y)` is outside the raster.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        Rgb::new(
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        )
    }

    /// # Panics
    /// If `(x, y)` is outside the raster.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        self.data[[y, x, 0]] = color.r;
        self.data[[y, x, 1]] = color.g;
        self.data[[y, x, 2]] = color.b;
    }

    /// Pixel at `(x, y)` with both coordinates clamped into the raster.
    ///
    /// The raster must not be empty.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> Rgb {
        let cx = crate::filters::core::clamp(x, 0, self.width() as isize - 1) as usize;
        let cy = crate::filters::core::clamp(y, 0, self.height() as isize - 1) as usize;
        self.get_pixel(cx, cy)
    }

    /// Whether signed coordinates fall inside the raster.
    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        let (width, height) = self.dimensions();
        (0..height).flat_map(move |y| (0..width).map(move |x| self.get_pixel(x, y)))
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Flat row-major RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        if self.data.is_standard_layout() {
            self.data.into_raw_vec_and_offset().0
        } else {
            self.data.iter().copied().collect()
        }
    }
}
