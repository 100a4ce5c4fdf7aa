//! Core utilities shared by multiple filters.
//!
//! This module provides:
//! - Value clamping
//! - Convolution kernels and Gaussian kernel generation
//! - The fixed sharpen kernel

use ndarray::{Array2, ArrayView2};

use crate::error::{FilterError, Result};

/// Bound `value` to `[min, max]`.
///
/// Unlike [`Ord::clamp`] this never panics when `min > max`; `min` wins.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp an integer into the u8 channel range.
#[inline]
pub fn clamp_channel(value: i64) -> u8 {
    clamp(value, 0, 255) as u8
}

/// Truncate toward zero, then clamp into the channel range.
#[inline]
pub fn truncate_channel(value: f64) -> u8 {
    clamp_channel(value as i64)
}

/// Default Gaussian radius.
pub const GAUSSIAN_RADIUS: usize = 3;
/// Default Gaussian sigma.
pub const GAUSSIAN_SIGMA: f64 = 2.0;

/// 2D grid of convolution weights with odd width and height.
///
/// Stored as `(height, width)`; weight `(k, l)` for horizontal offset `k` and
/// vertical offset `l` sits at row `l + radius_y`, column `k + radius_x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Build a kernel from rows of weights.
    pub fn new(rows: &[&[f64]]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return Err(FilterError::RaggedKernel);
        }
        let weights = Array2::from_shape_fn((height, width), |(row, col)| rows[row][col]);
        Kernel::from_array(weights)
    }

    /// Wrap a `(height, width)` weight array.
    pub fn from_array(weights: Array2<f64>) -> Result<Self> {
        let (height, width) = weights.dim();
        if height % 2 == 0 || width % 2 == 0 {
            return Err(FilterError::EvenKernel { width, height });
        }
        Ok(Kernel { weights })
    }

    /// Normalized Gaussian kernel of size `(2 * radius + 1)²`.
    ///
    /// `weight(i, j) = exp(-(i² + j²) / sigma²)`, divided by the sum of all weights.
    pub fn gaussian(radius: usize, sigma: f64) -> Result<Self> {
        if sigma.is_nan() || sigma <= 0.0 {
            return Err(FilterError::NonPositiveSigma(sigma));
        }
        Ok(Kernel {
            weights: gaussian_weights(radius, sigma),
        })
    }

    /// The 3x3 sharpen kernel `[[0,-1,0],[-1,5,-1],[0,-1,0]]`.
    pub fn sharpen() -> Self {
        Kernel {
            weights: ndarray::arr2(&[[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.weights.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.weights.dim().0
    }

    #[inline]
    pub fn radius_x(&self) -> usize {
        self.width() / 2
    }

    #[inline]
    pub fn radius_y(&self) -> usize {
        self.height() / 2
    }

    /// Weight for horizontal offset `k` and vertical offset `l` from the center.
    #[inline]
    pub fn weight(&self, k: isize, l: isize) -> f64 {
        let col = (k + self.radius_x() as isize) as usize;
        let row = (l + self.radius_y() as isize) as usize;
        self.weights[[row, col]]
    }

    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }
}

impl Default for Kernel {
    /// Gaussian kernel with radius 3 and sigma 2.
    fn default() -> Self {
        Kernel {
            weights: gaussian_weights(GAUSSIAN_RADIUS, GAUSSIAN_SIGMA),
        }
    }
}

fn gaussian_weights(radius: usize, sigma: f64) -> Array2<f64> {
    let size = radius * 2 + 1;
    let r = radius as isize;
    let sigma_sq = sigma * sigma;

    let mut weights = Array2::<f64>::zeros((size, size));
    let mut norm = 0.0;
    for i in -r..=r {
        for j in -r..=r {
            let w = (-((i * i + j * j) as f64) / sigma_sq).exp();
            weights[[(i + r) as usize, (j + r) as usize]] = w;
            norm += w;
        }
    }
    weights.mapv_inplace(|w| w / norm);
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-4, 0, 10), 0);
        assert_eq!(clamp(14, 0, 10), 10);
        assert_eq!(clamp(7, 0, 10), 7);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_truncate_channel_truncates_toward_zero() {
        assert_eq!(truncate_channel(127.99), 127);
        assert_eq!(truncate_channel(-0.9), 0);
        assert_eq!(truncate_channel(-12.5), 0);
        assert_eq!(truncate_channel(300.2), 255);
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        for radius in 0..6 {
            for sigma in [0.3, 1.0, 2.0, 5.5] {
                let kernel = Kernel::gaussian(radius, sigma).unwrap();
                assert_eq!(kernel.width(), radius * 2 + 1);
                assert!(
                    (kernel.sum() - 1.0).abs() < 1e-9,
                    "radius={} sigma={} sum={}",
                    radius,
                    sigma,
                    kernel.sum()
                );
            }
        }
    }

    #[test]
    fn test_gaussian_kernel_peaks_at_center() {
        let kernel = Kernel::gaussian(2, 1.0).unwrap();
        let center = kernel.weight(0, 0);
        for l in -2..=2 {
            for k in -2..=2 {
                assert!(kernel.weight(k, l) <= center);
            }
        }
        assert_eq!(kernel.weight(-1, 2), kernel.weight(2, -1));
    }

    #[test]
    fn test_gaussian_rejects_non_positive_sigma() {
        assert!(matches!(
            Kernel::gaussian(3, 0.0),
            Err(FilterError::NonPositiveSigma(_))
        ));
        assert!(Kernel::gaussian(3, -1.0).is_err());
        assert!(Kernel::gaussian(3, f64::NAN).is_err());
    }

    #[test]
    fn test_default_kernel_matches_gaussian_defaults() {
        let expected = Kernel::gaussian(GAUSSIAN_RADIUS, GAUSSIAN_SIGMA).unwrap();
        assert_eq!(Kernel::default(), expected);
    }

    #[test]
    fn test_sharpen_kernel_sums_to_one() {
        let kernel = Kernel::sharpen();
        assert_eq!(kernel.sum(), 1.0);
        assert_eq!(kernel.weight(0, 0), 5.0);
        assert_eq!(kernel.weight(1, 1), 0.0);
        assert_eq!(kernel.weight(0, -1), -1.0);
    }

    #[test]
    fn test_even_kernel_rejected() {
        let err = Kernel::new(&[&[1.0, 1.0], &[1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, FilterError::EvenKernel { width: 2, height: 2 }));
        assert!(matches!(
            Kernel::new(&[&[1.0, 1.0, 1.0], &[1.0]]),
            Err(FilterError::RaggedKernel)
        ));
    }

    #[test]
    fn test_rectangular_kernel_radii() {
        let kernel = Kernel::new(&[&[0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(kernel.radius_x(), 2);
        assert_eq!(kernel.radius_y(), 0);
        assert_eq!(kernel.weight(0, 0), 1.0);
    }
}
