//! 2D convolution with edge-clamped sampling.
//!
//! Out-of-bounds taps repeat the nearest edge pixel. Sums are accumulated in
//! `f64` per channel and the result is truncated toward zero before clamping,
//! which matters for kernels with negative weights such as sharpen.

use super::core::{truncate_channel, Kernel, GAUSSIAN_RADIUS, GAUSSIAN_SIGMA};
use super::traversal::PixelFilter;
use crate::error::Result;
use crate::raster::{Raster, Rgb};

/// Convolve the source with an arbitrary odd-sized kernel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Convolution {
    kernel: Kernel,
}

impl Convolution {
    pub fn new(kernel: Kernel) -> Self {
        Convolution { kernel }
    }

    /// Gaussian blur, see [`Kernel::gaussian`].
    pub fn gaussian(radius: usize, sigma: f64) -> Result<Self> {
        Ok(Convolution::new(Kernel::gaussian(radius, sigma)?))
    }

    /// Sharpen with the fixed 3x3 kernel.
    pub fn sharpen() -> Self {
        Convolution::new(Kernel::sharpen())
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl PixelFilter for Convolution {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let rx = self.kernel.radius_x() as isize;
        let ry = self.kernel.radius_y() as isize;
        let (x, y) = (x as isize, y as isize);

        let mut sum = [0.0f64; 3];
        for l in -ry..=ry {
            for k in -rx..=rx {
                let weight = self.kernel.weight(k, l);
                let p = source.get_clamped(x + k, y + l);
                sum[0] += f64::from(p.r) * weight;
                sum[1] += f64::from(p.g) * weight;
                sum[2] += f64::from(p.b) * weight;
            }
        }

        Rgb::new(
            truncate_channel(sum[0]),
            truncate_channel(sum[1]),
            truncate_channel(sum[2]),
        )
    }
}

/// Default Gaussian blur parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParams {
    pub radius: usize,
    pub sigma: f64,
}

impl Default for GaussianParams {
    fn default() -> Self {
        GaussianParams {
            radius: GAUSSIAN_RADIUS,
            sigma: GAUSSIAN_SIGMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::traversal::{process_with, Parallelism};
    use crate::progress::{NoProgress, ProgressRange};

    fn run(filter: &Convolution, source: &Raster) -> Raster {
        process_with(filter, source, &NoProgress, ProgressRange::FULL, Parallelism::Sequential)
            .into_raster()
            .unwrap()
    }

    #[test]
    fn test_uniform_image_unchanged_by_sharpen_and_gaussian() {
        let source = Raster::filled(3, 3, Rgb::gray(128));
        assert_eq!(run(&Convolution::sharpen(), &source), source);
        let params = GaussianParams::default();
        let gaussian = Convolution::gaussian(params.radius, params.sigma).unwrap();
        assert_eq!(run(&gaussian, &source), source);
    }

    #[test]
    fn test_gaussian_truncation_may_lose_one_level() {
        // normalized weights sum to 1 only within rounding, and the sum is
        // truncated: some flat gray levels come back one lower
        let gaussian = Convolution::default();
        for level in [7u8, 100, 200] {
            let source = Raster::filled(2, 2, Rgb::gray(level));
            let p = run(&gaussian, &source).get_pixel(0, 0);
            assert!(p.r == level || p.r == level - 1, "level {} -> {:?}", level, p);
        }
    }

    #[test]
    fn test_identity_kernel() {
        let kernel = Kernel::new(&[&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 0.0]]).unwrap();
        let source = Raster::from_fn(5, 4, |x, y| Rgb::new(x as u8 * 40, y as u8 * 60, 7));
        assert_eq!(run(&Convolution::new(kernel), &source), source);
    }

    #[test]
    fn test_sharpen_clamps_and_truncates() {
        // bright center on a dark field overshoots, dark neighbours undershoot
        let source = Raster::from_fn(3, 3, |x, y| {
            if (x, y) == (1, 1) {
                Rgb::gray(200)
            } else {
                Rgb::gray(10)
            }
        });
        let result = run(&Convolution::sharpen(), &source);
        // 5*200 - 4*10 = 960
        assert_eq!(result.get_pixel(1, 1), Rgb::gray(255));
        // (1,0): top neighbour clamps to itself: 5*10 - 10 - 10 - 10 - 200 = -180
        assert_eq!(result.get_pixel(1, 0), Rgb::gray(0));
        // corner (0,0): all taps are 10, sum of weights 1 -> 10
        assert_eq!(result.get_pixel(0, 0), Rgb::gray(10));
    }

    #[test]
    fn test_horizontal_kernel_samples_clamped_edges() {
        // picks the pixel two columns to the right
        let kernel = Kernel::new(&[&[0.0, 0.0, 0.0, 0.0, 1.0]]).unwrap();
        let source = Raster::from_fn(4, 1, |x, _| Rgb::gray(x as u8 * 10));
        let result = run(&Convolution::new(kernel), &source);
        let values: Vec<u8> = result.pixels().map(|p| p.r).collect();
        assert_eq!(values, vec![20, 30, 30, 30]);
    }

    #[test]
    fn test_fractional_sum_truncates() {
        let kernel = Kernel::new(&[&[0.0, 0.0, 0.0], &[0.0, 0.999, 0.0], &[0.0, 0.0, 0.0]]).unwrap();
        let source = Raster::filled(2, 2, Rgb::gray(100));
        // 99.9 -> 99, never rounded up
        assert_eq!(run(&Convolution::new(kernel), &source).get_pixel(0, 0), Rgb::gray(99));
    }
}
