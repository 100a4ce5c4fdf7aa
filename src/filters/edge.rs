//! Contour filter: marks pixels that differ from an axis neighbour.
//!
//! Each pixel is compared with its left, right, upper and lower neighbours
//! (edge-clamped). If any channel of any neighbour differs by more than the
//! threshold the pixel is replaced by the accent color, otherwise the source
//! pixel is kept.

use super::traversal::PixelFilter;
use crate::raster::{Raster, Rgb};

/// Channel difference above which a neighbour counts as an edge.
pub const CONTOUR_THRESHOLD: u8 = 10;

/// Color painted on edge pixels.
pub const CONTOUR_ACCENT: Rgb = Rgb::BLUE;

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contour {
    pub threshold: u8,
    pub accent: Rgb,
}

impl Default for Contour {
    fn default() -> Self {
        Contour {
            threshold: CONTOUR_THRESHOLD,
            accent: CONTOUR_ACCENT,
        }
    }
}

impl Contour {
    #[inline]
    fn differs(&self, a: Rgb, b: Rgb) -> bool {
        a.r.abs_diff(b.r) > self.threshold
            || a.g.abs_diff(b.g) > self.threshold
            || a.b.abs_diff(b.b) > self.threshold
    }
}

impl PixelFilter for Contour {
    fn compute_pixel(&self, source: &Raster, x: usize, y: usize) -> Rgb {
        let center = source.get_pixel(x, y);
        let (x, y) = (x as isize, y as isize);

        let on_edge = NEIGHBOURS
            .iter()
            .any(|&(dx, dy)| self.differs(center, source.get_clamped(x + dx, y + dy)));

        if on_edge {
            self.accent
        } else {
            center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::traversal::{process_with, Parallelism};
    use crate::progress::{NoProgress, ProgressRange};

    fn run(source: &Raster) -> Raster {
        process_with(&Contour::default(), source, &NoProgress, ProgressRange::FULL, Parallelism::Rayon)
            .into_raster()
            .unwrap()
    }

    #[test]
    fn test_uniform_image_has_no_contour() {
        let source = Raster::filled(5, 5, Rgb::new(40, 90, 160));
        assert_eq!(run(&source), source);
    }

    #[test]
    fn test_step_marks_both_sides() {
        // left half 0, right half 100: columns 1 and 2 touch the step
        let source = Raster::from_fn(4, 3, |x, _| if x < 2 { Rgb::gray(0) } else { Rgb::gray(100) });
        let result = run(&source);
        for y in 0..3 {
            assert_eq!(result.get_pixel(0, y), Rgb::gray(0));
            assert_eq!(result.get_pixel(1, y), CONTOUR_ACCENT);
            assert_eq!(result.get_pixel(2, y), CONTOUR_ACCENT);
            assert_eq!(result.get_pixel(3, y), Rgb::gray(100));
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let source = Raster::from_pixels(2, 1, &[Rgb::gray(50), Rgb::new(60, 50, 50)]).unwrap();
        // difference of exactly 10 is not an edge
        assert_eq!(run(&source), source);

        let source = Raster::from_pixels(2, 1, &[Rgb::gray(50), Rgb::new(50, 50, 61)]).unwrap();
        let result = run(&source);
        assert_eq!(result.get_pixel(0, 0), Rgb::BLUE);
        assert_eq!(result.get_pixel(1, 0), Rgb::BLUE);
    }

    #[test]
    fn test_diagonal_neighbours_ignored() {
        let source = Raster::from_fn(3, 3, |x, y| if (x, y) == (0, 0) { Rgb::WHITE } else { Rgb::BLACK });
        let result = run(&source);
        assert_eq!(result.get_pixel(1, 1), Rgb::BLACK);
        assert_eq!(result.get_pixel(1, 0), Rgb::BLUE);
        assert_eq!(result.get_pixel(0, 1), Rgb::BLUE);
    }
}
