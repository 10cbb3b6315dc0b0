// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover fit — scale the artwork so it fills the whole grid while keeping its
// aspect ratio. One axis matches the grid exactly; the other may overflow and
// is brought into view with the placement offset.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{GridGeometry, RenderedArtworkSize};

/// Which grid axis the artwork matches exactly after a cover fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitAxis {
    /// Artwork is wider than the grid: heights match, width overflows.
    Height,
    /// Artwork is as tall or taller than the grid: widths match, height
    /// overflows (or matches too when the ratios are equal).
    Width,
}

pub struct CoverFitCalculator;

impl CoverFitCalculator {
    /// Width / height of a pixel image. Zero dimensions mean the source could
    /// not be measured, which is a decode failure.
    pub fn aspect_ratio(width_px: u32, height_px: u32) -> Result<f64> {
        if width_px == 0 || height_px == 0 {
            return Err(TilewerkError::Decode(format!(
                "artwork has unusable dimensions {width_px}x{height_px}"
            )));
        }
        Ok(width_px as f64 / height_px as f64)
    }

    /// Decide the matched axis for artwork aspect `r` against grid aspect `g`.
    pub fn fit_axis(artwork_aspect: f64, grid_aspect: f64) -> FitAxis {
        if artwork_aspect > grid_aspect {
            FitAxis::Height
        } else {
            FitAxis::Width
        }
    }

    /// Rendered artwork size in cm.
    ///
    /// If `r > g` the heights match and `width = grid_height * r`; otherwise
    /// the widths match and `height = grid_width / r`.
    pub fn fit(grid: &GridGeometry, artwork_aspect: f64) -> Result<RenderedArtworkSize> {
        if !(artwork_aspect.is_finite() && artwork_aspect > 0.0) {
            return Err(TilewerkError::validation(format!(
                "artwork aspect ratio must be positive, got {artwork_aspect}"
            )));
        }
        let size = match Self::fit_axis(artwork_aspect, grid.aspect_ratio()) {
            FitAxis::Height => RenderedArtworkSize {
                height_cm: grid.grid_height_cm,
                width_cm: grid.grid_height_cm * artwork_aspect,
            },
            FitAxis::Width => RenderedArtworkSize {
                width_cm: grid.grid_width_cm,
                height_cm: grid.grid_width_cm / artwork_aspect,
            },
        };
        Ok(size)
    }

    /// Pixel counterpart of [`fit`](Self::fit) for a grid of
    /// `grid_width_px` x `grid_height_px`.
    ///
    /// The matched axis is taken from the cm computation so preview and raster
    /// never disagree about which edge overflows. The overflowing axis is
    /// never allowed to round below the grid, so blank margins cannot appear
    /// at offset zero.
    pub fn fit_px(
        axis: FitAxis,
        grid_width_px: u32,
        grid_height_px: u32,
        artwork_aspect: f64,
    ) -> (u32, u32) {
        match axis {
            FitAxis::Height => {
                let width = (grid_height_px as f64 * artwork_aspect).round() as u32;
                (width.max(grid_width_px), grid_height_px)
            }
            FitAxis::Width => {
                let height = (grid_width_px as f64 / artwork_aspect).round() as u32;
                (grid_width_px, height.max(grid_height_px))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayoutCalculator;
    use tilewerk_core::types::{Orientation, PaperSize};

    fn a4_two_by_two() -> GridGeometry {
        let config =
            GridLayoutCalculator::job_config(PaperSize::A4, Orientation::Portrait, 4, 0.5)
                .unwrap();
        GridLayoutCalculator::geometry(&config).unwrap()
    }

    #[test]
    fn square_artwork_on_tall_grid_matches_height() {
        let grid = a4_two_by_two();
        // g = 41.5 / 58.9 ~ 0.70 < r = 1.0, so heights match.
        assert!(grid.aspect_ratio() < 1.0);
        let size = CoverFitCalculator::fit(&grid, 1.0).unwrap();
        assert!((size.height_cm - 58.9).abs() < 1e-9);
        assert!((size.width_cm - 58.9).abs() < 1e-9);
        assert!(size.width_cm >= grid.grid_width_cm);
    }

    #[test]
    fn tall_artwork_matches_width() {
        let grid = a4_two_by_two();
        let size = CoverFitCalculator::fit(&grid, 0.5).unwrap();
        assert!((size.width_cm - 41.5).abs() < 1e-9);
        assert!((size.height_cm - 83.0).abs() < 1e-9);
    }

    #[test]
    fn cover_never_leaves_both_axes_short() {
        let grid = a4_two_by_two();
        for aspect in [0.1, 0.3, 0.7045, 1.0, 1.7778, 4.0, 12.0] {
            let size = CoverFitCalculator::fit(&grid, aspect).unwrap();
            assert!(size.width_cm >= grid.grid_width_cm - 1e-9, "aspect {aspect}");
            assert!(size.height_cm >= grid.grid_height_cm - 1e-9, "aspect {aspect}");
            assert!((size.width_cm / size.height_cm - aspect).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_dimension_is_decode_error() {
        assert!(matches!(
            CoverFitCalculator::aspect_ratio(0, 100),
            Err(TilewerkError::Decode(_))
        ));
    }

    #[test]
    fn non_positive_aspect_rejected() {
        let grid = a4_two_by_two();
        assert!(CoverFitCalculator::fit(&grid, 0.0).is_err());
        assert!(CoverFitCalculator::fit(&grid, f64::NAN).is_err());
    }

    #[test]
    fn pixel_fit_covers_grid() {
        assert_eq!(CoverFitCalculator::fit_px(FitAxis::Height, 100, 200, 1.0), (200, 200));
        assert_eq!(CoverFitCalculator::fit_px(FitAxis::Width, 200, 100, 1.0), (200, 200));
        // Rounding below the grid is lifted back up to it.
        assert_eq!(CoverFitCalculator::fit_px(FitAxis::Height, 100, 50, 1.98), (100, 50));
    }
}
