// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Tilewerk poster tiler.
//
// Everything here is a plain value: recomputed per request or per preview
// frame, never persisted.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TilewerkError};

/// Sheet counts with a fixed grid layout.
pub const SUPPORTED_SHEET_COUNTS: [u32; 5] = [1, 2, 4, 6, 8];

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Portrait dimensions in centimetres (width, height).
    pub fn portrait_cm(&self) -> (f64, f64) {
        match self {
            Self::A4 => (21.0, 29.7),
            Self::A3 => (29.7, 42.0),
            Self::A5 => (14.8, 21.0),
            Self::Letter => (21.59, 27.94),
            Self::Legal => (21.59, 35.56),
            Self::Tabloid => (27.94, 43.18),
            Self::Custom {
                width_mm,
                height_mm,
            } => {
                let (w, h) = (*width_mm as f64 / 10.0, *height_mm as f64 / 10.0);
                (w.min(h), w.max(h))
            }
        }
    }

    /// Dimensions in centimetres (width, height) for the given orientation.
    pub fn dimensions_cm(&self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.portrait_cm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Sheet orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Physical layout of a multi-sheet print.
///
/// Build one with `tilewerk_layout::GridLayoutCalculator::job_config`, which
/// fills `cols`/`rows` from the fixed lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintJobConfig {
    pub paper_width_cm: f64,
    pub paper_height_cm: f64,
    /// Width of the strip each sheet shares with its right/bottom neighbour.
    pub overlap_cm: f64,
    pub sheet_count: u32,
    pub cols: u32,
    pub rows: u32,
}

impl PrintJobConfig {
    /// Check every invariant of the layout.
    ///
    /// Bad caller input yields `Validation`; a grid whose cell count does not
    /// match the sheet count yields `GeometryInconsistency`.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_SHEET_COUNTS.contains(&self.sheet_count) {
            return Err(TilewerkError::validation(format!(
                "sheet count must be one of {:?}, got {}",
                SUPPORTED_SHEET_COUNTS, self.sheet_count
            )));
        }
        for (name, value) in [
            ("paper width", self.paper_width_cm),
            ("paper height", self.paper_height_cm),
            ("overlap", self.overlap_cm),
        ] {
            if !value.is_finite() {
                return Err(TilewerkError::validation(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        if self.overlap_cm < 0.0 {
            return Err(TilewerkError::validation(format!(
                "overlap must not be negative, got {} cm",
                self.overlap_cm
            )));
        }
        if self.paper_width_cm <= self.overlap_cm || self.paper_height_cm <= self.overlap_cm {
            return Err(TilewerkError::validation(format!(
                "paper {}x{} cm must be larger than the {} cm overlap",
                self.paper_width_cm, self.paper_height_cm, self.overlap_cm
            )));
        }
        if self.cols.checked_mul(self.rows) != Some(self.sheet_count) {
            return Err(TilewerkError::geometry(format!(
                "{} cols x {} rows does not equal sheet count {}",
                self.cols, self.rows, self.sheet_count
            )));
        }
        Ok(())
    }

    /// Positions of every sheet in row-major order.
    pub fn sheets(&self) -> impl Iterator<Item = SheetPosition> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| SheetPosition { col, row }))
    }
}

/// Zero-based grid cell of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetPosition {
    pub col: u32,
    pub row: u32,
}

impl SheetPosition {
    /// Human label, one-based: `"{col+1},{row+1}"`.
    pub fn label(&self) -> String {
        format!("{},{}", self.col + 1, self.row + 1)
    }

    /// One-based page number in row-major order.
    pub fn page_number(&self, cols: u32) -> u32 {
        self.row * cols + self.col + 1
    }
}

/// Crop rectangle in source-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Whether the rectangle is non-empty and lies inside a
    /// `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }

    /// Centre of the rectangle in source pixels.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// User edits applied to the artwork before tiling.
///
/// Applied in a fixed order: crop, then rotate about the crop centre, then
/// flip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtworkTransform {
    /// `None` keeps the full source.
    #[serde(default)]
    pub crop: Option<CropRect>,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation_degrees: f64,
    #[serde(default)]
    pub flip_horizontal: bool,
    #[serde(default)]
    pub flip_vertical: bool,
}

impl ArtworkTransform {
    /// Check the transform against a source of `width` x `height` pixels.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        if !self.rotation_degrees.is_finite() {
            return Err(TilewerkError::validation(format!(
                "rotation must be a finite number of degrees, got {}",
                self.rotation_degrees
            )));
        }
        match self.crop {
            Some(crop) if !crop.fits_within(width, height) => {
                Err(TilewerkError::validation(format!(
                    "crop {}x{}+{}+{} lies outside the {}x{} source",
                    crop.width, crop.height, crop.x, crop.y, width, height
                )))
            }
            _ => Ok(()),
        }
    }

    /// Rotation normalised into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation_degrees.rem_euclid(360.0)
    }

    /// Pixel size of the artwork after crop and rotation, for a source of
    /// `width` x `height`. Flips do not change the size.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = self
            .crop
            .map(|c| (c.width, c.height))
            .unwrap_or((width, height));
        rotated_bounds(w, h, self.rotation_degrees)
    }
}

/// Bounding box of a `width` x `height` rectangle rotated by `degrees`.
///
/// Quarter turns are exact; any other angle grows the box so that no corner
/// of the original is clipped.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    match quarter_turns(degrees) {
        Some(0) | Some(2) => (width, height),
        Some(_) => (height, width),
        None => {
            let radians = degrees.to_radians();
            let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
            let (w, h) = (width as f64, height as f64);
            // Shave float noise before ceil so 100.0000000001 stays 100.
            let bw = (w * cos + h * sin - 1e-6).ceil().max(1.0);
            let bh = (w * sin + h * cos - 1e-6).ceil().max(1.0);
            (bw as u32, bh as u32)
        }
    }
}

/// Number of clockwise quarter turns if `degrees` is a multiple of 90.
pub fn quarter_turns(degrees: f64) -> Option<u32> {
    let normalised = degrees.rem_euclid(360.0);
    let turns = (normalised / 90.0).round();
    if (normalised - turns * 90.0).abs() < 0.01 {
        Some(turns as u32 % 4)
    } else {
        None
    }
}

/// Artwork top-left in global grid space, in centimetres.
///
/// Zero places the artwork at the grid origin. Negative values pan an
/// overflowing artwork left or up; positive values expose blank paper.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementOffset {
    pub offset_x_cm: f64,
    pub offset_y_cm: f64,
}

impl PlacementOffset {
    pub fn new(offset_x_cm: f64, offset_y_cm: f64) -> Self {
        Self {
            offset_x_cm,
            offset_y_cm,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.offset_x_cm.is_finite() || !self.offset_y_cm.is_finite() {
            return Err(TilewerkError::validation(format!(
                "placement offset must be finite, got ({}, {})",
                self.offset_x_cm, self.offset_y_cm
            )));
        }
        Ok(())
    }
}

/// Derived physical geometry of the sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub cols: u32,
    pub rows: u32,
    pub paper_width_cm: f64,
    pub paper_height_cm: f64,
    pub overlap_cm: f64,
    pub grid_width_cm: f64,
    pub grid_height_cm: f64,
    /// Distance between the left edges of neighbouring sheets.
    pub effective_cell_width_cm: f64,
    /// Distance between the top edges of neighbouring sheets.
    pub effective_cell_height_cm: f64,
}

impl GridGeometry {
    /// Width / height of the printable area.
    pub fn aspect_ratio(&self) -> f64 {
        self.grid_width_cm / self.grid_height_cm
    }

    /// The whole printable area in global space.
    pub fn bounds(&self) -> RectCm {
        RectCm::new(0.0, 0.0, self.grid_width_cm, self.grid_height_cm)
    }
}

/// Artwork size in centimetres after cover fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedArtworkSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

/// Axis-aligned rectangle in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectCm {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectCm {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Overlapping area, or `None` if the rectangles only touch or are apart.
    pub fn intersect(&self, other: &RectCm) -> Option<RectCm> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| RectCm::new(x, y, right - x, bottom - y))
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether both rectangles agree to within `epsilon` on every edge.
    pub fn approx_eq(&self, other: &RectCm, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

/// Axis-aligned rectangle in output raster pixels. The origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PxRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PxRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn intersect(&self, other: &PxRect) -> Option<PxRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y)
            .then(|| PxRect::new(x, y, (right - x) as u32, (bottom - y) as u32))
    }
}

/// Interpolation kernel used when resampling artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleAlgorithm {
    /// Bicubic Catmull-Rom: sharp enlargement with little ringing.
    CatmullRom,
    /// Lanczos3 with support widened by the scale factor: anti-aliased
    /// reduction.
    Lanczos3,
}

impl ResampleAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CatmullRom => "catmull-rom",
            Self::Lanczos3 => "lanczos3",
        }
    }
}

impl std::fmt::Display for ResampleAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of the standalone resize-for-print entry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub target_width_cm: Option<f64>,
    pub target_height_cm: Option<f64>,
    pub dpi: u32,
    #[serde(default = "default_true")]
    pub maintain_aspect: bool,
}

fn default_true() -> bool {
    true
}

impl ResizeRequest {
    pub fn validate(&self) -> Result<()> {
        if self.target_width_cm.is_none() && self.target_height_cm.is_none() {
            return Err(TilewerkError::validation(
                "at least one of target width or target height is required",
            ));
        }
        crate::units::validate_dpi_range(self.dpi)?;
        for (name, value) in [
            ("target width", self.target_width_cm),
            ("target height", self.target_height_cm),
        ] {
            match value {
                Some(cm) if !cm.is_finite() || cm <= 0.0 => {
                    return Err(TilewerkError::validation(format!(
                        "{name} must be a positive number of centimetres, got {cm}"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
