// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tile rasterizer — turn (artwork, layout, transform, offset, dpi) into one
// paper-sized page image per sheet.
//
// The visible part of the artwork is resampled once into global raster
// space; every page is then a paper-sized window onto that single buffer.
// Neighbouring pages therefore share their overlap strip pixel for pixel,
// and identical inputs always produce identical buffers.

use image::{RgbImage, imageops};
use serde::Serialize;
use tilewerk_core::config::TilerConfig;
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{
    ArtworkTransform, PlacementOffset, PrintJobConfig, PxRect, SheetPosition,
};
use tilewerk_core::units;
use tilewerk_layout::{LayoutPlan, RasterLayout};
use tracing::{debug, info, instrument};

use crate::artwork::pipeline::{ImageTransformPipeline, PAPER_WHITE};
use crate::artwork::resample::ResamplingEngine;
use crate::encode::{self, PageFormat};
use crate::source::SourceImage;
use crate::tile::cancel::CancelToken;

/// Support radius of the widest kernel (Lanczos3) at 1:1, in source pixels.
/// The visible span is padded by this much, widened by the reduction factor
/// when downscaling, so the kernel sees real neighbours at the grid edge.
const KERNEL_SUPPORT: f64 = 3.0;

/// One printable sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based, row-major.
    pub page_number: u32,
    pub col_index: u32,
    pub row_index: u32,
    /// `"{col+1},{row+1}"`.
    pub label: String,
    #[serde(skip)]
    pub image: RgbImage,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl Page {
    pub fn position(&self) -> SheetPosition {
        SheetPosition {
            col: self.col_index,
            row: self.row_index,
        }
    }

    /// SHA-256 of the page's raw pixels.
    pub fn digest(&self) -> String {
        encode::pixel_digest(&self.image)
    }

    /// Encode the page, tagged with its DPI.
    pub fn encode(&self, format: PageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
        encode::encode(&self.image, format, self.dpi, jpeg_quality)
    }

    /// Suggested file name, e.g. `page-03_2-1.png`.
    pub fn file_name(&self, format: PageFormat) -> String {
        format!(
            "page-{:02}_{}-{}.{}",
            self.page_number,
            self.col_index + 1,
            self.row_index + 1,
            format.extension()
        )
    }
}

/// Rasterizes every sheet of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRasterizer {
    max_render_pixels: u64,
}

impl Default for TileRasterizer {
    fn default() -> Self {
        Self::from_config(&TilerConfig::default())
    }
}

impl TileRasterizer {
    pub fn new(max_render_pixels: u64) -> Self {
        Self { max_render_pixels }
    }

    pub fn from_config(config: &TilerConfig) -> Self {
        Self::new(config.max_render_pixels)
    }

    /// Render all pages. Nothing is returned unless every page succeeds.
    pub fn render(
        &self,
        source: &SourceImage,
        config: &PrintJobConfig,
        transform: &ArtworkTransform,
        offset: PlacementOffset,
        dpi: u32,
    ) -> Result<Vec<Page>> {
        self.render_cancellable(source, config, transform, offset, dpi, &CancelToken::never())
    }

    /// Render all pages, giving up with `Superseded` as soon as `cancel`
    /// reports a newer request.
    #[instrument(skip_all, fields(sheets = config.sheet_count, dpi = dpi))]
    pub fn render_cancellable(
        &self,
        source: &SourceImage,
        config: &PrintJobConfig,
        transform: &ArtworkTransform,
        offset: PlacementOffset,
        dpi: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<Page>> {
        units::validate_dpi_range(dpi)?;
        config.validate()?;
        offset.validate()?;
        transform.validate(source.width(), source.height())?;
        cancel.check()?;

        let artwork = ImageTransformPipeline::new(*transform).apply(source)?;
        let plan = LayoutPlan::new(config, artwork.width(), artwork.height(), offset)?;
        self.render_plan(&artwork, &plan, dpi, cancel)
    }

    /// Render an already-transformed artwork with a plan built for it.
    pub fn render_plan(
        &self,
        artwork: &RgbImage,
        plan: &LayoutPlan,
        dpi: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<Page>> {
        let aspect = artwork.width() as f64 / artwork.height() as f64;
        if (aspect - plan.artwork_aspect()).abs() > 1e-9 * aspect.max(1.0) {
            return Err(TilewerkError::geometry(format!(
                "plan was built for aspect {} but the artwork is {}x{}",
                plan.artwork_aspect(),
                artwork.width(),
                artwork.height()
            )));
        }

        let layout = plan.raster(dpi)?;
        info!(
            sheets = layout.sheets.len(),
            paper_w = layout.grid.paper_width_px,
            paper_h = layout.grid.paper_height_px,
            "Tiling started"
        );

        // Every page canvas plus the resampled artwork must fit the budget.
        let page_pixels = layout.grid.paper_width_px as u64
            * layout.grid.paper_height_px as u64
            * layout.sheets.len() as u64;
        if page_pixels > self.max_render_pixels {
            return Err(TilewerkError::validation(format!(
                "{} sheets of {}x{} px exceed the limit of {} pixels; lower the dpi",
                layout.sheets.len(),
                layout.grid.paper_width_px,
                layout.grid.paper_height_px,
                self.max_render_pixels
            )));
        }

        cancel.check()?;
        let scaled =
            self.scale_visible(artwork, &layout, self.max_render_pixels - page_pixels)?;

        let mut pages = Vec::with_capacity(layout.sheets.len());
        for sheet in &layout.sheets {
            cancel.check()?;
            let mut canvas = RgbImage::from_pixel(
                layout.grid.paper_width_px,
                layout.grid.paper_height_px,
                PAPER_WHITE,
            );
            if let Some((buffer, origin)) = &scaled {
                imageops::replace(
                    &mut canvas,
                    buffer,
                    origin.x - sheet.rect.x,
                    origin.y - sheet.rect.y,
                );
            }
            pages.push(Page {
                page_number: sheet.page_number,
                col_index: sheet.position.col,
                row_index: sheet.position.row,
                label: sheet.label.clone(),
                width_px: canvas.width(),
                height_px: canvas.height(),
                image: canvas,
                dpi,
            });
        }

        info!(pages = pages.len(), "Tiling complete");
        Ok(pages)
    }

    /// Resample the part of `artwork` that lands on the grid.
    ///
    /// Returns the buffer and its top-left in global raster pixels, or
    /// `None` when the artwork has been moved entirely off the grid. The
    /// buffer may hold at most `budget` pixels.
    fn scale_visible(
        &self,
        artwork: &RgbImage,
        layout: &RasterLayout,
        budget: u64,
    ) -> Result<Option<(RgbImage, PxRect)>> {
        let placed = layout.artwork;
        let Some(visible) = layout.visible_artwork() else {
            debug!("Artwork lies outside the grid; pages stay blank");
            return Ok(None);
        };

        let (src_w, src_h) = artwork.dimensions();
        let x = source_span(
            visible.x - placed.x,
            visible.right() - placed.x,
            src_w,
            placed.width,
        );
        let y = source_span(
            visible.y - placed.y,
            visible.bottom() - placed.y,
            src_h,
            placed.height,
        );

        let out_w = x.target_end - x.target_start;
        let out_h = y.target_end - y.target_start;
        let out_pixels = out_w as u64 * out_h as u64;
        if out_pixels > budget {
            return Err(TilewerkError::validation(format!(
                "rendering {out_w}x{out_h} px of artwork alongside the pages exceeds the limit of {} pixels; lower the dpi",
                self.max_render_pixels
            )));
        }

        let algorithm = ResamplingEngine::select(
            src_w as u64 * src_h as u64,
            placed.width as u64 * placed.height as u64,
        );
        debug!(
            src_x = x.source_start,
            src_y = y.source_start,
            out_w,
            out_h,
            %algorithm,
            "Resampling visible artwork"
        );

        let region = imageops::crop_imm(
            artwork,
            x.source_start,
            y.source_start,
            x.source_end - x.source_start,
            y.source_end - y.source_start,
        )
        .to_image();
        let buffer = ResamplingEngine::resample(&region, out_w, out_h, algorithm);
        let origin = PxRect::new(
            placed.x + x.target_start as i64,
            placed.y + y.target_start as i64,
            out_w,
            out_h,
        );
        Ok(Some((buffer, origin)))
    }
}

/// Source and target ranges along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    source_start: u32,
    source_end: u32,
    target_start: u32,
    target_end: u32,
}

/// Map the visible target range `[start, end)` (artwork-local pixels) back
/// to a padded source range, then forward again to the target pixels that
/// source range covers. The result always contains `[start, end)`.
fn source_span(start: i64, end: i64, source_len: u32, target_len: u32) -> Span {
    let scale = target_len as f64 / source_len as f64;
    let pad = (KERNEL_SUPPORT * (1.0 / scale).max(1.0)).ceil() as i64;
    let source_start = ((start as f64 / scale).floor() as i64 - pad).max(0) as u32;
    let source_end = ((end as f64 / scale).ceil() as i64 + pad).min(source_len as i64) as u32;
    let target_start = (source_start as f64 * scale).round() as u32;
    let target_end = if source_end == source_len {
        target_len
    } else {
        (source_end as f64 * scale).round() as u32
    };
    Span {
        source_start,
        source_end,
        target_start,
        target_end,
    }
}
