// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tilewerk-raster — Pixel side of the poster tiler.
//
// Decodes source artwork, applies crop/rotate/flip, resamples with
// direction-aware kernels, and cuts the result into paper-sized page buffers
// that agree pixel for pixel across every overlap. Also provides the
// standalone resize-for-print entry point, DPI-tagged page encoding, PDF
// assembly, and a last-write-wins export scheduler.

pub mod artwork;
pub mod encode;
pub mod pdf;
pub mod resize;
pub mod source;
pub mod tile;

// Re-export the primary types so callers can use `tilewerk_raster::TileRasterizer` etc.
pub use artwork::pipeline::ImageTransformPipeline;
pub use artwork::resample::ResamplingEngine;
pub use encode::PageFormat;
pub use pdf::writer::SheetPdfWriter;
pub use resize::{ResizeOutcome, resize_for_print};
pub use source::SourceImage;
pub use tile::{
    CancelToken, ExportManifest, ExportRequest, ExportScheduler, ManifestPage, Page,
    TileRasterizer,
};
