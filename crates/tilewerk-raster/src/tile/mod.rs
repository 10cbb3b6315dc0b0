// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tiling — rasterize each sheet of a layout, schedule exports with
// last-write-wins cancellation, and describe the result in a manifest.

pub mod cancel;
pub mod export;
pub mod manifest;
pub mod rasterizer;

pub use cancel::CancelToken;
pub use export::{ExportRequest, ExportScheduler};
pub use manifest::{ExportManifest, ManifestPage};
pub use rasterizer::{Page, TileRasterizer};
