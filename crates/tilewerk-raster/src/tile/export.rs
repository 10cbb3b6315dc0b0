// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export scheduling. Renders run on tokio's blocking pool; every new request
// supersedes the ones before it, and a superseded render never hands back
// pages even if it ran to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{ArtworkTransform, PlacementOffset, PrintJobConfig};
use tracing::{debug, info, instrument, warn};

use crate::source::SourceImage;
use crate::tile::cancel::CancelToken;
use crate::tile::rasterizer::{Page, TileRasterizer};

/// Everything one export needs. The source is shared so that rapid
/// re-exports of the same image don't copy its pixels.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: Arc<SourceImage>,
    pub config: PrintJobConfig,
    pub transform: ArtworkTransform,
    pub offset: PlacementOffset,
    pub dpi: u32,
}

/// Last-write-wins export runner.
#[derive(Debug, Clone, Default)]
pub struct ExportScheduler {
    latest: Arc<AtomicU64>,
    rasterizer: TileRasterizer,
}

impl ExportScheduler {
    pub fn new(rasterizer: TileRasterizer) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            rasterizer,
        }
    }

    /// Claim the next generation. Every token issued earlier is now stale.
    pub fn begin(&self) -> CancelToken {
        let token = CancelToken::issue(&self.latest);
        debug!(generation = token.generation(), "Export generation issued");
        token
    }

    /// Invalidate every outstanding export without starting a new one.
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Render `request` under `token`.
    #[instrument(skip_all, fields(generation = token.generation(), dpi = request.dpi))]
    pub async fn run(&self, token: CancelToken, request: ExportRequest) -> Result<Vec<Page>> {
        let rasterizer = self.rasterizer;
        let worker_token = token.clone();
        let pages = tokio::task::spawn_blocking(move || {
            rasterizer.render_cancellable(
                &request.source,
                &request.config,
                &request.transform,
                request.offset,
                request.dpi,
                &worker_token,
            )
        })
        .await
        .map_err(|err| TilewerkError::ImageError(format!("render task failed: {err}")))??;

        // A newer request may have arrived after the last in-render check.
        if token.is_cancelled() {
            warn!("Discarding pages from a superseded export");
            return Err(TilewerkError::Superseded);
        }

        info!(pages = pages.len(), "Export complete");
        Ok(pages)
    }

    /// Start a new export, superseding any still in flight.
    pub async fn export(&self, request: ExportRequest) -> Result<Vec<Page>> {
        let token = self.begin();
        self.run(token, request).await
    }
}
