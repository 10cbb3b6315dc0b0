// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job files — the JSON documents the `tilewerk` binary executes.
//
// A job is either a tile job (split one image across sheets and write the
// pages, a PDF, and a manifest) or a resize job (scale one image to a
// physical size at a given dpi).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tilewerk_core::config::TilerConfig;
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{
    ArtworkTransform, Orientation, PaperSize, PlacementOffset, ResizeRequest,
};
use tilewerk_layout::{GridLayoutCalculator, LayoutPlan};
use tilewerk_raster::encode;
use tilewerk_raster::{
    ExportManifest, ExportRequest, ExportScheduler, ImageTransformPipeline, PageFormat,
    SheetPdfWriter, SourceImage, TileRasterizer, resize_for_print,
};
use tracing::{info, instrument};

const PDF_FILE: &str = "poster.pdf";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobFile {
    Tile(TileJob),
    Resize(ResizeJob),
}

/// Split one artwork across a grid of sheets.
///
/// Unset layout fields fall back to the [`TilerConfig`] defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub sheet_count: u32,
    #[serde(default)]
    pub paper: Option<PaperSize>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub overlap_cm: Option<f64>,
    #[serde(default)]
    pub dpi: Option<u32>,
    #[serde(default)]
    pub transform: ArtworkTransform,
    #[serde(default)]
    pub offset: PlacementOffset,
    /// Centre the overflowing artwork on the grid. Overrides `offset`.
    #[serde(default)]
    pub center: bool,
    #[serde(default)]
    pub artifacts: Artifacts,
}

/// Which outputs a tile job writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifacts {
    pub pages: bool,
    pub pdf: bool,
    pub manifest: bool,
    pub format: PageFormat,
}

impl Default for Artifacts {
    fn default() -> Self {
        Self {
            pages: true,
            pdf: true,
            manifest: true,
            format: PageFormat::Png,
        }
    }
}

/// Resize one image for print. The output format follows the file
/// extension (`.png`, `.jpg`/`.jpeg`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeJob {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub request: ResizeRequest,
}

/// What a job produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobReport {
    pub pages: usize,
    pub files: Vec<PathBuf>,
}

impl JobFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub async fn run(&self, settings: &TilerConfig) -> Result<JobReport> {
        match self {
            Self::Tile(job) => job.run(settings).await,
            Self::Resize(job) => job.run(settings).await,
        }
    }
}

impl TileJob {
    #[instrument(skip_all, fields(input = %self.input.display(), sheets = self.sheet_count))]
    pub async fn run(&self, settings: &TilerConfig) -> Result<JobReport> {
        let source = SourceImage::open(&self.input)?;
        let config = GridLayoutCalculator::job_config(
            self.paper.unwrap_or(settings.default_paper_size),
            self.orientation.unwrap_or(settings.default_orientation),
            self.sheet_count,
            self.overlap_cm.unwrap_or(settings.default_overlap_cm),
        )?;
        let dpi = self.dpi.unwrap_or(settings.default_dpi);

        let offset = if self.center {
            let (width, height) =
                ImageTransformPipeline::new(self.transform).output_dimensions(&source)?;
            LayoutPlan::new(&config, width, height, PlacementOffset::default())?
                .centered_offset()
        } else {
            self.offset
        };

        let scheduler = ExportScheduler::new(TileRasterizer::from_config(settings));
        let pages = scheduler
            .export(ExportRequest {
                source: Arc::new(source),
                config,
                transform: self.transform,
                offset,
                dpi,
            })
            .await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let mut files = Vec::new();
        let format = self.artifacts.format;

        if self.artifacts.pages {
            for page in &pages {
                let path = self.output_dir.join(page.file_name(format));
                tokio::fs::write(&path, page.encode(format, settings.jpeg_quality)?).await?;
                files.push(path);
            }
        }

        if self.artifacts.pdf {
            let title = self
                .input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Tilewerk Poster".into());
            let bytes = SheetPdfWriter::new(title).create(&pages)?;
            let path = self.output_dir.join(PDF_FILE);
            tokio::fs::write(&path, bytes).await?;
            files.push(path);
        }

        if self.artifacts.manifest {
            let manifest =
                ExportManifest::from_pages(&config, &self.transform, offset, dpi, format, &pages);
            let path = self.output_dir.join(MANIFEST_FILE);
            tokio::fs::write(&path, manifest.to_json()?).await?;
            files.push(path);
        }

        info!(pages = pages.len(), files = files.len(), "Tile job finished");
        Ok(JobReport {
            pages: pages.len(),
            files,
        })
    }
}

impl ResizeJob {
    #[instrument(skip_all, fields(input = %self.input.display()))]
    pub async fn run(&self, settings: &TilerConfig) -> Result<JobReport> {
        let format = format_for(&self.output)?;
        let source = SourceImage::open(&self.input)?;
        let outcome = resize_for_print(&source, &self.request, settings.max_render_pixels)?;
        let bytes = encode::encode(
            &outcome.image.to_rgb8(),
            format,
            outcome.dpi,
            settings.jpeg_quality,
        )?;
        tokio::fs::write(&self.output, bytes).await?;
        info!(
            width_cm = outcome.final_width_cm,
            height_cm = outcome.final_height_cm,
            "Resize job finished"
        );
        Ok(JobReport {
            pages: 1,
            files: vec![self.output.clone()],
        })
    }
}

fn format_for(path: &Path) -> Result<PageFormat> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => Ok(PageFormat::Png),
        Some("jpg" | "jpeg") => Ok(PageFormat::Jpeg),
        _ => Err(TilewerkError::validation(format!(
            "output must end in .png, .jpg or .jpeg: {}",
            path.display()
        ))),
    }
}
