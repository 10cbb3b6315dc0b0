// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export manifest — a JSON record of what was rendered and where each page
// was written, with a pixel digest per page for later verification.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::Result;
use tilewerk_core::types::{ArtworkTransform, PlacementOffset, PrintJobConfig};

use crate::encode::PageFormat;
use crate::tile::rasterizer::Page;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub job: PrintJobConfig,
    pub transform: ArtworkTransform,
    pub offset: PlacementOffset,
    pub dpi: u32,
    pub format: PageFormat,
    pub pages: Vec<ManifestPage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPage {
    pub page_number: u32,
    pub label: String,
    pub col_index: u32,
    pub row_index: u32,
    pub file: String,
    pub width_px: u32,
    pub height_px: u32,
    /// SHA-256 of the raw RGB pixels, hex encoded.
    pub sha256: String,
}

impl ExportManifest {
    pub fn from_pages(
        job: &PrintJobConfig,
        transform: &ArtworkTransform,
        offset: PlacementOffset,
        dpi: u32,
        format: PageFormat,
        pages: &[Page],
    ) -> Self {
        let pages = pages
            .iter()
            .map(|page| ManifestPage {
                page_number: page.page_number,
                label: page.label.clone(),
                col_index: page.col_index,
                row_index: page.row_index,
                file: page.file_name(format),
                width_px: page.width_px,
                height_px: page.height_px,
                sha256: page.digest(),
            })
            .collect();
        Self {
            job: *job,
            transform: *transform,
            offset,
            dpi,
            format,
            pages,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pages whose current pixels no longer match the recorded digest.
    pub fn mismatched<'a>(&self, pages: &'a [Page]) -> Vec<&'a Page> {
        pages
            .iter()
            .filter(|page| {
                self.pages
                    .iter()
                    .find(|entry| entry.page_number == page.page_number)
                    .is_none_or(|entry| entry.sha256 != page.digest())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use tilewerk_core::types::{Orientation, PaperSize};
    use tilewerk_layout::GridLayoutCalculator;

    use crate::source::SourceImage;
    use crate::tile::rasterizer::TileRasterizer;

    fn render() -> (PrintJobConfig, Vec<Page>) {
        let img = RgbImage::from_fn(90, 60, |x, y| Rgb([x as u8, y as u8, 0]));
        let source = SourceImage::from_dynamic(DynamicImage::ImageRgb8(img), None).unwrap();
        let config = GridLayoutCalculator::job_config(
            PaperSize::Custom {
                width_mm: 30,
                height_mm: 40,
            },
            Orientation::Portrait,
            4,
            0.3,
        )
        .unwrap();
        let pages = TileRasterizer::default()
            .render(&source, &config, &Default::default(), Default::default(), 72)
            .unwrap();
        (config, pages)
    }

    #[test]
    fn records_every_page_in_order() {
        let (config, pages) = render();
        let manifest = ExportManifest::from_pages(
            &config,
            &Default::default(),
            Default::default(),
            72,
            PageFormat::Png,
            &pages,
        );
        assert_eq!(manifest.pages.len(), 4);
        assert_eq!(manifest.pages[1].label, "2,1");
        assert_eq!(manifest.pages[1].file, "page-02_2-1.png");
        assert_eq!(manifest.pages[3].sha256.len(), 64);

        let parsed = ExportManifest::from_json(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn detects_changed_pixels() {
        let (config, mut pages) = render();
        let manifest = ExportManifest::from_pages(
            &config,
            &Default::default(),
            Default::default(),
            72,
            PageFormat::Jpeg,
            &pages,
        );
        assert!(manifest.mismatched(&pages).is_empty());

        pages[2].image.put_pixel(0, 0, Rgb([1, 2, 3]));
        let changed = manifest.mismatched(&pages);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].page_number, 3);
    }
}
