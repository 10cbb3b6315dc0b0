// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble rendered sheets into one multi-page PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::units::CM_PER_INCH;
use tracing::{debug, info, instrument, warn};

use crate::tile::Page;

/// Writes tiled pages to PDF, one sheet per PDF page.
///
/// Each PDF page is sized to the sheet's pixel dimensions at its DPI, and the
/// page image is placed at that DPI, so a sheet prints at 100% with no
/// further scaling.
pub struct SheetPdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl Default for SheetPdfWriter {
    fn default() -> Self {
        Self::new("Tilewerk Poster")
    }
}

impl SheetPdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Physical page size of `page` in printpdf's Mm units.
    fn page_dimensions(page: &Page) -> (Mm, Mm) {
        let mm = |px: u32| Mm((px as f64 / page.dpi as f64 * CM_PER_INCH * 10.0) as f32);
        (mm(page.width_px), mm(page.height_px))
    }

    /// Build the PDF bytes for `pages`, in order.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn create(&self, pages: &[Page]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(TilewerkError::PdfError("no pages to write".into()));
        }
        info!(title = %self.title, "Creating poster PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for page in pages {
            let raw = RawImage {
                pixels: RawImageData::U8(page.image.as_raw().clone()),
                width: page.width_px as usize,
                height: page.height_px as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Native size at the page's dpi fills the page exactly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(page.dpi as f32),
                    rotate: None,
                },
            }];

            let (page_w, page_h) = Self::page_dimensions(page);
            debug!(
                page = page.page_number,
                label = %page.label,
                width_mm = page_w.0,
                height_mm = page_h.0,
                "Sheet placed"
            );
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }

    /// Create the PDF and write it directly to a file.
    pub fn write_to_file(&self, pages: &[Page], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote poster PDF to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn page(number: u32, dpi: u32) -> Page {
        let image = RgbImage::from_pixel(120, 170, Rgb([200, 30, 30]));
        Page {
            page_number: number,
            col_index: number - 1,
            row_index: 0,
            label: format!("{number},1"),
            width_px: image.width(),
            height_px: image.height(),
            image,
            dpi,
        }
    }

    #[test]
    fn writes_a_pdf_with_one_page_per_sheet() {
        let bytes = SheetPdfWriter::default()
            .create(&[page(1, 72), page(2, 72)])
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn page_size_follows_pixels_and_dpi() {
        let (w, h) = SheetPdfWriter::page_dimensions(&page(1, 72));
        assert!((w.0 - 42.333).abs() < 0.01);
        assert!((h.0 - 59.972).abs() < 0.01);
    }

    #[test]
    fn empty_page_list_is_rejected() {
        let err = SheetPdfWriter::default().create(&[]).unwrap_err();
        assert!(matches!(err, TilewerkError::PdfError(_)));
    }

    #[test]
    fn write_to_file_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.pdf");
        SheetPdfWriter::new("Test").write_to_file(&[page(1, 96)], &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
