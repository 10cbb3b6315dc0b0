// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, TilewerkError};
use crate::units;

/// Settings shared by the preview and the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// Output DPI used when a request does not name one.
    pub default_dpi: u32,
    /// Default paper size for new layouts.
    pub default_paper_size: crate::PaperSize,
    /// Default sheet orientation for new layouts.
    pub default_orientation: crate::Orientation,
    /// Default overlap strip between neighbouring sheets, in cm.
    pub default_overlap_cm: f64,
    /// Fraction of the preview canvas the grid may occupy (0, 1].
    pub preview_margin: f64,
    /// Screen pixels per centimetre at preview zoom 1.0.
    pub preview_px_per_cm: f64,
    /// Upper bound on pixels resampled for one export. Guards against
    /// runaway memory on extreme aspect ratios.
    pub max_render_pixels: u64,
    /// JPEG quality for encoded pages (1-100).
    pub jpeg_quality: u8,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            default_dpi: 300,
            default_paper_size: crate::PaperSize::A4,
            default_orientation: crate::Orientation::Portrait,
            default_overlap_cm: 0.5,
            preview_margin: 0.9,
            preview_px_per_cm: 96.0 / units::CM_PER_INCH,
            max_render_pixels: 400_000_000,
            jpeg_quality: 92,
        }
    }
}

impl TilerConfig {
    /// Parse and validate a JSON configuration document. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        debug!(?config, "Tiler configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        units::validate_dpi_range(self.default_dpi)?;
        if !(self.preview_margin > 0.0 && self.preview_margin <= 1.0) {
            return Err(TilewerkError::validation(format!(
                "preview margin must be in (0, 1], got {}",
                self.preview_margin
            )));
        }
        if !(self.preview_px_per_cm.is_finite() && self.preview_px_per_cm > 0.0) {
            return Err(TilewerkError::validation(format!(
                "preview pixels per cm must be positive, got {}",
                self.preview_px_per_cm
            )));
        }
        if !(self.default_overlap_cm.is_finite() && self.default_overlap_cm >= 0.0) {
            return Err(TilewerkError::validation(format!(
                "default overlap must not be negative, got {}",
                self.default_overlap_cm
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TilewerkError::validation(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_render_pixels == 0 {
            return Err(TilewerkError::validation(
                "max render pixels must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        assert!(TilerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = TilerConfig::from_json(r#"{ "default_dpi": 150 }"#).unwrap();
        assert_eq!(config.default_dpi, 150);
        assert_eq!(config.jpeg_quality, 92);
        assert_eq!(config.default_paper_size, crate::PaperSize::A4);
    }

    #[test]
    fn out_of_range_dpi_rejected() {
        let err = TilerConfig::from_json(r#"{ "default_dpi": 1200 }"#).unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
    }

    #[test]
    fn bad_margin_rejected() {
        assert!(TilerConfig::from_json(r#"{ "preview_margin": 0.0 }"#).is_err());
        assert!(TilerConfig::from_json(r#"{ "preview_margin": 1.5 }"#).is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = TilerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TilewerkError::Serialization(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_orientation": "landscape" }}"#).unwrap();
        let config = TilerConfig::load(file.path()).unwrap();
        assert_eq!(config.default_orientation, crate::Orientation::Landscape);
    }
}
