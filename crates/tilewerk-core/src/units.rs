// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit conversion between physical centimetres and pixels at a given DPI.
//
// Every cm → px conversion in the workspace goes through `cm_to_px`, so the
// preview and the renderer share one rounding rule: `f64::round`, i.e. halves
// round away from zero.

use crate::error::{Result, TilewerkError};

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Lowest DPI accepted by the resize entry point.
pub const MIN_DPI: u32 = 72;

/// Highest DPI accepted by the resize entry point.
pub const MAX_DPI: u32 = 600;

/// Convert a length in centimetres to a signed pixel count at `dpi`.
///
/// `round(cm * dpi / 2.54)`. Negative lengths are allowed so that positions
/// left of or above the grid origin can be expressed.
pub fn cm_to_px(cm: f64, dpi: u32) -> Result<i64> {
    ensure_finite("length in cm", cm)?;
    ensure_dpi(dpi)?;
    Ok((cm * dpi as f64 / CM_PER_INCH).round() as i64)
}

/// Convert a non-negative length (a width or height) to pixels.
pub fn cm_to_px_len(cm: f64, dpi: u32) -> Result<u32> {
    if cm < 0.0 {
        return Err(TilewerkError::validation(format!(
            "length must not be negative, got {cm} cm"
        )));
    }
    let px = cm_to_px(cm, dpi)?;
    u32::try_from(px).map_err(|_| {
        TilewerkError::validation(format!("{cm} cm at {dpi} dpi exceeds the pixel range"))
    })
}

/// Convert pixels back to centimetres at `dpi`, rounded to two decimal places.
pub fn px_to_cm(px: f64, dpi: u32) -> Result<f64> {
    ensure_finite("length in px", px)?;
    ensure_dpi(dpi)?;
    Ok(round2(px * CM_PER_INCH / dpi as f64))
}

/// Pixels per centimetre at `dpi`, unrounded. Used for continuous preview
/// mapping where quantisation happens later.
pub fn px_per_cm(dpi: f64) -> f64 {
    dpi / CM_PER_INCH
}

/// Check that `dpi` lies within the range accepted from callers.
pub fn validate_dpi_range(dpi: u32) -> Result<()> {
    if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
        return Err(TilewerkError::validation(format!(
            "dpi must be between {MIN_DPI} and {MAX_DPI}, got {dpi}"
        )));
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_finite(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TilewerkError::validation(format!(
            "{what} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

fn ensure_dpi(dpi: u32) -> Result<()> {
    if dpi == 0 {
        return Err(TilewerkError::validation("dpi must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_cm_at_300_dpi() {
        assert_eq!(cm_to_px(10.0, 300).unwrap(), 1181);
    }

    #[test]
    fn a4_width_at_300_dpi() {
        // 21 cm * 300 / 2.54 = 2480.31
        assert_eq!(cm_to_px_len(21.0, 300).unwrap(), 2480);
        // 29.7 cm * 300 / 2.54 = 3507.87
        assert_eq!(cm_to_px_len(29.7, 300).unwrap(), 3508);
    }

    #[test]
    fn one_inch_is_dpi_pixels() {
        assert_eq!(cm_to_px(2.54, 72).unwrap(), 72);
        assert_eq!(cm_to_px(2.54, 600).unwrap(), 600);
    }

    #[test]
    fn negative_positions_are_allowed() {
        // -1 cm at 300 dpi is -118.11 px.
        assert_eq!(cm_to_px(-1.0, 300).unwrap(), -118);
        assert_eq!(cm_to_px(-2.54, 300).unwrap(), -300);
    }

    #[test]
    fn negative_length_rejected() {
        assert!(matches!(
            cm_to_px_len(-1.0, 300),
            Err(TilewerkError::Validation(_))
        ));
    }

    #[test]
    fn non_finite_rejected() {
        assert!(cm_to_px(f64::NAN, 300).is_err());
        assert!(cm_to_px(f64::INFINITY, 300).is_err());
        assert!(px_to_cm(f64::NEG_INFINITY, 300).is_err());
    }

    #[test]
    fn zero_dpi_rejected() {
        assert!(cm_to_px(1.0, 0).is_err());
        assert!(px_to_cm(1.0, 0).is_err());
    }

    #[test]
    fn px_to_cm_two_decimals() {
        assert_eq!(px_to_cm(1181.0, 300).unwrap(), 10.0);
        assert_eq!(px_to_cm(591.0, 300).unwrap(), 5.0);
        assert_eq!(px_to_cm(100.0, 72).unwrap(), 3.53);
    }

    #[test]
    fn dpi_range() {
        assert!(validate_dpi_range(72).is_ok());
        assert!(validate_dpi_range(600).is_ok());
        let err = validate_dpi_range(71).unwrap_err();
        assert_eq!(err.to_string(), "dpi must be between 72 and 600, got 71");
        assert!(validate_dpi_range(601).is_err());
    }
}
