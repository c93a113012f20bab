//! Shared constants for layout shrinking
//!
//! WordprocessingML measures pages and spacing in twips, font sizes in
//! half-points, and DrawingML extents in EMUs. This module centralizes the
//! conversions between them and the default tuning values.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Twips per point (1 twip = 1/20 pt)
pub const TWIPS_PER_PT: f32 = 20.0;

/// Twips per inch
pub const TWIPS_PER_INCH: f32 = 1440.0;

/// EMUs per twip (914400 EMU per inch / 1440 twips per inch)
pub const EMU_PER_TWIP: i64 = 635;

/// Convert millimeters to twips
#[inline]
pub fn mm_to_twips(mm: f32) -> i64 {
    (mm / 25.4 * TWIPS_PER_INCH).round() as i64
}

/// Convert points to twips
#[inline]
pub fn pt_to_twips(pt: f32) -> i64 {
    (pt * TWIPS_PER_PT).round() as i64
}

/// Convert points to half-points (the unit of `w:sz`)
#[inline]
pub fn pt_to_half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(1.0) as u32
}

/// Convert twips to EMUs
#[inline]
pub fn twips_to_emu(twips: i64) -> i64 {
    twips * EMU_PER_TWIP
}

// =============================================================================
// Word Defaults
// =============================================================================

/// Page width Word assumes when a section has no `w:pgSz` (US Letter)
pub const WORD_DEFAULT_PAGE_WIDTH_TWIPS: i64 = 12240;

/// Page height Word assumes when a section has no `w:pgSz` (US Letter)
pub const WORD_DEFAULT_PAGE_HEIGHT_TWIPS: i64 = 15840;

/// Side margin Word assumes when a section has no `w:pgMar` (1 inch)
pub const WORD_DEFAULT_MARGIN_TWIPS: i64 = 1440;

/// Header/footer distance written when a fresh `w:pgMar` has to be created
pub const DEFAULT_HEADER_FOOTER_TWIPS: i64 = 360;

// =============================================================================
// Search Space
// =============================================================================

/// Highest strategy level; levels are cumulative from 1 up to this value
pub const MAX_LEVEL: u8 = 4;

/// Default upper bound for the column axis
pub const DEFAULT_MAX_COLUMNS: u8 = 4;

/// Default path the shrunk document is written to
pub const DEFAULT_OUTPUT_PATH: &str = "compressed_output.docx";

// =============================================================================
// Layout Tuning
// =============================================================================

/// Fixed line pitch for compressed paragraphs (points)
pub const DEFAULT_LINE_SPACING_PT: f32 = 7.0;

/// Font size cap applied from level 2 (points)
pub const DEFAULT_MAX_FONT_SIZE_PT: f32 = 8.0;

/// Uniform page margin applied from level 3 (0.5 inch)
pub const DEFAULT_MARGIN_MM: f32 = 12.7;

// =============================================================================
// Rendering
// =============================================================================

/// Converter program used to render documents to PDF
pub const DEFAULT_CONVERTER: &str = "soffice";

/// Upper bound on one conversion run (seconds)
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 120;

/// How long to wait for the PDF to appear once the converter returned (ms)
pub const DEFAULT_ARTIFACT_WAIT_MS: u64 = 2000;

/// Interval between artifact existence checks (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_in_twips() {
        assert_eq!(mm_to_twips(297.0), 16838);
        assert_eq!(mm_to_twips(210.0), 11906);
        assert_eq!(mm_to_twips(DEFAULT_MARGIN_MM), 720);
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(pt_to_twips(7.0), 140);
        assert_eq!(pt_to_half_points(8.0), 16);
        assert_eq!(pt_to_half_points(6.5), 13);
        assert_eq!(twips_to_emu(1440), 914_400);
    }
}
