//! Service Constants
//!
//! Centralized defaults and protocol-defined limits. Magic numbers used in
//! more than one crate belong here.

// ============================================================================
// Admin tokens
// ============================================================================

/// Admin token lifetime in milliseconds (24 hours)
pub const ADMIN_TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

// ============================================================================
// Retention
// ============================================================================

/// Default number of reports kept by a cleanup run when the caller
/// does not supply a count
pub const DEFAULT_KEEP_COUNT: u64 = 500;

// ============================================================================
// Images
// ============================================================================

/// Default JPEG re-encode quality for stored report images
pub const DEFAULT_COMPRESS_QUALITY: f32 = 0.7;

/// Upper bound for a compressed report image data URL, in bytes
pub const MAX_COMPRESSED_IMAGE_BYTES: usize = 2 * 1024 * 1024;

// ============================================================================
// Export
// ============================================================================

/// Minimum rasterization upscale factor for exports
pub const MIN_EXPORT_SCALE: u32 = 2;

/// A4 page width in millimeters
pub const PDF_PAGE_WIDTH_MM: f64 = 210.0;

/// Usable page height in millimeters (A4 minus margins)
pub const PDF_MAX_IMAGE_HEIGHT_MM: f64 = 280.0;

/// Top offset of the report bitmap on the PDF page, in millimeters
pub const PDF_TOP_OFFSET_MM: f64 = 10.0;

/// Fixed filename used for PDF report downloads
pub const PDF_REPORT_FILENAME: &str = "쌤BTI_나의브랜딩리포트.pdf";
